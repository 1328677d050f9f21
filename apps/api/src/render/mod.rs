//! Response Renderer: maps a decoded advisory onto display sections.
//!
//! Flow: strip fences → parse JSON → decode keys in display order →
//!       one `RenderedSection` per decoded key.
//!
//! A shape error stops rendering at the malformed key. Sections before it are
//! kept and returned alongside the error.

pub mod html;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::advisory::response::{
    decode_advisory, parse_advisory, Advisory, CareerPath, Opportunity, SectionKey, SkillToLearn,
};
use crate::errors::AppError;

/// Banner shown above a successfully rendered advisory.
pub const SUCCESS_MESSAGE: &str = "Your Personalized Career Roadmap is Ready!";

// ────────────────────────────────────────────────────────────────────────────
// View models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerCard {
    pub title: String,
    pub demand: String,
    pub salary: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillBadge {
    pub name: String,
    pub resources: Vec<String>,
}

/// One roadmap checkbox. `id` is derived from the list and position, so
/// duplicate item text never collides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistItem {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityBlock {
    pub role: String,
    pub platform: String,
    pub skill_gap: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum RenderedSection {
    /// `columns` equals the card count; zero means nothing is laid out.
    CareerPaths {
        columns: usize,
        cards: Vec<CareerCard>,
    },
    Skills {
        technical: Vec<SkillBadge>,
        soft: Vec<SkillBadge>,
    },
    Roadmap {
        short_term: Vec<ChecklistItem>,
        long_term: Vec<ChecklistItem>,
    },
    /// Only the first advanced project is shown.
    Projects {
        beginner: Vec<String>,
        advanced: Option<String>,
    },
    Opportunities {
        blocks: Vec<OpportunityBlock>,
    },
    Motivation {
        text: String,
    },
}

/// Sections rendered from one raw model response.
#[derive(Debug, Clone)]
pub struct RenderedSections {
    pub sections: Vec<RenderedSection>,
    /// `<key>: <reason>` when a malformed key stopped rendering part-way.
    pub shape_error: Option<String>,
}

/// The user-facing result of one successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedAdvisory {
    pub submission_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub message: String,
    pub sections: Vec<RenderedSection>,
    pub shape_error: Option<String>,
}

impl RenderedAdvisory {
    pub fn new(submission_id: Uuid, rendered: RenderedSections) -> Self {
        Self {
            submission_id,
            generated_at: Utc::now(),
            message: SUCCESS_MESSAGE.to_string(),
            sections: rendered.sections,
            shape_error: rendered.shape_error,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

/// Renders raw model text. Fails only when the text is not a JSON object.
pub fn render_advisory(raw: &str) -> Result<RenderedSections, AppError> {
    let object = parse_advisory(raw)?;
    let decoded = decode_advisory(&object);

    let sections = decoded
        .decoded
        .iter()
        .map(|&key| render_section(&decoded.advisory, key))
        .collect();

    Ok(RenderedSections {
        sections,
        shape_error: decoded.shape_error.map(|err| err.to_string()),
    })
}

fn render_section(advisory: &Advisory, key: SectionKey) -> RenderedSection {
    match key {
        SectionKey::CareerPaths => career_cards(&advisory.career_paths),
        SectionKey::SkillsToLearn => {
            let (technical, soft) = partition_skills(&advisory.skills_to_learn);
            RenderedSection::Skills { technical, soft }
        }
        SectionKey::LearningRoadmap => RenderedSection::Roadmap {
            short_term: checklist("st", &advisory.learning_roadmap.short_term),
            long_term: checklist("lt", &advisory.learning_roadmap.long_term),
        },
        SectionKey::Projects => RenderedSection::Projects {
            beginner: advisory.projects.beginner.clone(),
            advanced: advisory.projects.advanced.first().cloned(),
        },
        SectionKey::Opportunities => RenderedSection::Opportunities {
            blocks: advisory.opportunities.iter().map(opportunity_block).collect(),
        },
        SectionKey::Motivation => RenderedSection::Motivation {
            text: advisory.motivation.clone(),
        },
    }
}

fn career_cards(paths: &[CareerPath]) -> RenderedSection {
    let cards: Vec<CareerCard> = paths
        .iter()
        .map(|path| CareerCard {
            title: path.role.clone(),
            demand: path.demand.clone(),
            salary: path.avg_salary.clone(),
            reason: path.reason.clone(),
        })
        .collect();

    RenderedSection::CareerPaths {
        columns: cards.len(),
        cards,
    }
}

/// Splits skills into (technical, soft). Every skill lands in exactly one group.
pub fn partition_skills(skills: &[SkillToLearn]) -> (Vec<SkillBadge>, Vec<SkillBadge>) {
    let (technical, soft): (Vec<&SkillToLearn>, Vec<&SkillToLearn>) =
        skills.iter().partition(|skill| skill.is_technical());

    let badge = |skill: &SkillToLearn| SkillBadge {
        name: skill.name.clone(),
        resources: skill.resources.clone(),
    };

    (
        technical.into_iter().map(badge).collect(),
        soft.into_iter().map(badge).collect(),
    )
}

fn checklist(prefix: &str, items: &[String]) -> Vec<ChecklistItem> {
    items
        .iter()
        .enumerate()
        .map(|(index, label)| ChecklistItem {
            id: format!("{prefix}-{index}"),
            label: label.clone(),
        })
        .collect()
}

fn opportunity_block(opportunity: &Opportunity) -> OpportunityBlock {
    OpportunityBlock {
        role: opportunity.role.clone(),
        platform: opportunity.platform.clone(),
        skill_gap: opportunity.skill_gap.clone(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
