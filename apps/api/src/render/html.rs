//! Server-rendered HTML for the Profile Form page.
//!
//! Markup is built with `maud`, which escapes every interpolated value.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::advisory::profile::Profile;
use crate::errors::AppError;
use crate::render::{RenderedAdvisory, RenderedSection};

const STYLESHEET: &str = include_str!("../../assets/compass.css");

/// Form fields: (name, label, placeholder).
const FIELDS: [(&str, &str, &str); 4] = [
    (
        "education",
        "Your Education",
        "e.g., B.Tech in Computer Science, 3rd Year",
    ),
    ("skills", "Your Current Skills", "e.g., Python, Java"),
    ("interests", "Your Interests", "e.g., AI, Gaming"),
    ("goals", "Your Career Goals", "e.g., Get a high-paying job"),
];

/// What to show below the form.
#[derive(Debug)]
pub enum Notice<'a> {
    Warning(&'a str),
    Error(&'a str),
    Advisory(&'a RenderedAdvisory),
}

#[derive(Debug)]
pub struct PageView<'a> {
    pub profile: &'a Profile,
    pub config_error: Option<&'a str>,
    pub notice: Option<Notice<'a>>,
}

pub fn render_page(view: &PageView<'_>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Career Compass AI" }
                style { (PreEscaped(STYLESHEET)) }
            }
            body {
                h1 { "Career Compass AI" }
                p { "Your Personal AI Mentor for a Successful Career Path" }
                @if let Some(message) = view.config_error {
                    (notice("error", message))
                }
                (render_form(view.profile))
                @match &view.notice {
                    None => {}
                    Some(Notice::Warning(message)) => { (notice("warning", message)) }
                    Some(Notice::Error(message)) => { (notice("error", message)) }
                    Some(Notice::Advisory(advisory)) => { (render_advisory(advisory)) }
                }
            }
        }
    }
}

fn render_form(profile: &Profile) -> Markup {
    let values = [
        &profile.education,
        &profile.skills,
        &profile.interests,
        &profile.goals,
    ];

    html! {
        form method="post" action="/advisory" {
            h2 { "Tell Us About Yourself" }
            div.fields {
                @for ((name, label, placeholder), value) in FIELDS.into_iter().zip(values) {
                    div {
                        label for=(name) { (label) }
                        input type="text" id=(name) name=(name) placeholder=(placeholder) value=(value);
                    }
                }
            }
            p { button type="submit" { "Generate My Career Path" } }
        }
    }
}

fn render_advisory(advisory: &RenderedAdvisory) -> Markup {
    html! {
        (notice("success", &advisory.message))
        @for section in &advisory.sections {
            (render_section(section))
        }
        @if let Some(message) = &advisory.shape_error {
            (notice("error", &AppError::Shape(message.clone()).user_message()))
        }
    }
}

fn render_section(section: &RenderedSection) -> Markup {
    match section {
        RenderedSection::CareerPaths { columns, cards } => html! {
            section {
                h2 { "Recommended Career Paths" }
                @if *columns > 0 {
                    div.cards style={ "grid-template-columns:repeat(" (columns) ",1fr)" } {
                        @for card in cards {
                            div.card {
                                h3 { (card.title) }
                                p { "Demand: " (card.demand) }
                                p { "Salary: " (card.salary) }
                                p { (card.reason) }
                            }
                        }
                    }
                }
            }
        },
        RenderedSection::Skills { technical, soft } => html! {
            section {
                h2 { "Skills to Learn" }
                div.columns {
                    @for (title, group) in [("Technical Skills", technical), ("Soft Skills", soft)] {
                        div {
                            strong { (title) }
                            ul {
                                @for skill in group {
                                    li { strong { (skill.name) } }
                                }
                            }
                        }
                    }
                }
            }
        },
        RenderedSection::Roadmap {
            short_term,
            long_term,
        } => html! {
            section {
                h2 { "Your Learning Roadmap" }
                @for (title, items) in [
                    ("Short-Term (Next 3-6 Months):", short_term),
                    ("Long-Term (6 Months - 2 Years):", long_term),
                ] {
                    p { strong { (title) } }
                    @for item in items {
                        div {
                            input type="checkbox" id={ "roadmap-" (item.id) };
                            " "
                            label for={ "roadmap-" (item.id) } { (item.label) }
                        }
                    }
                }
            }
        },
        RenderedSection::Projects { beginner, advanced } => html! {
            section {
                h2 { "Projects to Build Your Portfolio" }
                p { strong { "Beginner Projects:" } }
                ul {
                    @for project in beginner {
                        li { (project) }
                    }
                }
                p { strong { "Advanced Project:" } }
                ul {
                    @if let Some(project) = advanced {
                        li { (project) }
                    }
                }
            }
        },
        RenderedSection::Opportunities { blocks } => html! {
            section {
                h2 { "Job & Internship Opportunities" }
                @for block in blocks {
                    div.notice.info {
                        p { strong { "Role:" } " " (block.role) " on " strong { (block.platform) } }
                        p { strong { "Skill Gap to Fill:" } " " (block.skill_gap) }
                    }
                }
            }
        },
        RenderedSection::Motivation { text } => html! {
            div.notice.success {
                strong { "Motivational Boost:" } " " (text)
            }
        },
    }
}

fn notice(kind: &str, message: &str) -> Markup {
    html! {
        div class={ "notice " (kind) } role="alert" { (message) }
    }
}
