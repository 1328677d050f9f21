//! Advisory Response: fence-stripping, JSON parsing, and typed decoding of the
//! model's output.
//!
//! Defaulting happens once, here: a missing (or `null`) top-level key decodes
//! to an empty section. A present but malformed key is a `ShapeError` and stops
//! decoding; keys decoded before it stay usable for rendering.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::AppError;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CareerPath {
    pub role: String,
    pub demand: String,
    #[serde(rename = "avgSalary", alias = "avg_salary")]
    pub avg_salary: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillToLearn {
    pub name: String,
    /// "Technical"; any other value is treated as a soft skill.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: Vec<String>,
}

impl SkillToLearn {
    pub fn is_technical(&self) -> bool {
        self.kind == "Technical"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LearningRoadmap {
    #[serde(
        rename = "ShortTerm",
        alias = "Short Term",
        default,
        deserialize_with = "null_as_default"
    )]
    pub short_term: Vec<String>,
    #[serde(
        rename = "LongTerm",
        alias = "Long Term",
        default,
        deserialize_with = "null_as_default"
    )]
    pub long_term: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Projects {
    #[serde(rename = "Beginner", default, deserialize_with = "null_as_default")]
    pub beginner: Vec<String>,
    #[serde(rename = "Advanced", default, deserialize_with = "null_as_default")]
    pub advanced: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Opportunity {
    pub platform: String,
    pub role: String,
    #[serde(rename = "skillGap", alias = "skill_gap")]
    pub skill_gap: String,
}

/// The advisory payload for one profile. Created per submission, never cached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Advisory {
    pub career_paths: Vec<CareerPath>,
    pub skills_to_learn: Vec<SkillToLearn>,
    pub learning_roadmap: LearningRoadmap,
    pub projects: Projects,
    pub opportunities: Vec<Opportunity>,
    pub motivation: String,
}

/// Top-level advisory keys, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKey {
    CareerPaths,
    SkillsToLearn,
    LearningRoadmap,
    Projects,
    Opportunities,
    Motivation,
}

impl SectionKey {
    pub const DISPLAY_ORDER: [SectionKey; 6] = [
        SectionKey::CareerPaths,
        SectionKey::SkillsToLearn,
        SectionKey::LearningRoadmap,
        SectionKey::Projects,
        SectionKey::Opportunities,
        SectionKey::Motivation,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SectionKey::CareerPaths => "CareerPaths",
            SectionKey::SkillsToLearn => "SkillsToLearn",
            SectionKey::LearningRoadmap => "LearningRoadmap",
            SectionKey::Projects => "Projects",
            SectionKey::Opportunities => "Opportunities",
            SectionKey::Motivation => "Motivation",
        }
    }

    /// Spellings older prompts asked the model for.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            SectionKey::CareerPaths => &["Career Paths"],
            SectionKey::SkillsToLearn => &["Skills to Learn"],
            SectionKey::LearningRoadmap => &["Learning Roadmap"],
            SectionKey::Projects | SectionKey::Opportunities | SectionKey::Motivation => &[],
        }
    }
}

/// A present-but-malformed top-level key.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeError {
    pub section: SectionKey,
    pub message: String,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.section.key(), self.message)
    }
}

impl From<ShapeError> for AppError {
    fn from(err: ShapeError) -> Self {
        AppError::Shape(err.to_string())
    }
}

/// Result of decoding: the advisory, which sections were decoded (in display
/// order), and the shape error that stopped decoding, if any.
#[derive(Debug, Clone)]
pub struct DecodedAdvisory {
    pub advisory: Advisory,
    pub decoded: Vec<SectionKey>,
    pub shape_error: Option<ShapeError>,
}

// ────────────────────────────────────────────────────────────────────────────
// Fence stripping and parsing
// ────────────────────────────────────────────────────────────────────────────

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
///
/// Total and idempotent: text without fences comes back trimmed, and nested
/// fences are peeled until none remain.
pub fn strip_code_fences(text: &str) -> &str {
    let mut current = text.trim();
    loop {
        let next = strip_one_fence(current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_one_fence(text: &str) -> &str {
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(stripped)
}

/// Fence-strips and parses the raw model text into a JSON object.
pub fn parse_advisory(raw: &str) -> Result<Map<String, Value>, AppError> {
    let payload = strip_code_fences(raw);

    match serde_json::from_str::<Value>(payload).map_err(|e| AppError::Parse(e.to_string()))? {
        Value::Object(object) => Ok(object),
        other => Err(AppError::Parse(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Decoding
// ────────────────────────────────────────────────────────────────────────────

/// Decodes the six advisory keys in display order, stopping at the first
/// malformed one.
pub fn decode_advisory(object: &Map<String, Value>) -> DecodedAdvisory {
    let mut advisory = Advisory::default();
    let mut decoded = Vec::with_capacity(SectionKey::DISPLAY_ORDER.len());

    for section in SectionKey::DISPLAY_ORDER {
        let result = match section {
            SectionKey::CareerPaths => take(object, section).map(|v| advisory.career_paths = v),
            SectionKey::SkillsToLearn => {
                take(object, section).map(|v| advisory.skills_to_learn = v)
            }
            SectionKey::LearningRoadmap => {
                take(object, section).map(|v| advisory.learning_roadmap = v)
            }
            SectionKey::Projects => take(object, section).map(|v| advisory.projects = v),
            SectionKey::Opportunities => take(object, section).map(|v| advisory.opportunities = v),
            SectionKey::Motivation => take(object, section).map(|v| advisory.motivation = v),
        };

        if let Err(err) = result {
            warn!("Advisory key {} is malformed: {}", section.key(), err.message);
            return DecodedAdvisory {
                advisory,
                decoded,
                shape_error: Some(err),
            };
        }
        decoded.push(section);
    }

    DecodedAdvisory {
        advisory,
        decoded,
        shape_error: None,
    }
}

/// Looks up a section by its key or aliases; absent and `null` decode to the default.
fn take<T: DeserializeOwned + Default>(
    object: &Map<String, Value>,
    section: SectionKey,
) -> Result<T, ShapeError> {
    let value = std::iter::once(section.key())
        .chain(section.aliases().iter().copied())
        .find_map(|key| object.get(key))
        .filter(|value| !value.is_null());

    match value {
        None => Ok(T::default()),
        Some(value) => T::deserialize(value).map_err(|e| ShapeError {
            section,
            message: e.to_string(),
        }),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(raw: &str) -> DecodedAdvisory {
        decode_advisory(&parse_advisory(raw).unwrap())
    }

    fn decode_ok(raw: &str) -> Advisory {
        let decoded = decode(raw);
        assert!(decoded.shape_error.is_none(), "{:?}", decoded.shape_error);
        decoded.advisory
    }

    #[test]
    fn test_strip_code_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_unterminated_fence() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_code_fences_is_idempotent() {
        for input in [
            "```json\n```json\n{}\n```\n```",
            "```json\n{}\n```",
            "```",
            "",
            "not json",
            "{\"a\": \"```\"}",
        ] {
            let once = strip_code_fences(input);
            assert_eq!(strip_code_fences(once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_parse_fenced_motivation_only() {
        let decoded = decode("```json\n{\"Motivation\":\"Keep going\"}\n```");
        assert!(decoded.shape_error.is_none());
        assert_eq!(decoded.decoded, SectionKey::DISPLAY_ORDER.to_vec());
        assert_eq!(decoded.advisory.motivation, "Keep going");
        assert!(decoded.advisory.career_paths.is_empty());
        assert!(decoded.advisory.skills_to_learn.is_empty());
        assert_eq!(decoded.advisory.learning_roadmap, LearningRoadmap::default());
        assert_eq!(decoded.advisory.projects, Projects::default());
        assert!(decoded.advisory.opportunities.is_empty());
    }

    #[test]
    fn test_parse_not_json_is_parse_error() {
        let err = parse_advisory("not json").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
        assert!(err.user_message().contains("expected"));
    }

    #[test]
    fn test_parse_non_object_is_parse_error() {
        let err = parse_advisory("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, AppError::Parse(ref msg) if msg.contains("an array")));
    }

    #[test]
    fn test_full_advisory_decodes() {
        let raw = json!({
            "CareerPaths": [
                {"role": "ML Engineer", "demand": "High", "avgSalary": "$120k", "reason": "Fits AI interest"}
            ],
            "SkillsToLearn": [
                {"name": "Python", "type": "Technical", "resources": ["Docs"]},
                {"name": "Communication", "type": "Soft"}
            ],
            "LearningRoadmap": {"ShortTerm": ["Learn PyTorch"], "LongTerm": ["Publish a paper"]},
            "Projects": {"Beginner": ["Chatbot"], "Advanced": ["Recommender", "Agent"]},
            "Opportunities": [
                {"platform": "LinkedIn", "role": "Intern", "skillGap": "MLOps"}
            ],
            "Motivation": "You can do it"
        })
        .to_string();

        let advisory = decode_ok(&raw);
        assert_eq!(advisory.career_paths[0].avg_salary, "$120k");
        assert_eq!(advisory.skills_to_learn[0].resources, vec!["Docs"]);
        assert!(advisory.skills_to_learn[1].resources.is_empty());
        assert!(advisory.skills_to_learn[0].is_technical());
        assert!(!advisory.skills_to_learn[1].is_technical());
        assert_eq!(advisory.learning_roadmap.long_term, vec!["Publish a paper"]);
        assert_eq!(advisory.projects.advanced.len(), 2);
        assert_eq!(advisory.opportunities[0].skill_gap, "MLOps");
    }

    #[test]
    fn test_legacy_spellings_are_accepted() {
        let raw = json!({
            "Career Paths": [
                {"role": "Data Analyst", "demand": "Medium", "avg_salary": "$70k", "reason": "SQL"}
            ],
            "Learning Roadmap": {"Short Term": ["SQL"], "Long Term": ["Stats"]},
            "Opportunities": [{"platform": "Indeed", "role": "Analyst", "skill_gap": "Tableau"}]
        })
        .to_string();

        let advisory = decode_ok(&raw);
        assert_eq!(advisory.career_paths[0].avg_salary, "$70k");
        assert_eq!(advisory.learning_roadmap.short_term, vec!["SQL"]);
        assert_eq!(advisory.opportunities[0].skill_gap, "Tableau");
    }

    #[test]
    fn test_null_keys_are_treated_as_absent() {
        let decoded = decode(r#"{"CareerPaths": null, "Projects": {"Beginner": null}}"#);
        assert!(decoded.shape_error.is_none());
        assert!(decoded.advisory.career_paths.is_empty());
        assert!(decoded.advisory.projects.beginner.is_empty());
    }

    #[test]
    fn test_skill_missing_type_stops_decoding_after_career_paths() {
        let raw = json!({
            "CareerPaths": [
                {"role": "Dev", "demand": "High", "avgSalary": "$1", "reason": "r"}
            ],
            "SkillsToLearn": [{"name": "Python"}],
            "Motivation": "never reached"
        })
        .to_string();

        let decoded = decode(&raw);
        assert_eq!(decoded.decoded, vec![SectionKey::CareerPaths]);
        assert_eq!(decoded.advisory.career_paths.len(), 1);
        assert_eq!(decoded.advisory.motivation, "");

        let err = decoded.shape_error.unwrap();
        assert_eq!(err.section, SectionKey::SkillsToLearn);
        assert!(err.message.contains("type"));
        assert!(matches!(
            AppError::from(err),
            AppError::Shape(ref msg) if msg.starts_with("SkillsToLearn: ")
        ));
    }

    #[test]
    fn test_wrong_typed_value_is_rejected() {
        let decoded = decode(r#"{"Motivation": 42}"#);
        let err = decoded.shape_error.unwrap();
        assert_eq!(err.section, SectionKey::Motivation);
        assert_eq!(decoded.decoded.len(), 5);
    }
}
