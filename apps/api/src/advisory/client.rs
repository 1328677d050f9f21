//! Advisory Client: builds the advisory prompt and makes the one generation call.

use tracing::{debug, info};

use crate::advisory::profile::Profile;
use crate::advisory::prompts::ADVISORY_PROMPT_TEMPLATE;
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::TextGenerator;

/// Fills the advisory template with the profile fields, verbatim.
pub fn build_advisory_prompt(profile: &Profile) -> String {
    fill_template(
        ADVISORY_PROMPT_TEMPLATE,
        &[
            ("{education}", profile.education.as_str()),
            ("{skills}", profile.skills.as_str()),
            ("{interests}", profile.interests.as_str()),
            ("{goals}", profile.goals.as_str()),
            ("{json_only_instruction}", JSON_ONLY_INSTRUCTION),
        ],
    )
}

/// Sends the advisory prompt to the generator and returns its raw text unmodified.
///
/// Failures propagate to the caller. There is no retry and no fallback.
pub async fn request_advisory(
    generator: &dyn TextGenerator,
    profile: &Profile,
) -> Result<String, AppError> {
    let prompt = build_advisory_prompt(profile);
    debug!("Advisory prompt length: {} characters", prompt.len());

    let raw = generator.generate(&prompt).await?;
    info!("Advisory response received ({} characters)", raw.len());

    Ok(raw)
}

/// Single-pass placeholder substitution.
///
/// Substituted values are never rescanned, so user text containing a
/// placeholder name is inserted as-is.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some((idx, placeholder, value)) = values
        .iter()
        .filter_map(|(key, value)| rest.find(key).map(|idx| (idx, *key, *value)))
        .min_by_key(|(idx, _, _)| *idx)
    {
        out.push_str(&rest[..idx]);
        out.push_str(value);
        rest = &rest[idx + placeholder.len()..];
    }

    out.push_str(rest);
    out
}
