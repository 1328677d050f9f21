// LLM prompt constants for the Advisory module.
// Reuses the JSON-only fragment from llm_client::prompts.

/// Advisory prompt template.
/// Replace: {education}, {skills}, {interests}, {goals}, {json_only_instruction}
pub const ADVISORY_PROMPT_TEMPLATE: &str = r#"You are an AI-powered Personalized Career and Skills Advisor.

Analyze the user's profile:
Education: {education}
Skills: {skills}
Interests: {interests}
Goals: {goals}

Generate a complete career guidance package as a single JSON object with this EXACT structure:
{
  "CareerPaths": [
    {"role": "string", "demand": "string", "avgSalary": "string", "reason": "string"}
  ],
  "SkillsToLearn": [
    {"name": "string", "type": "Technical or Soft", "resources": ["string", "string"]}
  ],
  "LearningRoadmap": {
    "ShortTerm": ["string"],
    "LongTerm": ["string"]
  },
  "Projects": {
    "Beginner": ["string"],
    "Advanced": ["string"]
  },
  "Opportunities": [
    {"platform": "string", "role": "string", "skillGap": "string"}
  ],
  "Motivation": "string"
}

Rules:
- "CareerPaths", "SkillsToLearn" and "Opportunities" are arrays of objects with exactly the fields shown.
- "type" of a skill is "Technical" for technical skills and "Soft" for everything else.
- "LearningRoadmap" and "Projects" are objects whose values are arrays of strings.
- "Motivation" is a single string.

{json_only_instruction}"#;
