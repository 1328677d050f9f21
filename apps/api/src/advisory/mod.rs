// Career advisory: profile validation, prompt construction, the single
// generation call, response decoding, and the submission lifecycle.
// All LLM calls go through llm_client, with no direct Gemini calls here.

pub mod client;
pub mod handlers;
pub mod profile;
pub mod prompts;
pub mod response;
pub mod submission;
