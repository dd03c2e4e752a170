// Blurb generation: candidate context, prompt building, the generation capability,
// per-field locking and the coordinator that ties them together.
// All LLM calls go through llm_client. No direct Anthropic SDK calls here.

pub mod context;
pub mod coordinator;
pub mod generator;
pub mod handlers;
pub mod locks;
pub mod prompts;
