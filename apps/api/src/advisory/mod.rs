// Advisory pipeline: tone resolution, prompt assembly, text generation.
// All LLM calls go through llm_client; no direct vendor calls here.

pub mod generator;
pub mod handlers;
pub mod prompt_builder;
pub mod prompts;
pub mod tone;
