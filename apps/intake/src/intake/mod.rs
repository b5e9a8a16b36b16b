// Order intake: prompt contract, field extraction, validation, reply rendering.
// All model calls go through llm_client via the `Extractor` trait.

pub mod fields;
pub mod log;
pub mod phone;
pub mod pipeline;
pub mod prompts;
pub mod reply;
pub mod validation;
