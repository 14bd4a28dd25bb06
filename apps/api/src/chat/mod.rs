//! AI chat over one resume: agentic tool-use turns, ordered transcripts,
//! cursor-paginated history.

pub mod handlers;
pub mod orchestrator;
pub mod persistence;
pub mod prompts;
pub mod transcript;
