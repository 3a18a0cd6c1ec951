//! Text generation integration: client seam, prompts and tailoring

pub mod inference;
pub mod prompts;
pub mod tailor;

pub use inference::{GenerationError, OpenAiEngine, TextGenerator};
pub use tailor::{ResumeTailor, TailoringOutcome, TailoringResult};
