//! Prompt shaping: history normalization, catalog rendering, and the fixed
//! system instruction that frames them for the completion capability.

pub mod catalog;
pub mod history;
pub mod instruction;

pub use catalog::{render_catalog, render_definition};
pub use history::normalize_history;
pub use instruction::{build_instruction, NO_RELEVANT_FUNCTION};
