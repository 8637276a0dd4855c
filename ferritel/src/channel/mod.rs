//! Channel layer for prompt matching.
//!
//! This module frames the unstructured console stream into replies by
//! waiting for prompt patterns at the tail of the accumulated output.

mod buffer;
pub mod encoding;
pub mod patterns;
mod prompt;

pub use buffer::PatternBuffer;
pub use patterns::{PromptKind, PromptSet};
pub use prompt::{PromptChannel, PromptMatch};
