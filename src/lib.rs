//! proofmark - bracket, quote and alignment highlighting for proofreading
//!
//! The library holds the text model and the highlight engine; the binary
//! wraps them in a terminal viewer.

pub mod buffer;
pub mod config;
pub mod error;
pub mod highlight;
pub mod line;
pub mod text;

pub use config::Config;
pub use error::{ProofmarkError, Result};
pub use highlight::HighlightEngine;
