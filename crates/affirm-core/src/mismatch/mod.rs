//! Text-mismatch rendering engine
//!
//! Locates a readable window around the first difference of two strings and
//! renders an aligned excerpt:
//!
//! ```text
//! Expected name to be the same string, but they differ at index 2:
//!      ↓ (actual)
//!   "abc"
//!   "abd"
//!      ↑ (expected).
//! ```

pub mod assertions;
pub mod renderer;
pub mod span;
pub mod truncation;

pub use renderer::{describe_location, render_mismatch, IndexFormatter, RenderOptions};
pub use span::MismatchSpan;
pub use truncation::{InvertedTruncationStrategy, StandardTruncationStrategy, TruncationStrategy};
