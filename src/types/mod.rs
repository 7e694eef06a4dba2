//! Core types for the motif kernel.

pub mod link;
pub mod code_length;
pub mod occurrence;

pub use link::{Link, LinkTag, NodeIndex};
pub use code_length::CodeLength;
pub use occurrence::{Occurrence, SampleResult, Wiring, overlap};
