//! Core types for instinct.

mod filter;
mod instinct;

pub use filter::*;
pub use instinct::*;
