//! Core traits for instinct storage.

mod store;

pub use store::*;
