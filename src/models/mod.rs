//! Core data models for the war recommender.

mod member;
mod sort;
mod tag;

pub use member::*;
pub use sort::*;
pub use tag::*;
