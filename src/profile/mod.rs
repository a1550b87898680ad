//! Profiling primitives for label tables.

mod categories;

pub use categories::{profile_categories, CategoryProfile};
