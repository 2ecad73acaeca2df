//! Terminal user interface components.

pub mod dashboard;
