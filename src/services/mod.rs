//! Business logic services.

pub mod calculation;
pub mod engine;
