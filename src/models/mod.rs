//! Request and response models for the chart API.

pub mod calculation;
pub mod chart;
