//! Request extractors shared by the route handlers.

pub mod json;
