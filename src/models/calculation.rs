//! Request DTOs for the calculation endpoints.

use serde::Deserialize;

/// Body of `POST /api/calculate`.
///
/// Required fields are optional at the type level so that a missing field
/// surfaces as a validation error naming it, not as a generic decode error.
/// Flags accept `null` and read it as `false`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalculateRequest {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub day: Option<i32>,
    pub hour: Option<i32>,
    #[serde(default, alias = "isSolar")]
    pub is_solar: Option<bool>,
    #[serde(default, alias = "isFemale")]
    pub is_female: Option<bool>,
    #[serde(default, alias = "isLeap")]
    pub is_leap: Option<bool>,
}

/// Body of `POST /api/calculate_direct`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectRequest {
    pub bazi: Option<String>,
}

/// Birth moment after validation; every required field is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthMoment {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub is_solar: bool,
    pub is_female: bool,
    pub is_leap: bool,
}

/// Four pillars given literally, e.g. `丁巳 己酉 癸未 壬戌`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PillarString {
    pub pillars: [String; 4],
}
