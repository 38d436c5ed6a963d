//! Chart calculation: request validation, engine arguments, report parsing.

use crate::errors::AppError;
use crate::models::calculation::{BirthMoment, CalculateRequest, DirectRequest, PillarString};
use crate::models::chart::ParsedChart;
use crate::parsers::Parser;
use crate::services::engine::ChartEngine;

/// Engine flag for a solar (Gregorian) input date.
pub const SOLAR_FLAG: &str = "-g";
/// Engine flag for a female chart.
pub const FEMALE_FLAG: &str = "-n";
/// Engine flag for a leap lunar month.
pub const LEAP_FLAG: &str = "-r";
/// Engine flag introducing four literal pillars.
pub const PILLARS_FLAG: &str = "-b";

const PILLAR_EXAMPLE: &str = "丁巳 己酉 癸未 壬戌";

fn missing(field: &str) -> AppError {
    AppError::Validation(format!("Missing required parameter: {field}"))
}

/// Check required fields in order year, month, day, hour; the first missing one is reported.
pub fn validate_components(req: &CalculateRequest) -> Result<BirthMoment, AppError> {
    Ok(BirthMoment {
        year: req.year.ok_or_else(|| missing("year"))?,
        month: req.month.ok_or_else(|| missing("month"))?,
        day: req.day.ok_or_else(|| missing("day"))?,
        hour: req.hour.ok_or_else(|| missing("hour"))?,
        is_solar: req.is_solar.unwrap_or(false),
        is_female: req.is_female.unwrap_or(false),
        is_leap: req.is_leap.unwrap_or(false),
    })
}

/// The chart string must hold exactly four whitespace-separated pillars.
pub fn validate_pillars(req: &DirectRequest) -> Result<PillarString, AppError> {
    let bazi = req.bazi.as_deref().ok_or_else(|| missing("bazi"))?;
    let parts: Vec<&str> = bazi.split_whitespace().collect();

    let pillars: [&str; 4] = parts.as_slice().try_into().map_err(|_| {
        AppError::Validation(format!(
            "Invalid bazi format: expected 4 pillars, e.g. {PILLAR_EXAMPLE} (got {})",
            parts.len()
        ))
    })?;

    Ok(PillarString {
        pillars: pillars.map(str::to_string),
    })
}

/// `[year, month, day, hour]` followed by `-g`, `-n`, `-r` for each set flag, in that order.
pub fn component_args(moment: &BirthMoment) -> Vec<String> {
    let mut args = vec![
        moment.year.to_string(),
        moment.month.to_string(),
        moment.day.to_string(),
        moment.hour.to_string(),
    ];
    for (enabled, flag) in [
        (moment.is_solar, SOLAR_FLAG),
        (moment.is_female, FEMALE_FLAG),
        (moment.is_leap, LEAP_FLAG),
    ] {
        if enabled {
            args.push(flag.to_string());
        }
    }
    args
}

/// `["-b", p1, p2, p3, p4]`.
pub fn pillar_args(pillars: &PillarString) -> Vec<String> {
    std::iter::once(PILLARS_FLAG.to_string())
        .chain(pillars.pillars.iter().cloned())
        .collect()
}

/// Run the engine and parse its report. Either a full chart or an error, never both.
pub async fn calculate(
    engine: &ChartEngine,
    parser: &dyn Parser,
    args: &[String],
) -> Result<ParsedChart, AppError> {
    let report = engine.invoke(args).await?.into_report()?;
    let chart = parser.parse(&report);

    tracing::debug!(
        source_tool = parser.source_tool(),
        has_pillars = chart.basic.gans.is_some(),
        patterns = chart.patterns.len(),
        spirits = chart.spirits.len(),
        analysis = chart.analysis.len(),
        "Parsed engine report"
    );

    Ok(chart)
}
