use chrono::NaiveDate;

use megasena_core::models::{DrawHistory, DrawRecord};

/// First Mega-Sena draw; the default lower bound.
pub fn earliest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1996, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Draws dated within `[start, end]`, both inclusive. Open bounds default
/// to 1996-01-01 and today.
pub fn filter_by_date_range(
    draws: &[DrawRecord],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> DrawHistory {
    filter_by_date_range_at(draws, start, end, chrono::Local::now().date_naive())
}

pub fn filter_by_date_range_at(
    draws: &[DrawRecord],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> DrawHistory {
    if start.is_none() && end.is_none() {
        return DrawHistory::new(draws.to_vec());
    }
    let start = start.unwrap_or_else(earliest_date);
    let end = end.unwrap_or(today);
    DrawHistory::new(
        draws
            .iter()
            .filter(|d| d.date >= start && d.date <= end)
            .cloned()
            .collect(),
    )
}
