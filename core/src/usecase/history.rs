use crate::model::footprint::{CategoryBreakdown, FootprintRecord};
use crate::repository::KeyValueStore;
use crate::service::aggregator::FootprintAggregator;
use crate::service::dto::{DailyHistory, WeeklyHistory};
use crate::time::Clock;
use chrono::{DateTime, Datelike, Local, NaiveDate};
use std::collections::BTreeMap;

/// Calendar view of the history for display. The profile's rollups are
/// trailing-record sums and do not use this grouping.
pub struct HistoryUseCase<'a, S: KeyValueStore, C: Clock> {
    aggregator: &'a FootprintAggregator<S, C>,
}

impl<'a, S: KeyValueStore, C: Clock> HistoryUseCase<'a, S, C> {
    pub fn new(aggregator: &'a FootprintAggregator<S, C>) -> Self {
        Self { aggregator }
    }

    /// Newest ISO week first; days inside a week newest first.
    pub fn get_weekly_history(&self) -> Vec<WeeklyHistory> {
        group_by_week(&self.aggregator.history())
    }
}

pub fn group_by_week(records: &[FootprintRecord]) -> Vec<WeeklyHistory> {
    // (Year, Week) -> Date -> (Records, Breakdown)
    let mut weekly_data: BTreeMap<(i32, u32), BTreeMap<NaiveDate, (usize, CategoryBreakdown)>> = BTreeMap::new();

    for record in records {
        let local_dt: DateTime<Local> = DateTime::from(record.date());
        let iso = local_dt.iso_week();
        let day_entry = weekly_data
            .entry((iso.year(), iso.week()))
            .or_default()
            .entry(local_dt.date_naive())
            .or_default();
        day_entry.0 += 1;
        day_entry.1.add(record);
    }

    weekly_data
        .into_iter()
        .rev()
        .map(|((year, week), days_map)| {
            let mut week_breakdown = CategoryBreakdown::default();
            let days = days_map
                .into_iter()
                .rev()
                .map(|(day, (count, breakdown))| {
                    week_breakdown.merge(&breakdown);
                    DailyHistory {
                        date: day.format("%Y-%m-%d").to_string(),
                        day_of_week: day.format("%a").to_string(),
                        records: count,
                        breakdown,
                    }
                })
                .collect();

            WeeklyHistory {
                year,
                week,
                days,
                breakdown: week_breakdown,
            }
        })
        .collect()
}
