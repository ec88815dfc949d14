use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::task::Task;

/// One bar of the completion chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub count: u32,
}

/// Aggregates every task's completion history into a date-sorted count
/// series. Each (task, date) pair contributes 1, so two tasks completed on
/// the same day sum to 2.
///
/// With `window_days` the labels are exactly the trailing window ending at
/// `today` inclusive, ascending and zero-filled so the chart axis has no
/// gaps. Without it the series is sparse: only the distinct dates that saw
/// at least one completion, ascending.
pub fn build_series(
    tasks: &[Task],
    window_days: Option<u32>,
    today: NaiveDate,
) -> Vec<SeriesPoint> {
    let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for task in tasks {
        for &date in &task.completion_history {
            *counts.entry(date).or_insert(0) += 1;
        }
    }

    match window_days {
        Some(days) => {
            let days = i64::from(days);
            (0..days)
                .map(|offset| {
                    let date = today - Duration::days(days - 1 - offset);
                    SeriesPoint {
                        date,
                        count: counts.get(&date).copied().unwrap_or(0),
                    }
                })
                .collect()
        }
        None => counts
            .into_iter()
            .map(|(date, count)| SeriesPoint { date, count })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Recurrence;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn task_with_history(id: &str, history: &[NaiveDate]) -> Task {
        let mut task = Task::new(id, id, Recurrence::Daily);
        task.completion_history = history.to_vec();
        task
    }

    #[test]
    fn windowed_series_is_zero_filled_and_ascending() {
        let today = date(2025, 7, 21);
        let tasks = vec![
            task_with_history("task-1", &[today, date(2025, 7, 18)]),
            task_with_history("task-2", &[today]),
        ];

        let series = build_series(&tasks, Some(7), today);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, date(2025, 7, 15));
        assert_eq!(series[6].date, today);
        assert!(series.windows(2).all(|pair| pair[0].date < pair[1].date));

        // Two tasks completed today sum their counts.
        assert_eq!(series[6].count, 2);
        assert_eq!(series[3].count, 1);
        let zero_days = series.iter().filter(|point| point.count == 0).count();
        assert_eq!(zero_days, 5);
    }

    #[test]
    fn windowed_series_ignores_dates_outside_the_window() {
        let today = date(2025, 7, 21);
        let tasks = vec![task_with_history(
            "task-1",
            &[date(2025, 7, 1), date(2025, 7, 15)],
        )];

        let series = build_series(&tasks, Some(7), today);
        let total: u32 = series.iter().map(|point| point.count).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn sparse_series_lists_only_completed_dates() {
        let today = date(2025, 7, 21);
        let tasks = vec![
            task_with_history("task-1", &[date(2025, 5, 2), today]),
            task_with_history("task-2", &[date(2025, 5, 2)]),
        ];

        let series = build_series(&tasks, None, today);
        assert_eq!(
            series,
            vec![
                SeriesPoint { date: date(2025, 5, 2), count: 2 },
                SeriesPoint { date: today, count: 1 },
            ]
        );
    }

    #[test]
    fn empty_inputs_produce_empty_or_all_zero_series() {
        let today = date(2025, 7, 21);
        assert!(build_series(&[], None, today).is_empty());

        let series = build_series(&[], Some(3), today);
        assert_eq!(series.len(), 3);
        assert!(series.iter().all(|point| point.count == 0));
    }
}
