use crate::filter::record_hour;
use crate::record::{SightingRecord, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Most frequent value of one dimension. `value` is `None` when the
/// dimension had no non-null values, in which case `count` is 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mode<T> {
    pub value: Option<T>,
    pub count: usize,
}

impl<T> Default for Mode<T> {
    fn default() -> Self {
        Self {
            value: None,
            count: 0,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Mode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} ({})", value, self.count),
            None => write!(f, "N/A (0)"),
        }
    }
}

/// Mode of `values`, skipping `None`. Ties go to the value seen first.
pub fn mode<T, I>(values: I) -> Mode<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = Option<T>>,
{
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();

    for value in values.into_iter().flatten() {
        match index.get(&value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    // Strict `>` keeps the earlier entry on equal counts.
    counts
        .into_iter()
        .reduce(|best, next| if next.1 > best.1 { next } else { best })
        .map(|(value, count)| Mode {
            value: Some(value),
            count,
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SightingStats {
    pub by_location: Mode<String>,
    pub by_month: Mode<u32>,
    pub by_weekday: Mode<Weekday>,
    pub by_hour: Mode<u32>,
}

pub fn compute_stats(records: &[SightingRecord]) -> SightingStats {
    SightingStats {
        by_location: mode(records.iter().map(|r| r.location.clone())),
        by_month: mode(records.iter().map(|r| r.month)),
        by_weekday: mode(records.iter().map(|r| r.weekday)),
        by_hour: mode(records.iter().map(record_hour)),
    }
}

/// Which record set the summary statistics are computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StatsScope {
    /// Always the filtered set, even when it is empty.
    FilteredOnly,
    /// The filtered set, or the full set when the filter excludes everything.
    #[default]
    FallbackToAll,
}

impl StatsScope {
    pub fn select<'a>(
        self,
        filtered: &'a [SightingRecord],
        all: &'a [SightingRecord],
    ) -> &'a [SightingRecord] {
        match self {
            StatsScope::FallbackToAll if filtered.is_empty() => all,
            _ => filtered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(location: Option<&str>, time: Option<&str>, month: u32) -> SightingRecord {
        SightingRecord {
            location: location.map(str::to_string),
            time: time.map(str::to_string),
            ..SightingRecord::default()
        }
        .with_date(2025, Some(month), Some(1))
    }

    #[test]
    fn test_empty_input_yields_sentinels() {
        let stats = compute_stats(&[]);
        assert_eq!(stats, SightingStats::default());
        assert_eq!(stats.by_location.to_string(), "N/A (0)");
    }

    #[test]
    fn test_all_null_fields_yield_sentinels() {
        let records = vec![SightingRecord::default(), SightingRecord::default()];
        let stats = compute_stats(&records);
        assert_eq!(stats.by_location, Mode::default());
        assert_eq!(stats.by_month, Mode::default());
        assert_eq!(stats.by_weekday, Mode::default());
        assert_eq!(stats.by_hour, Mode::default());
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let records: Vec<_> = ["A", "B", "A", "B"]
            .iter()
            .map(|loc| at(Some(loc), None, 1))
            .collect();
        let stats = compute_stats(&records);
        assert_eq!(stats.by_location.value.as_deref(), Some("A"));
        assert_eq!(stats.by_location.count, 2);
    }

    #[test]
    fn test_tie_uses_first_occurrence_not_numeric_order() {
        let records = vec![
            at(None, None, 9),
            at(None, None, 3),
            at(None, None, 3),
            at(None, None, 9),
        ];
        assert_eq!(
            compute_stats(&records).by_month,
            Mode {
                value: Some(9),
                count: 2
            }
        );
    }

    #[test]
    fn test_hour_mode_skips_unknown_and_unparseable() {
        let records = vec![
            at(Some("A"), Some("不明"), 1),
            at(Some("A"), Some("不明"), 1),
            at(Some("A"), Some("夕方"), 1),
            at(Some("A"), Some("18:10"), 1),
            at(Some("A"), Some("7:00"), 1),
            at(Some("A"), Some("18:45"), 1),
        ];
        assert_eq!(
            compute_stats(&records).by_hour,
            Mode {
                value: Some(18),
                count: 2
            }
        );
    }

    #[test]
    fn test_strict_majority_beats_earlier_value() {
        let records = vec![
            at(Some("A"), None, 1),
            at(Some("B"), None, 1),
            at(Some("B"), None, 1),
        ];
        let stats = compute_stats(&records);
        assert_eq!(stats.by_location.to_string(), "B (2)");
    }

    #[test]
    fn test_stats_scope_selection() {
        let all = vec![at(Some("A"), None, 1)];
        let empty: Vec<SightingRecord> = Vec::new();
        assert_eq!(StatsScope::FallbackToAll.select(&empty, &all).len(), 1);
        assert!(StatsScope::FilteredOnly.select(&empty, &all).is_empty());
        assert_eq!(StatsScope::FilteredOnly.select(&all, &empty).len(), 1);
    }
}
