use crate::record::SightingRecord;
use std::time::Duration;

pub const DEFAULT_RECENT_WINDOW: Duration = Duration::from_secs(3 * 24 * 60 * 60);

/// Records dated within `window` before `now_millis`, most recent first.
/// Records without a date never qualify. Equal timestamps keep their input
/// order. An empty result means there is no recent activity.
pub fn recent_within(
    records: &[SightingRecord],
    now_millis: i64,
    window: Duration,
) -> Vec<&SightingRecord> {
    let window_millis = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
    let cutoff = now_millis.saturating_sub(window_millis);

    let mut recent: Vec<&SightingRecord> = records
        .iter()
        .filter(|r| r.timestamp.is_some_and(|ts| ts >= cutoff))
        .collect();
    recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    recent
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 24 * 60 * 60 * 1000;
    const NOW: i64 = 1_751_500_800_000;

    fn stamped(id: &str, timestamp: Option<i64>) -> SightingRecord {
        SightingRecord {
            id: Some(id.to_string()),
            timestamp,
            ..SightingRecord::default()
        }
    }

    #[test]
    fn test_only_records_inside_window() {
        let records = vec![stamped("old", Some(NOW - 4 * DAY)), stamped("new", Some(NOW - DAY))];
        let recent = recent_within(&records, NOW, DEFAULT_RECENT_WINDOW);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id.as_deref(), Some("new"));
    }

    #[test]
    fn test_most_recent_first_and_stable() {
        let records = vec![
            stamped("a", Some(NOW - 2 * DAY)),
            stamped("b", Some(NOW)),
            stamped("c", Some(NOW - 2 * DAY)),
            stamped("undated", None),
            stamped("edge", Some(NOW - 3 * DAY)),
        ];
        let ids: Vec<_> = recent_within(&records, NOW, DEFAULT_RECENT_WINDOW)
            .iter()
            .filter_map(|r| r.id.as_deref())
            .collect();
        assert_eq!(ids, vec!["b", "a", "c", "edge"]);
    }

    #[test]
    fn test_nothing_recent_is_empty() {
        let records = vec![stamped("old", Some(NOW - 10 * DAY))];
        assert!(recent_within(&records, NOW, DEFAULT_RECENT_WINDOW).is_empty());
        assert!(recent_within(&[], NOW, DEFAULT_RECENT_WINDOW).is_empty());
    }

    #[test]
    fn test_configurable_window() {
        let records = vec![stamped("week", Some(NOW - 6 * DAY))];
        let week = Duration::from_secs(7 * 24 * 60 * 60);
        assert_eq!(recent_within(&records, NOW, week).len(), 1);
    }
}
