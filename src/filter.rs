use crate::record::{SightingRecord, SightingType, Weekday};

/// Tokens meaning "time not known", in the sheet's languages. Matched as
/// substrings, ASCII case-insensitively.
pub const UNKNOWN_TIME_MARKERS: [&str; 5] = ["不明", "不詳", "미상", "모름", "unknown"];

pub fn is_unknown_time(time: &str) -> bool {
    let lowered = time.to_lowercase();
    UNKNOWN_TIME_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Leading integer before a colon, e.g. `9` from `"9:30"` or `"09:05頃"`.
pub fn extract_hour(time: &str) -> Option<u32> {
    let time = time.trim_start();
    let digits_end = time
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(time.len(), |(idx, _)| idx);
    if digits_end == 0 || !time[digits_end..].starts_with(':') {
        return None;
    }
    time[..digits_end].parse().ok()
}

/// Hour of a record's report time. Times carrying an unknown marker have no hour.
pub fn record_hour(record: &SightingRecord) -> Option<u32> {
    let time = record.time.as_deref()?;
    if is_unknown_time(time) {
        return None;
    }
    extract_hour(time)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourFilter {
    /// Report time falls in `[h:00, h+1:00)`.
    Hour(u32),
    /// Report time is explicitly marked as unknown.
    Unknown,
}

impl HourFilter {
    pub fn matches(self, record: &SightingRecord) -> bool {
        match self {
            HourFilter::Hour(hour) => record_hour(record) == Some(hour),
            HourFilter::Unknown => record.time.as_deref().is_some_and(is_unknown_time),
        }
    }
}

/// Independently optional constraints; `None` means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub weekday: Option<Weekday>,
    pub hour: Option<HourFilter>,
    pub location: Option<String>,
    pub sighting_type: Option<SightingType>,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        *self == FilterSelection::default()
    }

    /// True when the record satisfies every set constraint.
    pub fn matches(&self, record: &SightingRecord) -> bool {
        self.year.is_none_or(|year| record.year == year)
            && self.month.is_none_or(|month| record.month == Some(month))
            && self.weekday.is_none_or(|day| record.weekday == Some(day))
            && self.hour.is_none_or(|hour| hour.matches(record))
            && self
                .location
                .as_deref()
                .is_none_or(|location| record.location.as_deref() == Some(location))
            && self
                .sighting_type
                .is_none_or(|kind| record.sighting_type == kind)
    }
}

/// Records matching `selection`, in their original relative order.
pub fn apply_filters(records: &[SightingRecord], selection: &FilterSelection) -> Vec<SightingRecord> {
    records
        .iter()
        .filter(|record| selection.matches(record))
        .cloned()
        .collect()
}
