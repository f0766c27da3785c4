use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Closed set of sighting classifications. Free text from the sheet is
/// resolved into one of these by `normalize::normalize_sighting_type`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, clap::ValueEnum,
)]
pub enum SightingType {
    #[default]
    Sighting,
    TracksFound,
    Captured,
    FamilySighting,
    PossibleSighting,
    Attack,
}

impl SightingType {
    pub const ALL: [SightingType; 6] = [
        SightingType::Sighting,
        SightingType::TracksFound,
        SightingType::Captured,
        SightingType::FamilySighting,
        SightingType::PossibleSighting,
        SightingType::Attack,
    ];
}

/// Day of week. The sheet carries Japanese single-character tokens; the
/// normalizer translates them to the local (Korean) tokens used here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Single-character local token, e.g. `월` for Monday.
    pub fn local_token(self) -> &'static str {
        match self {
            Weekday::Monday => "월",
            Weekday::Tuesday => "화",
            Weekday::Wednesday => "수",
            Weekday::Thursday => "목",
            Weekday::Friday => "금",
            Weekday::Saturday => "토",
            Weekday::Sunday => "일",
        }
    }

    pub fn from_local_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|day| day.local_token() == token.trim())
    }

    /// From a 1-based position, Monday = 1.
    pub fn from_number(number: u32) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|idx| Self::ALL.get(idx as usize).copied())
    }
}

/// One normalized sighting report. Built once per data refresh and never
/// mutated afterwards; filtering only derives subsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SightingRecord {
    pub id: Option<String>,
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
    /// Zero-padded `YYYY-MM-DD`, present only when year/month/day form a real date.
    pub date: Option<String>,
    pub weekday: Option<Weekday>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub sighting_type: SightingType,
    pub latitude: f64,
    pub longitude: f64,
    /// Epoch milliseconds of local midnight on `date`. Only used for recency ordering.
    #[serde(skip)]
    pub timestamp: Option<i64>,
}

impl Default for SightingRecord {
    fn default() -> Self {
        Self {
            id: None,
            year: 0,
            month: None,
            day: None,
            date: None,
            weekday: None,
            time: None,
            location: None,
            address: None,
            description: None,
            sighting_type: SightingType::default(),
            latitude: 0.0,
            longitude: 0.0,
            timestamp: None,
        }
    }
}

impl SightingRecord {
    /// Sets year/month/day and re-derives `date` and `timestamp` from them.
    pub fn with_date(mut self, year: i32, month: Option<u32>, day: Option<u32>) -> Self {
        self.year = year;
        self.month = month.filter(|m| (1..=12).contains(m));
        self.day = day;

        let calendar = match (self.month, self.day) {
            (Some(m), Some(d)) => NaiveDate::from_ymd_opt(year, m, d),
            _ => None,
        };
        self.date = calendar.map(|d| d.format("%Y-%m-%d").to_string());
        self.timestamp = calendar.and_then(local_midnight_millis);
        self
    }
}

pub fn local_midnight_millis(date: NaiveDate) -> Option<i64> {
    date.and_time(NaiveTime::MIN)
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.timestamp_millis())
}
