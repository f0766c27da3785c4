use crate::filter::{FilterSelection, HourFilter, apply_filters};
use crate::recent::recent_within;
use crate::record::{SightingRecord, SightingType, Weekday};
use crate::stats::{SightingStats, StatsScope, compute_stats};
use log::{debug, info, warn};
use std::time::Duration;

/// Identifies one ingestion run. Tickets are issued in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

/// A single change to the filter selection.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterUpdate {
    Year(Option<i32>),
    Month(Option<u32>),
    Weekday(Option<Weekday>),
    Hour(Option<HourFilter>),
    Location(Option<String>),
    SightingType(Option<SightingType>),
    ClearAll,
}

/// Owns the full record set, the current selection and the filtered subset
/// derived from them. The subset is recomputed in full on every change.
#[derive(Debug, Default)]
pub struct SightingStore {
    all: Vec<SightingRecord>,
    filtered: Vec<SightingRecord>,
    selection: FilterSelection,
    stats_scope: StatsScope,
    issued: u64,
    published: Option<RefreshTicket>,
}

impl SightingStore {
    pub fn new(stats_scope: StatsScope) -> Self {
        Self {
            stats_scope,
            ..Self::default()
        }
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Replaces the record set with the result of the run behind `ticket`.
    /// A response older than the last published one is dropped; returns
    /// whether the records were published.
    pub fn publish(&mut self, ticket: RefreshTicket, records: Vec<SightingRecord>) -> bool {
        if self.published.is_some_and(|latest| ticket <= latest) {
            warn!(
                "Ignoring stale refresh {:?}; {:?} already published",
                ticket, self.published
            );
            return false;
        }
        info!("Published {} records from refresh {:?}", records.len(), ticket);
        self.all = records;
        self.published = Some(ticket);
        self.recompute();
        true
    }

    pub fn set_selection(&mut self, selection: FilterSelection) {
        self.selection = selection;
        self.recompute();
    }

    pub fn update(&mut self, update: FilterUpdate) {
        let selection = &mut self.selection;
        match update {
            FilterUpdate::Year(year) => selection.year = year,
            FilterUpdate::Month(month) => selection.month = month,
            FilterUpdate::Weekday(day) => selection.weekday = day,
            FilterUpdate::Hour(hour) => selection.hour = hour,
            FilterUpdate::Location(location) => {
                selection.location = location.filter(|l| !l.trim().is_empty())
            }
            FilterUpdate::SightingType(kind) => selection.sighting_type = kind,
            FilterUpdate::ClearAll => *selection = FilterSelection::default(),
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.filtered = apply_filters(&self.all, &self.selection);
        debug!(
            "Filter {:?} keeps {} of {} records",
            self.selection,
            self.filtered.len(),
            self.all.len()
        );
    }

    pub fn all(&self) -> &[SightingRecord] {
        &self.all
    }

    pub fn filtered(&self) -> &[SightingRecord] {
        &self.filtered
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn stats(&self) -> SightingStats {
        compute_stats(self.stats_scope.select(&self.filtered, &self.all))
    }

    /// Recent-activity feed over the full record set, independent of filters.
    pub fn recent(&self, now_millis: i64, window: Duration) -> Vec<&SightingRecord> {
        recent_within(&self.all, now_millis, window)
    }
}
