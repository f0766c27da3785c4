use clap::Parser;
use higuma::config::AppConfig;
use higuma::filter::{FilterSelection, HourFilter};
use higuma::labels::Language;
use higuma::record::{SightingType, Weekday};
use higuma::stats::StatsScope;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "higuma")]
#[command(about = "Load, filter and summarize brown bear sighting reports")]
#[command(version)]
pub(crate) struct Args {
    /// TOML config file; built-in defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Feed URL, overriding the configured sheet
    #[arg(long)]
    pub url: Option<String>,

    /// Only sightings from this year
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Only sightings from this month (1-12)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Only sightings on this weekday (1 = Monday ... 7 = Sunday)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=7))]
    pub weekday: Option<u32>,

    /// Only sightings reported within this hour (0-23)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24), conflicts_with = "unknown_time")]
    pub hour: Option<u32>,

    /// Only sightings whose time is marked unknown
    #[arg(long)]
    pub unknown_time: bool,

    /// Only sightings in this area
    #[arg(short, long)]
    pub location: Option<String>,

    /// Only sightings of this category
    #[arg(short = 't', long = "type", value_enum)]
    pub sighting_type: Option<SightingType>,

    /// Display language
    #[arg(long, value_enum, default_value_t = Language::Ko)]
    pub lang: Language,

    /// Maximum number of retry attempts
    #[arg(short, long)]
    pub retries: Option<u32>,

    /// Base delay between retries in milliseconds
    #[arg(short, long)]
    pub delay: Option<u64>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Trailing window of the recent-activity feed, in days
    #[arg(long)]
    pub recent_days: Option<u32>,

    /// Maximum number of recent sightings to print
    #[arg(long, default_value = "10")]
    pub recent_limit: usize,

    /// Record set the summary statistics are computed over
    #[arg(long, value_enum)]
    pub stats_scope: Option<StatsScope>,

    /// Write the filtered sightings to this CSV file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Keep running and re-fetch the feed every N seconds
    #[arg(long)]
    pub watch: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Command-line values take precedence over the config file.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(url) = &self.url {
            config.feed.url = Some(url.clone());
        }
        if let Some(retries) = self.retries {
            config.feed.max_retries = retries;
        }
        if let Some(delay) = self.delay {
            config.feed.retry_delay_ms = delay;
        }
        if let Some(timeout) = self.timeout {
            config.feed.timeout_secs = timeout;
        }
        if let Some(days) = self.recent_days {
            config.recent_days = days;
        }
        if let Some(scope) = self.stats_scope {
            config.stats_scope = scope;
        }
    }

    pub fn selection(&self) -> FilterSelection {
        let hour = if self.unknown_time {
            Some(HourFilter::Unknown)
        } else {
            self.hour.map(HourFilter::Hour)
        };
        FilterSelection {
            year: self.year,
            month: self.month,
            weekday: self.weekday.and_then(Weekday::from_number),
            hour,
            location: self.location.clone().filter(|l| !l.trim().is_empty()),
            sighting_type: self.sighting_type,
        }
    }
}
