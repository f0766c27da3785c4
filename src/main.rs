mod parse;
mod util;

use crate::parse::Args;
use crate::util::{now_millis, print_hms};
use clap::Parser;
use higuma::config::AppConfig;
use higuma::error::FeedError;
use higuma::export;
use higuma::feed::{FeedStatus, SheetFeed};
use higuma::filter::HourFilter;
use higuma::labels::{self, Caption, Language, caption};
use higuma::record::SightingRecord;
use higuma::store::SightingStore;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

fn status_message(status: &FeedStatus) -> String {
    match status {
        FeedStatus::Loading => "Loading sightings...".to_string(),
        FeedStatus::Retrying {
            attempt,
            max_retries,
            delay,
            reason,
        } => format!(
            "Feed degraded ({}), retry {}/{} in {}ms",
            reason,
            attempt,
            max_retries,
            delay.as_millis()
        ),
        FeedStatus::Ready { records } => format!("Loaded {} sightings", records),
        FeedStatus::Unavailable { reason } => format!("Feed unavailable: {}", reason),
    }
}

async fn load_with_spinner(feed: &SheetFeed) -> Result<Vec<SightingRecord>, FeedError> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    feed.load(|status| match status {
        FeedStatus::Ready { .. } => spinner.finish_with_message(status_message(status)),
        FeedStatus::Unavailable { .. } => spinner.abandon_with_message(status_message(status)),
        _ => spinner.set_message(status_message(status)),
    })
    .await
}

fn print_recent(store: &SightingStore, config: &AppConfig, lang: Language, limit: usize) {
    println!(
        "\n{} ({} {}):",
        caption(Caption::RecentActivity, lang),
        config.recent_days,
        match lang {
            Language::Ko => "일",
            Language::Ja => "日",
            Language::En => "days",
        }
    );

    let recent = store.recent(now_millis(), config.recent_window());
    if recent.is_empty() {
        println!("  {}", caption(Caption::NoRecentUpdates, lang));
        return;
    }
    for record in recent.iter().take(limit) {
        println!(
            "  {} {:<6} {} {} {}",
            record.date.as_deref().unwrap_or("-"),
            record.time.as_deref().unwrap_or(""),
            record.location.as_deref().unwrap_or("-"),
            labels::category_emoji(record.sighting_type),
            labels::category_label(record.sighting_type, lang),
        );
    }
}

pub fn print_summary(
    store: &SightingStore,
    config: &AppConfig,
    lang: Language,
    recent_limit: usize,
) {
    if store.all().is_empty() {
        println!("No sightings to summarize");
        return;
    }

    let selection = store.selection();
    println!("\nSummary:");
    println!(
        "{}: {} / {}  ({}: {})",
        caption(Caption::Visible, lang),
        store.filtered().len(),
        store.all().len(),
        caption(Caption::Area, lang),
        labels::selected_area(selection, lang)
    );
    println!(
        "{}: {}",
        caption(Caption::ActiveFilters, lang),
        labels::filter_tags(selection, lang)
            .iter()
            .map(|tag| format!("[{tag}]"))
            .collect::<Vec<_>>()
            .join(" ")
    );

    let stats = store.stats();
    println!(
        "{}: {}",
        caption(Caption::TopArea, lang),
        labels::mode_label(&stats.by_location, lang, String::clone)
    );
    println!(
        "{}: {}",
        caption(Caption::TopMonth, lang),
        labels::mode_label(&stats.by_month, lang, |m| labels::month_label(*m, lang))
    );
    println!(
        "{}: {}",
        caption(Caption::TopWeekday, lang),
        labels::mode_label(&stats.by_weekday, lang, |d| labels::weekday_label(*d, lang))
    );
    println!(
        "{}: {}",
        caption(Caption::TopHour, lang),
        labels::mode_label(&stats.by_hour, lang, |h| {
            labels::hour_label(HourFilter::Hour(*h), lang)
        })
    );

    print_recent(store, config, lang, recent_limit);
}

/// Re-fetches the feed on a fixed interval until Ctrl-C. Fetches run as
/// separate tasks; a response that finishes after a newer one is dropped.
async fn watch(feed: SheetFeed, mut store: SightingStore, every: Duration, lang: Language) {
    let feed = Arc::new(feed);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut ticker = tokio::time::interval(every);
    ticker.tick().await;

    info!("Watching {} every {}s", feed.url(), every.as_secs());
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let ticket = store.begin_refresh();
                let feed = Arc::clone(&feed);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = feed.load(|status| info!("{}", status_message(status))).await;
                    let _ = tx.send((ticket, result));
                });
            }
            Some((ticket, result)) = rx.recv() => match result {
                Ok(records) => {
                    if store.publish(ticket, records) {
                        println!(
                            "{}: {} / {}  [{}]",
                            caption(Caption::Visible, lang),
                            store.filtered().len(),
                            store.all().len(),
                            labels::filter_tags(store.selection(), lang).join(" ")
                        );
                    }
                }
                Err(e) => warn!("Refresh failed, keeping previous sightings: {}", e),
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping watch");
                break;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    // Initialize logger
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    args.apply_to(&mut config);

    let feed = SheetFeed::from_config(&config.feed)?;
    let mut store = SightingStore::new(config.stats_scope);
    store.set_selection(args.selection());

    let start = Instant::now();
    let ticket = store.begin_refresh();
    let records = match load_with_spinner(&feed).await {
        Ok(records) => records,
        Err(e) => {
            eprintln!("{}", caption(Caption::DataUnavailable, args.lang));
            return Err(e.into());
        }
    };
    store.publish(ticket, records);
    print_hms(&start);

    print_summary(&store, &config, args.lang, args.recent_limit);

    if let Some(output) = &args.output {
        export::save_to_csv(store.filtered(), output)?;
    }

    if let Some(secs) = args.watch {
        watch(feed, store, Duration::from_secs(secs.max(1)), args.lang).await;
    }

    Ok(())
}
