use crate::config::{FeedConfig, RowSkip};
use crate::error::{ConfigError, FeedError};
use crate::normalize::{CellValue, Normalizer, RawRow};
use crate::record::SightingRecord;
use log::{debug, error, info, warn};
use rand::Rng;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

/// Progress of one ingestion run, reported to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedStatus {
    Loading,
    /// A transient failure; another attempt follows after `delay`.
    Retrying {
        attempt: u32,
        max_retries: u32,
        delay: Duration,
        reason: String,
    },
    Ready {
        records: usize,
    },
    Unavailable {
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
struct GvizResponse {
    status: Option<String>,
    #[serde(default)]
    errors: Vec<GvizMessage>,
    table: Option<GvizTable>,
}

#[derive(Debug, Deserialize)]
struct GvizMessage {
    reason: Option<String>,
    detailed_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GvizTable {
    #[serde(default)]
    rows: Vec<GvizRow>,
}

#[derive(Debug, Deserialize)]
struct GvizRow {
    c: Option<Vec<Option<GvizCell>>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    v: Option<Value>,
    f: Option<String>,
}

impl GvizCell {
    /// Scalars map directly. Structured values such as time-of-day arrays
    /// fall back to the sheet's formatted text.
    fn into_cell_value(self) -> Option<CellValue> {
        match self.v {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => n.as_f64().map(CellValue::Number),
            Some(Value::String(s)) => Some(CellValue::Text(s)),
            Some(Value::Bool(b)) => Some(CellValue::Bool(b)),
            Some(_) => self.f.map(CellValue::Text),
        }
    }
}

/// Removes the fixed-length non-JSON framing around the payload.
pub fn strip_envelope(body: &str, prefix: usize, suffix: usize) -> Result<&str, FeedError> {
    let end = body
        .len()
        .checked_sub(suffix)
        .filter(|end| *end >= prefix)
        .ok_or_else(|| {
            FeedError::Envelope(format!(
                "response of {} bytes is shorter than its {}+{} byte framing",
                body.len(),
                prefix,
                suffix
            ))
        })?;
    body.get(prefix..end).ok_or_else(|| {
        FeedError::Envelope("framing does not end on a character boundary".to_string())
    })
}

/// Parses a framed feed body into table rows. Rows without a cell list
/// are kept as `None` so row indices stay aligned with the sheet.
pub fn parse_table(
    body: &str,
    prefix: usize,
    suffix: usize,
) -> Result<Vec<Option<RawRow>>, FeedError> {
    let payload = strip_envelope(body, prefix, suffix)?;
    let response: GvizResponse = serde_json::from_str(payload)?;

    if response.status.as_deref() == Some("error") {
        let reasons: Vec<String> = response
            .errors
            .into_iter()
            .filter_map(|e| e.detailed_message.or(e.reason))
            .collect();
        return Err(FeedError::Sheet(reasons.join("; ")));
    }

    let table = response
        .table
        .ok_or_else(|| FeedError::Envelope("payload has no table".to_string()))?;

    Ok(table
        .rows
        .into_iter()
        .map(|row| {
            row.c.map(|cells| {
                RawRow::new(
                    cells
                        .into_iter()
                        .map(|cell| cell.and_then(GvizCell::into_cell_value))
                        .collect(),
                )
            })
        })
        .collect())
}

/// Index of the first data row under `skip`.
pub fn data_start(rows: &[Option<RawRow>], skip: RowSkip, latitude_column: usize) -> usize {
    match skip {
        RowSkip::Fixed { offset } => offset.min(rows.len()),
        RowSkip::SniffHeader => {
            let is_header = rows.first().and_then(Option::as_ref).is_some_and(|row| {
                row.cell(latitude_column)
                    .is_some_and(|cell| cell.as_f64().is_none())
            });
            usize::from(is_header)
        }
    }
}

/// Fetches the sighting sheet with a timeout and bounded retries, and
/// normalizes it into records.
pub struct SheetFeed {
    client: Client,
    url: Url,
    pub(crate) base_delay: Duration,
    pub(crate) max_retries: u32,
    timeout: Duration,
    envelope_prefix: usize,
    envelope_suffix: usize,
    skip: RowSkip,
    latitude_column: usize,
    normalizer: Normalizer,
}

impl SheetFeed {
    pub fn from_config(config: &FeedConfig) -> Result<Self, ConfigError> {
        let url = config.feed_url()?;
        let client = Client::builder()
            .user_agent(concat!("higuma/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url,
            base_delay: Duration::from_millis(config.retry_delay_ms),
            max_retries: config.max_retries,
            timeout: config.timeout(),
            envelope_prefix: config.envelope_prefix,
            envelope_suffix: config.envelope_suffix,
            skip: config.skip,
            latitude_column: config.columns.latitude,
            normalizer: Normalizer::new(config.columns.clone(), config.default_year),
        })
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.base_delay = Duration::from_millis(delay_ms);
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Exponential backoff with jitter: `2^attempt * base + rand(0..base)`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as u64;
        let jitter = if base_ms > 0 {
            rand::rng().random_range(0..base_ms)
        } else {
            0
        };
        Duration::from_millis(2_u64.saturating_pow(attempt).saturating_mul(base_ms) + jitter)
    }

    /// Runs one ingestion: fetch, retry transient failures, parse and
    /// normalize. Any error is terminal for the whole run.
    pub async fn load<F>(&self, mut on_status: F) -> Result<Vec<SightingRecord>, FeedError>
    where
        F: FnMut(&FeedStatus),
    {
        on_status(&FeedStatus::Loading);

        let mut attempt = 0;
        let body = loop {
            match self.fetch_body().await {
                Ok(body) => break body,
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.backoff_delay(attempt);
                    warn!(
                        "Feed request failed ({}), retrying (attempt {}) after {}ms",
                        e,
                        attempt + 1,
                        delay.as_millis()
                    );
                    on_status(&FeedStatus::Retrying {
                        attempt,
                        max_retries: self.max_retries,
                        delay,
                        reason: e.to_string(),
                    });
                    sleep(delay).await;
                }
                Err(e) => return Err(self.fail(e, &mut on_status)),
            }
        };

        let rows = match parse_table(&body, self.envelope_prefix, self.envelope_suffix) {
            Ok(rows) => rows,
            Err(e) => return Err(self.fail(e, &mut on_status)),
        };

        let start = data_start(&rows, self.skip, self.latitude_column);
        debug!("Table has {} rows, data starts at row {}", rows.len(), start);
        let data_rows = &rows[start..];
        let records = self.normalizer.normalize_rows(data_rows, start).records;

        info!(
            "Loaded {} sighting records from {} data rows",
            records.len(),
            data_rows.iter().flatten().count()
        );
        on_status(&FeedStatus::Ready {
            records: records.len(),
        });
        Ok(records)
    }

    fn fail<F>(&self, e: FeedError, on_status: &mut F) -> FeedError
    where
        F: FnMut(&FeedStatus),
    {
        error!("Sighting feed unavailable: {}", e);
        on_status(&FeedStatus::Unavailable {
            reason: e.to_string(),
        });
        e
    }

    async fn fetch_body(&self) -> Result<String, FeedError> {
        let response = self
            .client
            .get(self.url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }
        response.text().await.map_err(|e| self.request_error(e))
    }

    fn request_error(&self, e: reqwest::Error) -> FeedError {
        if e.is_timeout() {
            FeedError::Timeout(self.timeout)
        } else {
            FeedError::Transport(e)
        }
    }
}
