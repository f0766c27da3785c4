use crate::config::ColumnMap;
use crate::record::{SightingRecord, SightingType, Weekday};
use log::debug;

/// A scalar cell value as delivered by the sheet feed.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// Text form of the cell. Integral numbers render without a fractional
    /// part so an id of `12` reads as `"12"`, not `"12.0"`. Blank text is `None`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            CellValue::Bool(b) => Some(b.to_string()),
        }
    }

    /// Finite numeric value, parsing text cells. NaN and infinities are `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Bool(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    pub fn as_i64(&self) -> Option<i64> {
        let value = self.as_f64()?;
        (value.fract() == 0.0).then_some(value as i64)
    }
}

/// One sparse, positionally indexed row. Out-of-range and empty columns read as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<Option<CellValue>>,
}

impl RawRow {
    pub fn new(cells: Vec<Option<CellValue>>) -> Self {
        Self { cells }
    }

    pub fn cell(&self, idx: usize) -> Option<&CellValue> {
        self.cells.get(idx).and_then(Option::as_ref)
    }

    pub fn set(&mut self, idx: usize, value: CellValue) {
        if self.cells.len() <= idx {
            self.cells.resize(idx + 1, None);
        }
        self.cells[idx] = Some(value);
    }
}

/// Japanese weekday token in the sheet to the local token used by records.
pub const WEEKDAY_TRANSLATION: [(&str, &str); 7] = [
    ("月", "월"),
    ("火", "화"),
    ("水", "수"),
    ("木", "목"),
    ("金", "금"),
    ("土", "토"),
    ("日", "일"),
];

/// Translates a source weekday token. Unknown tokens pass through unchanged.
pub fn translate_weekday(token: &str) -> &str {
    let token = token.trim();
    WEEKDAY_TRANSLATION
        .iter()
        .find(|(source, _)| *source == token)
        .map(|(_, local)| *local)
        .unwrap_or(token)
}

/// A substring rule: any marker found in the text selects `category`.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    pub markers: &'static [&'static str],
    pub category: SightingType,
}

impl CategoryRule {
    pub fn matches(&self, text: &str) -> bool {
        self.markers.iter().any(|marker| text.contains(marker))
    }
}

/// Category rules in priority order. The first matching rule wins, so text
/// mentioning both a family and a suspected sighting is a family sighting.
pub const CATEGORY_RULES: [CategoryRule; 5] = [
    CategoryRule {
        markers: &["가족", "親子"],
        category: SightingType::FamilySighting,
    },
    CategoryRule {
        markers: &["사살", "駆除", "捕獲"],
        category: SightingType::Captured,
    },
    CategoryRule {
        markers: &["흔적", "痕跡", "糞", "足跡"],
        category: SightingType::TracksFound,
    },
    CategoryRule {
        markers: &["사상", "人身", "負傷"],
        category: SightingType::Attack,
    },
    CategoryRule {
        markers: &["추정", "可能性", "疑い"],
        category: SightingType::PossibleSighting,
    },
];

/// Runs `rules` top to bottom against `text`. Empty or missing text, and
/// text no rule recognises, resolves to `SightingType::Sighting`.
pub fn classify(text: Option<&str>, rules: &[CategoryRule]) -> SightingType {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return SightingType::default();
    };
    rules
        .iter()
        .find(|rule| rule.matches(text))
        .map(|rule| rule.category)
        .unwrap_or_default()
}

pub fn normalize_sighting_type(text: Option<&str>) -> SightingType {
    classify(text, &CATEGORY_RULES)
}

/// Turns raw sheet rows into validated records using a fixed column map.
#[derive(Debug, Clone)]
pub struct Normalizer {
    columns: ColumnMap,
    default_year: i32,
}

impl Normalizer {
    pub fn new(columns: ColumnMap, default_year: i32) -> Self {
        Self {
            columns,
            default_year,
        }
    }

    /// Builds a record from one row, or `None` when the row has no usable
    /// coordinates.
    pub fn normalize_row(&self, row: &RawRow) -> Option<SightingRecord> {
        let cols = &self.columns;
        let latitude = row.cell(cols.latitude)?.as_f64()?;
        let longitude = row.cell(cols.longitude)?.as_f64()?;

        let text = |idx: usize| row.cell(idx).and_then(CellValue::as_text);
        let int = |idx: usize| row.cell(idx).and_then(CellValue::as_i64);

        let year = int(cols.year)
            .and_then(|y| i32::try_from(y).ok())
            .filter(|y| *y != 0)
            .unwrap_or(self.default_year);
        let month = int(cols.month).and_then(|m| u32::try_from(m).ok());
        let day = int(cols.day).and_then(|d| u32::try_from(d).ok());
        let weekday = text(cols.weekday)
            .and_then(|token| Weekday::from_local_token(translate_weekday(&token)));

        let record = SightingRecord {
            id: text(cols.id),
            weekday,
            time: text(cols.time),
            location: text(cols.location),
            address: text(cols.address),
            description: text(cols.description),
            sighting_type: normalize_sighting_type(text(cols.sighting_type).as_deref()),
            latitude,
            longitude,
            ..SightingRecord::default()
        };
        Some(record.with_date(year, month, day))
    }

    /// Normalizes every row, silently dropping the ones without coordinates.
    /// `None` entries are rows the sheet returned without cells; they still
    /// count toward source row numbers, which start at `first_row`.
    pub fn normalize_rows(&self, rows: &[Option<RawRow>], first_row: usize) -> Normalized {
        let mut out = Normalized::default();
        for (offset, row) in rows.iter().enumerate() {
            let Some(row) = row else { continue };
            match self.normalize_row(row) {
                Some(record) => out.records.push(record),
                None => {
                    let index = first_row + offset;
                    debug!("Skipping row {}: missing or invalid coordinates", index);
                    out.skipped_rows.push(index);
                }
            }
        }

        debug!("Normalized {} of {} rows", out.records.len(), rows.len());
        out
    }
}

/// Result of a batch normalization.
#[derive(Debug, Default)]
pub struct Normalized {
    pub records: Vec<SightingRecord>,
    /// Source row numbers of rows dropped for missing or invalid coordinates.
    pub skipped_rows: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn base_row() -> RawRow {
        let cols = ColumnMap::default();
        let mut row = RawRow::default();
        row.set(cols.id, CellValue::Number(17.0));
        row.set(cols.year, CellValue::Number(2025.0));
        row.set(cols.month, CellValue::Number(7.0));
        row.set(cols.day, CellValue::Number(3.0));
        row.set(cols.weekday, text("木"));
        row.set(cols.time, text("9:30"));
        row.set(cols.location, text("南区"));
        row.set(cols.address, text("藤野3条"));
        row.set(cols.description, text("道路を横断"));
        row.set(cols.sighting_type, text("目撃"));
        row.set(cols.latitude, CellValue::Number(42.95));
        row.set(cols.longitude, CellValue::Number(141.31));
        row
    }

    fn normalizer() -> Normalizer {
        Normalizer::new(ColumnMap::default(), 2025)
    }

    #[test]
    fn test_normalize_full_row() {
        let record = normalizer().normalize_row(&base_row()).unwrap();
        assert_eq!(record.id.as_deref(), Some("17"));
        assert_eq!(record.date.as_deref(), Some("2025-07-03"));
        assert_eq!(record.weekday, Some(Weekday::Thursday));
        assert_eq!(record.time.as_deref(), Some("9:30"));
        assert_eq!(record.location.as_deref(), Some("南区"));
        assert_eq!(record.sighting_type, SightingType::Sighting);
        assert_eq!(record.latitude, 42.95);
        assert_eq!(record.longitude, 141.31);
    }

    #[test]
    fn test_rows_without_valid_coordinates_are_dropped() {
        let cols = ColumnMap::default();
        let mut missing_lat = base_row();
        missing_lat.cells[cols.latitude] = None;
        let mut bad_lng = base_row();
        bad_lng.set(cols.longitude, text("unknown"));
        let mut nan_lat = base_row();
        nan_lat.set(cols.latitude, CellValue::Number(f64::NAN));
        let mut text_coords = base_row();
        text_coords.set(cols.latitude, text(" 43.06 "));
        text_coords.set(cols.longitude, text("141.35"));

        let rows: Vec<_> = [base_row(), missing_lat, bad_lng, nan_lat, text_coords]
            .into_iter()
            .map(Some)
            .collect();
        let out = normalizer().normalize_rows(&rows, 4);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[1].latitude, 43.06);
        assert_eq!(out.skipped_rows, vec![5, 6, 7]);
    }

    #[test]
    fn test_rows_without_cells_keep_source_numbering() {
        let mut missing_lat = base_row();
        missing_lat.cells[ColumnMap::default().latitude] = None;

        let rows = vec![Some(base_row()), None, Some(missing_lat)];
        let out = normalizer().normalize_rows(&rows, 4);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.skipped_rows, vec![6]);
    }

    #[test]
    fn test_empty_row_is_dropped() {
        assert!(normalizer().normalize_row(&RawRow::default()).is_none());
    }

    #[test]
    fn test_missing_year_uses_default() {
        let mut row = base_row();
        row.cells[ColumnMap::default().year] = None;
        let record = Normalizer::new(ColumnMap::default(), 2024)
            .normalize_row(&row)
            .unwrap();
        assert_eq!(record.year, 2024);
        assert_eq!(record.date.as_deref(), Some("2024-07-03"));
    }

    #[test]
    fn test_unknown_weekday_token_yields_none() {
        let mut row = base_row();
        row.set(ColumnMap::default().weekday, text("祝"));
        let record = normalizer().normalize_row(&row).unwrap();
        assert_eq!(record.weekday, None);
    }

    #[test]
    fn test_translate_weekday() {
        assert_eq!(translate_weekday("月"), "월");
        assert_eq!(translate_weekday(" 日 "), "일");
        assert_eq!(translate_weekday("Mon"), "Mon");
    }

    #[test]
    fn test_category_rules_in_priority_order() {
        assert_eq!(
            normalize_sighting_type(Some("親子の可能性")),
            SightingType::FamilySighting
        );
        assert_eq!(
            normalize_sighting_type(Some("곰 가족 추정 목격")),
            SightingType::FamilySighting
        );
        assert_eq!(
            normalize_sighting_type(Some("足跡、駆除済み")),
            SightingType::Captured
        );
        assert_eq!(normalize_sighting_type(Some("糞")), SightingType::TracksFound);
        assert_eq!(normalize_sighting_type(Some("人身被害")), SightingType::Attack);
        assert_eq!(
            normalize_sighting_type(Some("クマの疑い")),
            SightingType::PossibleSighting
        );
        assert_eq!(normalize_sighting_type(Some("目撃")), SightingType::Sighting);
        assert_eq!(normalize_sighting_type(Some("   ")), SightingType::Sighting);
        assert_eq!(normalize_sighting_type(None), SightingType::Sighting);
    }

    #[test]
    fn test_classify_with_custom_rules() {
        let rules = [CategoryRule {
            markers: &["tracks"],
            category: SightingType::TracksFound,
        }];
        assert_eq!(classify(Some("fresh tracks"), &rules), SightingType::TracksFound);
        assert_eq!(classify(Some("가족"), &rules), SightingType::Sighting);
    }

    #[test]
    fn test_round_trip_from_record_fields() {
        let original = normalizer().normalize_row(&base_row()).unwrap();

        let cols = ColumnMap::default();
        let mut row = RawRow::default();
        row.set(cols.id, text(original.id.as_deref().unwrap()));
        row.set(cols.year, CellValue::Number(f64::from(original.year)));
        row.set(cols.month, CellValue::Number(f64::from(original.month.unwrap())));
        row.set(cols.day, CellValue::Number(f64::from(original.day.unwrap())));
        row.set(cols.weekday, text(original.weekday.unwrap().local_token()));
        row.set(cols.time, text(original.time.as_deref().unwrap()));
        row.set(cols.location, text(original.location.as_deref().unwrap()));
        row.set(cols.address, text(original.address.as_deref().unwrap()));
        row.set(cols.description, text(original.description.as_deref().unwrap()));
        row.set(cols.sighting_type, text("곰 흔적 확인"));
        row.set(cols.latitude, CellValue::Number(original.latitude));
        row.set(cols.longitude, CellValue::Number(original.longitude));

        let rebuilt = normalizer().normalize_row(&row).unwrap();
        assert_eq!(
            rebuilt,
            SightingRecord {
                sighting_type: SightingType::TracksFound,
                ..original
            }
        );
    }

    #[test]
    fn test_cell_value_conversions() {
        assert_eq!(CellValue::Number(12.0).as_text().as_deref(), Some("12"));
        assert_eq!(CellValue::Number(12.5).as_text().as_deref(), Some("12.5"));
        assert_eq!(text("  ").as_text(), None);
        assert_eq!(text("7").as_i64(), Some(7));
        assert_eq!(CellValue::Number(7.5).as_i64(), None);
        assert_eq!(CellValue::Bool(true).as_f64(), None);
        assert_eq!(text("inf").as_f64(), None);
    }
}
