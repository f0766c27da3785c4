//! Display strings for the three supported languages.
//!
//! The core modules only deal in enums and numbers; everything a user
//! reads is looked up here.

use crate::filter::{FilterSelection, HourFilter};
use crate::record::{SightingType, Weekday};
use crate::stats::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Language {
    #[default]
    Ko,
    Ja,
    En,
}

impl Language {
    fn pick(self, ko: &'static str, ja: &'static str, en: &'static str) -> &'static str {
        match self {
            Language::Ko => ko,
            Language::Ja => ja,
            Language::En => en,
        }
    }
}

/// Fixed captions used by the summary output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caption {
    All,
    Visible,
    Area,
    ActiveFilters,
    TopArea,
    TopMonth,
    TopWeekday,
    TopHour,
    RecentActivity,
    NoRecentUpdates,
    DataUnavailable,
}

pub fn caption(caption: Caption, lang: Language) -> &'static str {
    match caption {
        Caption::All => lang.pick("전체", "全て", "All"),
        Caption::Visible => lang.pick("표시 중", "表示中", "Showing"),
        Caption::Area => lang.pick("지역", "地域", "Area"),
        Caption::ActiveFilters => lang.pick("적용 중인 조건", "適用中の条件", "Active filters"),
        Caption::TopArea => lang.pick("최다 출몰 지역", "最多出没地域", "Top area"),
        Caption::TopMonth => lang.pick("최다 출몰 월", "最多出没月", "Top month"),
        Caption::TopWeekday => lang.pick("최다 출몰 요일", "最多出没曜日", "Top weekday"),
        Caption::TopHour => lang.pick("최다 출몰 시간대", "最多出没時間帯", "Top hour"),
        Caption::RecentActivity => lang.pick("최근 출몰", "最近の出没", "Recent activity"),
        Caption::NoRecentUpdates => lang.pick(
            "최근 업데이트가 없습니다",
            "最近の更新はありません",
            "No recent updates",
        ),
        Caption::DataUnavailable => lang.pick(
            "데이터를 불러올 수 없습니다. 구글 시트가 공개 설정되어 있는지 확인해주세요.",
            "データを読み込めません。Googleシートが公開設定になっているか確認してください。",
            "Could not load data. Check that the Google Sheet is shared publicly.",
        ),
    }
}

pub fn category_label(kind: SightingType, lang: Language) -> &'static str {
    match kind {
        SightingType::Sighting => lang.pick("곰 목격", "クマ目撃", "Bear sighting"),
        SightingType::TracksFound => lang.pick("곰 흔적 확인", "クマの痕跡確認", "Bear tracks found"),
        SightingType::Captured => lang.pick("곰 사살", "クマ駆除", "Bear culled"),
        SightingType::FamilySighting => {
            lang.pick("곰 가족 목격", "親子グマ目撃", "Bear family sighting")
        }
        SightingType::PossibleSighting => {
            lang.pick("곰 추정 목격", "クマ目撃の可能性", "Possible bear sighting")
        }
        SightingType::Attack => lang.pick("곰에 의한 사상", "クマによる人身被害", "Bear-related injury"),
    }
}

/// Marker glyph for a category.
pub fn category_emoji(kind: SightingType) -> &'static str {
    match kind {
        SightingType::Sighting => "🐻",
        SightingType::TracksFound => "👣",
        SightingType::Captured => "🔴",
        SightingType::FamilySighting => "🐻🐻",
        SightingType::PossibleSighting => "⚫",
        SightingType::Attack => "🤕",
    }
}

pub fn weekday_label(day: Weekday, lang: Language) -> String {
    match lang {
        Language::Ko => format!("{}요일", day.local_token()),
        Language::Ja => {
            const NAMES: [&str; 7] = ["月", "火", "水", "木", "金", "土", "日"];
            format!("{}曜日", NAMES[day as usize])
        }
        Language::En => format!("{day:?}"),
    }
}

pub fn month_label(month: u32, lang: Language) -> String {
    const EN: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    match lang {
        Language::Ko => format!("{month}월"),
        Language::Ja => format!("{month}月"),
        Language::En => month
            .checked_sub(1)
            .and_then(|idx| EN.get(idx as usize))
            .map_or_else(|| format!("Month {month}"), |name| name.to_string()),
    }
}

pub fn hour_label(hour: HourFilter, lang: Language) -> String {
    match hour {
        HourFilter::Hour(h) => {
            let next = h.saturating_add(1);
            match lang {
                Language::Ko => format!("{h}시~{next}시"),
                Language::Ja => format!("{h}時~{next}時"),
                Language::En => format!("{h}:00-{next}:00"),
            }
        }
        HourFilter::Unknown => lang.pick("시간 미상", "時間不明", "Unknown time").to_string(),
    }
}

fn count_suffix(count: usize, lang: Language) -> String {
    match lang {
        Language::Ko => format!("({count}건)"),
        Language::Ja => format!("({count}件)"),
        Language::En => format!("({count})"),
    }
}

/// `"<value> (<count>)"`, or `"N/A"` for an empty dimension.
pub fn mode_label<T>(mode: &Mode<T>, lang: Language, label: impl Fn(&T) -> String) -> String {
    match &mode.value {
        Some(value) => format!("{} {}", label(value), count_suffix(mode.count, lang)),
        None => format!("N/A {}", count_suffix(0, lang)),
    }
}

/// One tag per active constraint, or a single "all" tag when nothing is set.
pub fn filter_tags(selection: &FilterSelection, lang: Language) -> Vec<String> {
    let mut tags = Vec::new();
    if let Some(location) = &selection.location {
        tags.push(location.clone());
    }
    if let Some(year) = selection.year {
        tags.push(match lang {
            Language::Ko => format!("{year}년"),
            Language::Ja => format!("{year}年"),
            Language::En => year.to_string(),
        });
    }
    if let Some(month) = selection.month {
        tags.push(month_label(month, lang));
    }
    if let Some(day) = selection.weekday {
        tags.push(weekday_label(day, lang));
    }
    if let Some(hour) = selection.hour {
        tags.push(hour_label(hour, lang));
    }
    if let Some(kind) = selection.sighting_type {
        tags.push(format!("{} {}", category_emoji(kind), category_label(kind, lang)));
    }

    if tags.is_empty() {
        tags.push(caption(Caption::All, lang).to_string());
    }
    tags
}

pub fn selected_area(selection: &FilterSelection, lang: Language) -> String {
    selection
        .location
        .clone()
        .unwrap_or_else(|| caption(Caption::All, lang).to_string())
}
