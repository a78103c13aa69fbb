//! Industry-analysis dashboard data: records, feed fetch, and table sorting.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::streaming::{fetch_with_progress, FetchRequest, FetchTransport, StreamingResult};

/// Path of the industry feed relative to the API base URL.
pub const INDUSTRY_DATA_PATH: &str = "/api/industry-data";

/// Name of the benchmark row shown above the industry table.
pub const BENCHMARK_NAME: &str = "S&P 500";

/// Trailing ETF returns and current P/E for one industry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EtfRoi {
    /// One-day return (%)
    #[serde(rename = "1D")]
    pub one_day: Option<f64>,
    /// Five-day return (%)
    #[serde(rename = "5D")]
    pub five_day: Option<f64>,
    /// One-month return (%)
    #[serde(rename = "1M")]
    pub one_month: Option<f64>,
    /// Three-month return (%)
    #[serde(rename = "3M")]
    pub three_month: Option<f64>,
    /// Six-month return (%)
    #[serde(rename = "6M")]
    pub six_month: Option<f64>,
    /// One-year return (%)
    #[serde(rename = "1Y")]
    pub one_year: Option<f64>,
    /// Current price/earnings ratio
    pub pe_today: Option<f64>,
}

/// One row of the industry table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndustryData {
    /// Display name; [`BENCHMARK_NAME`] marks the benchmark row
    pub industry_name: String,
    /// Short commentary shown in the row preview
    #[serde(default)]
    pub preview_summary: String,
    /// ETF performance, absent when the feed has no ETF for the industry
    pub etf_roi: Option<EtfRoi>,
    /// Highest P/E over the past year
    pub pe_high_1y: Option<f64>,
    /// Lowest P/E over the past year
    pub pe_low_1y: Option<f64>,
    /// Share of constituents above their 200-day moving average (%)
    pub market_breadth_200d: Option<f64>,
}

/// Envelope returned by the industry feed endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndustryFeed {
    /// Rows in server order, benchmark included
    pub data: Vec<IndustryData>,
}

/// Fetches the industry feed, forwarding transfer progress to `on_progress`.
///
/// # Errors
///
/// Propagates any fetch or parse error from [`fetch_with_progress`].
pub fn fetch_industry_data<Tr, P>(
    transport: &Tr,
    config: &ClientConfig,
    on_progress: P,
) -> StreamingResult<Vec<IndustryData>>
where
    Tr: FetchTransport + ?Sized,
    P: FnMut(u32),
{
    let request = FetchRequest::get(config.endpoint(INDUSTRY_DATA_PATH));
    let feed: IndustryFeed = fetch_with_progress(transport, &request, on_progress)?;
    tracing::debug!(rows = feed.data.len(), "loaded industry feed");
    Ok(feed.data)
}

/// Separates the benchmark row from the industry rows.
///
/// The benchmark is the first row named [`BENCHMARK_NAME`]; every row not so
/// named is returned in its original order.
#[must_use]
pub fn split_benchmark(rows: Vec<IndustryData>) -> (Option<IndustryData>, Vec<IndustryData>) {
    let mut benchmark = None;
    let mut industries = Vec::with_capacity(rows.len());
    for row in rows {
        if row.industry_name == BENCHMARK_NAME {
            if benchmark.is_none() {
                benchmark = Some(row);
            }
        } else {
            industries.push(row);
        }
    }
    (benchmark, industries)
}

/// Sortable table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    /// Industry name, compared as text
    #[serde(rename = "industry_name")]
    IndustryName,
    /// [`EtfRoi::one_day`]
    #[serde(rename = "1D")]
    OneDay,
    /// [`EtfRoi::five_day`]
    #[serde(rename = "5D")]
    FiveDay,
    /// [`EtfRoi::one_month`]
    #[serde(rename = "1M")]
    OneMonth,
    /// [`EtfRoi::three_month`]
    #[serde(rename = "3M")]
    ThreeMonth,
    /// [`EtfRoi::six_month`]
    #[serde(rename = "6M")]
    SixMonth,
    /// [`EtfRoi::one_year`]
    #[serde(rename = "1Y")]
    OneYear,
    /// [`EtfRoi::pe_today`]
    #[serde(rename = "pe_today")]
    PeToday,
    /// [`IndustryData::market_breadth_200d`]
    #[serde(rename = "market_breadth_200d")]
    MarketBreadth200d,
}

/// Sort order of the industry table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first (the default)
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    /// Column being sorted
    pub key: SortKey,
    /// Sort order
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::IndustryName,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortConfig {
    /// Config after the user clicks the header for `key`.
    ///
    /// Clicking the active ascending column flips it to descending; anything
    /// else sorts `key` ascending.
    #[must_use]
    pub fn request_sort(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        Self { key, direction }
    }

    /// Header arrow for `key`, if it is the active column.
    #[must_use]
    pub fn indicator(&self, key: SortKey) -> Option<&'static str> {
        if self.key != key {
            return None;
        }
        Some(match self.direction {
            SortDirection::Ascending => " ▲",
            SortDirection::Descending => " ▼",
        })
    }
}

enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
}

fn sort_value(row: &IndustryData, key: SortKey) -> Option<SortValue<'_>> {
    let roi = |pick: fn(&EtfRoi) -> Option<f64>| row.etf_roi.as_ref().and_then(pick);
    let number = match key {
        SortKey::IndustryName => return Some(SortValue::Text(&row.industry_name)),
        SortKey::MarketBreadth200d => row.market_breadth_200d,
        SortKey::PeToday => roi(|r| r.pe_today),
        SortKey::OneDay => roi(|r| r.one_day),
        SortKey::FiveDay => roi(|r| r.five_day),
        SortKey::OneMonth => roi(|r| r.one_month),
        SortKey::ThreeMonth => roi(|r| r.three_month),
        SortKey::SixMonth => roi(|r| r.six_month),
        SortKey::OneYear => roi(|r| r.one_year),
    };
    number.map(SortValue::Number)
}

fn compare_rows(a: &IndustryData, b: &IndustryData, config: SortConfig) -> Ordering {
    let ordering = match (sort_value(a, config.key), sort_value(b, config.key)) {
        // Missing values stay at the bottom in either direction.
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(SortValue::Text(x)), Some(SortValue::Text(y))) => x.cmp(y),
        (Some(SortValue::Number(x)), Some(SortValue::Number(y))) => {
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        _ => Ordering::Equal,
    };
    match config.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Returns `rows` sorted for display. The sort is stable.
#[must_use]
pub fn sort_industries(rows: &[IndustryData], config: SortConfig) -> Vec<IndustryData> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| compare_rows(a, b, config));
    sorted
}
