//! Investment-strategy dashboard data.
//!
//! Each strategy exposes an introduction document and a performance document
//! under the strategy service URL. Chart fields hold serialized chart
//! definitions and are passed through untouched.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::streaming::{fetch_with_progress, FetchRequest, FetchTransport, StreamingResult};

/// Metrics shown as headline cards, in display order.
pub const KPI_METRICS: [&str; 6] = [
    "annualized_return",
    "volatility",
    "sharpe_ratio",
    "max_drawdown",
    "alpha",
    "beta",
];

/// Metrics shown in the statistical summary table, in display order.
pub const SUMMARY_METRICS: [&str; 5] = [
    "total_return",
    "best_month",
    "worst_month",
    "pos_month_pct",
    "corr",
];

const METRIC_LABELS: [(&str, &str); 11] = [
    ("annualized_return", "年化報酬"),
    ("volatility", "波動度"),
    ("sharpe_ratio", "夏普值"),
    ("max_drawdown", "最大回檔"),
    ("alpha", "Monthly Alpha"),
    ("beta", "Beta"),
    ("total_return", "累積總報酬"),
    ("best_month", "最佳單月"),
    ("worst_month", "最差單月"),
    ("pos_month_pct", "正報酬月數比"),
    ("corr", "與大盤相關性"),
];

/// One card of the risk-management framework.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFrameworkItem {
    /// Icon name
    pub icon: String,
    /// Card heading
    pub title: String,
    /// Card body text
    pub desc: String,
}

/// Introduction document for one strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyIntroData {
    /// Strategy identifier
    pub strategy_name: String,
    /// Overview paragraph
    #[serde(default)]
    pub description: String,
    /// Key/value rows of the fact sheet
    #[serde(default)]
    pub info_table: Vec<(String, String)>,
    /// Bullet points of the investment philosophy
    #[serde(default)]
    pub philosophy: Vec<String>,
    /// Serialized asset allocation chart
    #[serde(default)]
    pub asset_allocation_chart: String,
    /// Serialized sector allocation chart
    #[serde(default)]
    pub sector_allocation_chart: String,
    /// Serialized component returns chart
    #[serde(default)]
    pub components_bar_chart: String,
    /// Risk-management framework cards
    #[serde(default)]
    pub risk_framework: Vec<RiskFrameworkItem>,
}

/// Performance document for one strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyPerformanceData {
    /// Strategy identifier
    pub strategy_name: String,
    /// Preformatted metric values keyed by metric name
    #[serde(default)]
    pub performance_metrics: BTreeMap<String, String>,
    /// Serialized cumulative performance chart
    #[serde(default)]
    pub performance_chart: String,
    /// Serialized monthly returns heatmap
    #[serde(default)]
    pub heatmap_chart: String,
}

/// A metric ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    /// Metric name as sent by the server
    pub key: String,
    /// Display label
    pub label: String,
    /// Preformatted value
    pub value: String,
}

/// Performance metrics split into headline cards and summary rows.
///
/// Metrics in neither list are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionedMetrics {
    /// Entries from [`KPI_METRICS`] that the server returned
    pub kpi: Vec<Metric>,
    /// Entries from [`SUMMARY_METRICS`] that the server returned
    pub summary: Vec<Metric>,
}

/// Fetches `/strategies/{name}/intro` from the strategy service.
///
/// # Errors
///
/// Propagates any fetch or parse error from [`fetch_with_progress`].
pub fn fetch_strategy_intro<Tr, P>(
    transport: &Tr,
    config: &ClientConfig,
    strategy_name: &str,
    on_progress: P,
) -> StreamingResult<StrategyIntroData>
where
    Tr: FetchTransport + ?Sized,
    P: FnMut(u32),
{
    let url = config.strategy_endpoint(&format!("/strategies/{strategy_name}/intro"));
    fetch_with_progress(transport, &FetchRequest::get(url), on_progress)
}

/// Fetches `/strategies/{name}/performance` from the strategy service.
///
/// # Errors
///
/// Propagates any fetch or parse error from [`fetch_with_progress`].
pub fn fetch_strategy_performance<Tr, P>(
    transport: &Tr,
    config: &ClientConfig,
    strategy_name: &str,
    on_progress: P,
) -> StreamingResult<StrategyPerformanceData>
where
    Tr: FetchTransport + ?Sized,
    P: FnMut(u32),
{
    let url = config.strategy_endpoint(&format!("/strategies/{strategy_name}/performance"));
    let data: StrategyPerformanceData =
        fetch_with_progress(transport, &FetchRequest::get(url), on_progress)?;
    tracing::debug!(
        strategy = %data.strategy_name,
        metrics = data.performance_metrics.len(),
        "loaded strategy performance"
    );
    Ok(data)
}

/// Display label for a metric; unknown keys get underscores replaced by spaces.
#[must_use]
pub fn metric_label(key: &str) -> Cow<'static, str> {
    METRIC_LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map_or_else(|| Cow::Owned(key.replace('_', " ")), |(_, label)| Cow::Borrowed(*label))
}

fn collect_metrics(metrics: &BTreeMap<String, String>, keys: &[&str]) -> Vec<Metric> {
    keys.iter()
        .filter_map(|&key| {
            metrics.get(key).map(|value| Metric {
                key: key.to_string(),
                label: metric_label(key).into_owned(),
                value: value.clone(),
            })
        })
        .collect()
}

/// Splits the performance metrics into KPI and summary groups.
#[must_use]
pub fn partition_metrics(data: &StrategyPerformanceData) -> PartitionedMetrics {
    PartitionedMetrics {
        kpi: collect_metrics(&data.performance_metrics, &KPI_METRICS),
        summary: collect_metrics(&data.performance_metrics, &SUMMARY_METRICS),
    }
}

/// Page title for a strategy slug: dashes become spaces and each word starts
/// upper-case, e.g. `global-growth` → `Global Growth`.
#[must_use]
pub fn format_strategy_title(slug: &str) -> String {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    let mut title = String::with_capacity(slug.len());
    let mut prev_word = false;
    for c in slug.chars() {
        let c = if c == '-' { ' ' } else { c };
        if is_word(c) && !prev_word {
            title.push(c.to_ascii_uppercase());
        } else {
            title.push(c);
        }
        prev_word = is_word(c);
    }
    title
}
