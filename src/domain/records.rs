//! Row types of the four source tables.
//!
//! Field names match the CSV column headers, so `csv` can deserialize
//! each table by header and ignore any extra columns.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub price: Decimal,
}

impl Product {
    pub const COLUMNS: &'static [&'static str] =
        &["product_id", "product_name", "category", "price"];
}

/// Social platform an influencer publishes on
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Instagram,
    YouTube,
    TikTok,
    /// Any value outside the known set, kept verbatim
    Other(String),
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        match value.trim() {
            "Instagram" => Platform::Instagram,
            "YouTube" => Platform::YouTube,
            "TikTok" => Platform::TikTok,
            _ => Platform::Other(value),
        }
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.to_string()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Instagram => write!(f, "Instagram"),
            Platform::YouTube => write!(f, "YouTube"),
            Platform::TikTok => write!(f, "TikTok"),
            Platform::Other(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Influencer {
    pub inf_id: String,
    pub inf_name: String,
    pub platform: Platform,
    pub follower_count: u64,
    pub avg_engagement_rate: f64,
    pub main_category: String,
    pub estimated_cost_per_post: Decimal,
    pub genai_brand_fit_score: f64,
    pub genai_brand_fit_reason: String,
}

impl Influencer {
    pub const COLUMNS: &'static [&'static str] = &[
        "inf_id",
        "inf_name",
        "platform",
        "follower_count",
        "avg_engagement_rate",
        "main_category",
        "estimated_cost_per_post",
        "genai_brand_fit_score",
        "genai_brand_fit_reason",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub campaign_id: String,
    pub campaign_name: String,
    pub product_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_budget: Decimal,
}

impl Campaign {
    pub const COLUMNS: &'static [&'static str] = &[
        "campaign_id",
        "campaign_name",
        "product_id",
        "start_date",
        "end_date",
        "total_budget",
    ];

    /// Label used by the performance filter: `name (id)`
    pub fn filter_label(&self) -> String {
        format!("{} ({})", self.campaign_name, self.campaign_id)
    }
}

/// One influencer post within a campaign.
///
/// `post_date` stays raw here; it is parsed during the merge so that a
/// bad date degrades to a missing value instead of failing the load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub perf_id: String,
    pub campaign_id: String,
    pub inf_id: String,
    pub post_date: String,
    pub post_url: String,
    pub actual_cost: Decimal,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub revenue: Decimal,
    pub genai_comment_summary: String,
}

impl PerformanceRecord {
    pub const COLUMNS: &'static [&'static str] = &[
        "perf_id",
        "campaign_id",
        "inf_id",
        "post_date",
        "post_url",
        "actual_cost",
        "impressions",
        "clicks",
        "conversions",
        "revenue",
        "genai_comment_summary",
    ];
}
