//! Denormalized performance rows.
//!
//! A merged record is a performance row left-joined to its campaign, the
//! campaign's product, and its influencer. Unmatched foreign keys leave the
//! joined side empty; no performance row is ever dropped by the join.

use crate::domain::records::{Campaign, Influencer, PerformanceRecord, Platform, Product};
use crate::domain::tables::TableSet;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MergedRecord<'a> {
    pub performance: &'a PerformanceRecord,
    /// Parsed `performance.post_date`; `None` when the raw value is not a date
    pub post_date: Option<NaiveDate>,
    pub campaign: Option<&'a Campaign>,
    pub product: Option<&'a Product>,
    pub influencer: Option<&'a Influencer>,
}

impl<'a> MergedRecord<'a> {
    pub fn campaign_id(&self) -> &'a str {
        &self.performance.campaign_id
    }

    pub fn campaign_name(&self) -> Option<&'a str> {
        self.campaign.map(|c| c.campaign_name.as_str())
    }

    pub fn product_name(&self) -> Option<&'a str> {
        self.product.map(|p| p.product_name.as_str())
    }

    pub fn category(&self) -> Option<&'a str> {
        self.product.map(|p| p.category.as_str())
    }

    pub fn inf_name(&self) -> Option<&'a str> {
        self.influencer.map(|i| i.inf_name.as_str())
    }

    pub fn platform(&self) -> Option<&'a Platform> {
        self.influencer.map(|i| &i.platform)
    }

    pub fn revenue(&self) -> Decimal {
        self.performance.revenue
    }

    pub fn actual_cost(&self) -> Decimal {
        self.performance.actual_cost
    }
}

/// Left-join every performance row; output order follows the performance table
pub fn merge_tables(tables: &TableSet) -> Vec<MergedRecord<'_>> {
    let campaigns = tables.campaign_index();
    let products = tables.product_index();
    let influencers = tables.influencer_index();

    tables
        .performance
        .iter()
        .map(|perf| {
            let campaign = campaigns.get(perf.campaign_id.as_str()).copied();
            let product = campaign.and_then(|c| products.get(c.product_id.as_str()).copied());
            let influencer = influencers.get(perf.inf_id.as_str()).copied();
            MergedRecord {
                performance: perf,
                post_date: parse_post_date(&perf.post_date),
                campaign,
                product,
                influencer,
            }
        })
        .collect()
}

/// Lenient calendar-day parse; unknown formats yield `None`
pub fn parse_post_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts.date());
        }
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|ts| ts.date_naive())
}

/// One output column of the flattened merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedColumn {
    /// Index of the contributing table in the input slice
    pub table: usize,
    pub source: String,
    pub name: String,
}

/// Resolve the flattened column list of a multi-table join.
///
/// Tables are `(suffix, columns)` in join order. A join key keeps only its
/// first occurrence. Any other name contributed by more than one table is
/// suffixed with `_{suffix}` on every occurrence.
pub fn merged_columns(tables: &[(&str, &[&str])], join_keys: &[&str]) -> Vec<MergedColumn> {
    let mut candidates: Vec<MergedColumn> = Vec::new();
    for (table, (_, columns)) in tables.iter().enumerate() {
        for column in columns.iter() {
            let is_join_key = join_keys.contains(column);
            if is_join_key && candidates.iter().any(|c| c.source == *column) {
                continue;
            }
            candidates.push(MergedColumn {
                table,
                source: column.to_string(),
                name: column.to_string(),
            });
        }
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for candidate in &candidates {
        *counts.entry(candidate.source.clone()).or_default() += 1;
    }

    let mut taken: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates.iter_mut() {
        let suffix = tables[candidate.table].0;
        let mut name = candidate.source.clone();
        if counts[&candidate.source] > 1 {
            name = format!("{}_{}", name, suffix);
        }
        while taken.contains(&name) {
            name = format!("{}_{}", name, suffix);
        }
        taken.push(name.clone());
        candidate.name = name;
    }
    candidates
}

/// Columns of the standard four-table merge
pub fn standard_merged_columns() -> Vec<MergedColumn> {
    merged_columns(
        &[
            ("perf", PerformanceRecord::COLUMNS),
            ("camp", Campaign::COLUMNS),
            ("prod", Product::COLUMNS),
            ("inf", Influencer::COLUMNS),
        ],
        &["campaign_id", "product_id", "inf_id"],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perf(id: &str, campaign_id: &str, inf_id: &str, post_date: &str) -> PerformanceRecord {
        PerformanceRecord {
            perf_id: id.to_string(),
            campaign_id: campaign_id.to_string(),
            inf_id: inf_id.to_string(),
            post_date: post_date.to_string(),
            post_url: String::new(),
            actual_cost: Decimal::from(100),
            impressions: 1000,
            clicks: 10,
            conversions: 1,
            revenue: Decimal::from(300),
            genai_comment_summary: String::new(),
        }
    }

    #[test]
    fn test_parse_post_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 7, 14);
        assert_eq!(parse_post_date("2025-07-14"), expected);
        assert_eq!(parse_post_date("2025/07/14"), expected);
        assert_eq!(parse_post_date("2025-07-14 09:30:00"), expected);
        assert_eq!(parse_post_date("2025-07-14T09:30:00"), expected);
        assert_eq!(parse_post_date("2025-07-14T09:30:00+09:00"), expected);
        assert_eq!(parse_post_date(" 2025-07-14 "), expected);
    }

    #[test]
    fn test_parse_post_date_garbage_is_none() {
        assert_eq!(parse_post_date(""), None);
        assert_eq!(parse_post_date("yesterday"), None);
        assert_eq!(parse_post_date("2025-13-40"), None);
    }

    #[test]
    fn test_left_join_keeps_unmatched_rows() {
        let tables = TableSet {
            performance: vec![
                perf("1", "missing-campaign", "missing-inf", "2025-01-02"),
                perf("2", "missing-campaign", "missing-inf", "not a date"),
            ],
            ..Default::default()
        };
        let merged = merge_tables(&tables);
        assert_eq!(merged.len(), 2);
        assert!(merged[0].campaign.is_none());
        assert!(merged[0].product.is_none());
        assert!(merged[0].influencer.is_none());
        assert_eq!(merged[0].campaign_id(), "missing-campaign");
        assert!(merged[0].post_date.is_some());
        assert!(merged[1].post_date.is_none());
    }

    #[test]
    fn test_standard_columns_have_no_collisions() {
        let columns = standard_merged_columns();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names.iter().filter(|n| **n == "campaign_id").count(), 1);
        assert_eq!(names.iter().filter(|n| **n == "product_id").count(), 1);
        assert_eq!(names.iter().filter(|n| **n == "inf_id").count(), 1);
        assert_eq!(names[0], "perf_id");
        assert!(names.contains(&"genai_brand_fit_reason"));
    }

    #[test]
    fn test_colliding_columns_get_table_suffix() {
        let perf_cols: &[&str] = &["perf_id", "inf_id", "note"];
        let inf_cols: &[&str] = &["inf_id", "note", "inf_name"];
        let columns = merged_columns(&[("perf", perf_cols), ("inf", inf_cols)], &["inf_id"]);
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["perf_id", "inf_id", "note_perf", "note_inf", "inf_name"]);
        assert_eq!(columns[3].table, 1);
        assert_eq!(columns[3].source, "note");
    }

    #[test]
    fn test_suffixing_never_reuses_an_existing_name() {
        let left: &[&str] = &["note", "note_a"];
        let right: &[&str] = &["note"];
        let columns = merged_columns(&[("a", left), ("b", right)], &[]);
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["note_a", "note_a_a", "note_b"]);
    }
}
