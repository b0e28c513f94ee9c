use crate::domain::merged::{MergedRecord, merge_tables};
use crate::domain::records::Influencer;
use crate::domain::tables::TableSet;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

/// Inclusive calendar-day range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Earliest to latest valid post date; `None` when no record has one
    pub fn observed(records: &[MergedRecord<'_>]) -> Option<Self> {
        let mut dates = records.iter().filter_map(|r| r.post_date);
        let first = dates.next()?;
        let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self::new(start, end))
    }
}

/// Selection applied to merged performance records
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceFilter {
    pub campaign_ids: BTreeSet<String>,
    pub product_names: BTreeSet<String>,
    pub date_range: Option<DateRange>,
}

impl PerformanceFilter {
    pub fn new<C, P>(campaign_ids: C, product_names: P, date_range: Option<DateRange>) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            campaign_ids: campaign_ids.into_iter().map(Into::into).collect(),
            product_names: product_names.into_iter().map(Into::into).collect(),
            date_range,
        }
    }

    /// Every campaign, every product, and the full dated span of the merge
    pub fn select_all(tables: &TableSet) -> Self {
        let merged = merge_tables(tables);
        Self {
            campaign_ids: tables.campaign_ids().into_iter().collect(),
            product_names: tables.product_names().into_iter().collect(),
            date_range: DateRange::observed(&merged),
        }
    }

    /// Nothing can match until at least one campaign and one product are chosen
    pub fn requires_selection(&self) -> bool {
        self.campaign_ids.is_empty() || self.product_names.is_empty()
    }

    pub fn matches(
        &self,
        campaign_id: &str,
        product_name: Option<&str>,
        post_date: Option<NaiveDate>,
    ) -> bool {
        if !self.campaign_ids.contains(campaign_id) {
            return false;
        }
        match product_name {
            Some(name) if self.product_names.contains(name) => {}
            _ => return false,
        }
        match (self.date_range, post_date) {
            (None, _) => true,
            (Some(range), Some(date)) => range.contains(date),
            (Some(_), None) => false,
        }
    }
}

/// Influencer search used for seeding selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedingFilter {
    /// Empty means every category
    pub categories: BTreeSet<String>,
    pub min_followers: u64,
    pub max_followers: u64,
    pub min_fit_score: f64,
    pub max_fit_score: f64,
}

impl SeedingFilter {
    /// Defaults covering every influencer: all categories, observed bounds
    pub fn full_range(influencers: &[Influencer]) -> Self {
        let categories = influencers
            .iter()
            .map(|i| i.main_category.clone())
            .collect();
        let min_followers = influencers.iter().map(|i| i.follower_count).min().unwrap_or(0);
        let max_followers = influencers
            .iter()
            .map(|i| i.follower_count)
            .max()
            .unwrap_or(u64::MAX);
        let (min_fit_score, max_fit_score) = influencers
            .iter()
            .map(|i| i.genai_brand_fit_score)
            .fold(None, |acc: Option<(f64, f64)>, s| match acc {
                None => Some((s, s)),
                Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
            })
            .unwrap_or((1.0, 5.0));

        Self {
            categories,
            min_followers,
            max_followers,
            min_fit_score,
            max_fit_score,
        }
    }

    pub fn matches(&self, influencer: &Influencer) -> bool {
        let category_ok =
            self.categories.is_empty() || self.categories.contains(&influencer.main_category);
        category_ok
            && (self.min_followers..=self.max_followers).contains(&influencer.follower_count)
            && influencer.genai_brand_fit_score >= self.min_fit_score
            && influencer.genai_brand_fit_score <= self.max_fit_score
    }
}
