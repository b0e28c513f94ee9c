//! Performance Aggregator
//!
//! `compute` runs the full pipeline for one filter selection:
//! join → filter → KPIs → breakdowns. It is a pure function of the table
//! snapshot and the filter; callers re-run it whenever either changes.

use crate::domain::filters::PerformanceFilter;
use crate::domain::merged::{MergedRecord, merge_tables};
use crate::domain::performance::{Breakdowns, DEFAULT_RANKING_LIMIT, KpiSummary};
use crate::domain::tables::TableSet;
use serde::Serialize;
use tracing::{debug, info};

/// Outcome of one aggregation run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", content = "report", rename_all = "snake_case")]
pub enum Aggregation<'a> {
    /// No campaign or no product chosen; nothing was computed
    SelectionRequired,
    Computed(PerformanceReport<'a>),
}

impl<'a> Aggregation<'a> {
    pub fn report(&self) -> Option<&PerformanceReport<'a>> {
        match self {
            Aggregation::Computed(report) => Some(report),
            Aggregation::SelectionRequired => None,
        }
    }

    pub fn into_report(self) -> Option<PerformanceReport<'a>> {
        match self {
            Aggregation::Computed(report) => Some(report),
            Aggregation::SelectionRequired => None,
        }
    }
}

/// Filtered records plus everything derived from them
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport<'a> {
    pub filter: PerformanceFilter,
    /// Rows before filtering, equal to the performance table size
    pub merged_count: usize,
    pub records: Vec<MergedRecord<'a>>,
    pub kpis: KpiSummary,
    pub breakdowns: Breakdowns,
}

impl PerformanceReport<'_> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PerformanceAggregator {
    ranking_limit: usize,
}

impl Default for PerformanceAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_RANKING_LIMIT)
    }
}

impl PerformanceAggregator {
    pub fn new(ranking_limit: usize) -> Self {
        Self { ranking_limit }
    }

    pub fn compute<'a>(&self, tables: &'a TableSet, filter: &PerformanceFilter) -> Aggregation<'a> {
        if filter.requires_selection() {
            info!(
                "Selection required: {} campaign(s), {} product(s) chosen",
                filter.campaign_ids.len(),
                filter.product_names.len()
            );
            return Aggregation::SelectionRequired;
        }

        let merged = merge_tables(tables);
        let merged_count = merged.len();
        let records: Vec<MergedRecord<'a>> = merged
            .into_iter()
            .filter(|r| filter.matches(r.campaign_id(), r.product_name(), r.post_date))
            .collect();
        debug!("Filter kept {} of {} merged records", records.len(), merged_count);

        let kpis = KpiSummary::calculate(&records);
        let breakdowns = Breakdowns::calculate(&records, self.ranking_limit);

        Aggregation::Computed(PerformanceReport {
            filter: filter.clone(),
            merged_count,
            records,
            kpis,
            breakdowns,
        })
    }
}

/// `compute` with the default ranking limit
pub fn compute<'a>(tables: &'a TableSet, filter: &PerformanceFilter) -> Aggregation<'a> {
    PerformanceAggregator::default().compute(tables, filter)
}
