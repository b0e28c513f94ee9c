use crate::domain::records::{Campaign, Influencer, PerformanceRecord, Product};
use std::collections::HashMap;

pub const PRODUCT_TABLE: &str = "product_master";
pub const INFLUENCER_TABLE: &str = "influencer_master";
pub const CAMPAIGN_TABLE: &str = "campaign_master";
pub const PERFORMANCE_TABLE: &str = "campaign_performance";

/// Token identifying one state of the backing store.
///
/// Every mutation hands out a fresh generation; a table source holding a
/// snapshot from an older generation reloads before serving it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn initial() -> Self {
        Generation(0)
    }

    pub fn new(value: u64) -> Self {
        Generation(value)
    }

    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Immutable snapshot of all four tables
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    pub products: Vec<Product>,
    pub influencers: Vec<Influencer>,
    pub campaigns: Vec<Campaign>,
    pub performance: Vec<PerformanceRecord>,
}

impl TableSet {
    pub fn new(
        products: Vec<Product>,
        influencers: Vec<Influencer>,
        campaigns: Vec<Campaign>,
        performance: Vec<PerformanceRecord>,
    ) -> Self {
        Self {
            products,
            influencers,
            campaigns,
            performance,
        }
    }

    pub fn product_by_name(&self, product_name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.product_name == product_name)
    }

    /// Distinct product names in table order
    pub fn product_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for product in &self.products {
            if !names.contains(&product.product_name) {
                names.push(product.product_name.clone());
            }
        }
        names
    }

    pub fn campaign_ids(&self) -> Vec<String> {
        self.campaigns.iter().map(|c| c.campaign_id.clone()).collect()
    }

    pub(crate) fn campaign_index(&self) -> HashMap<&str, &Campaign> {
        first_by_key(&self.campaigns, |c| c.campaign_id.as_str())
    }

    pub(crate) fn product_index(&self) -> HashMap<&str, &Product> {
        first_by_key(&self.products, |p| p.product_id.as_str())
    }

    pub(crate) fn influencer_index(&self) -> HashMap<&str, &Influencer> {
        first_by_key(&self.influencers, |i| i.inf_id.as_str())
    }
}

// Keys are unique by contract; on a duplicate the first row wins.
fn first_by_key<'a, T>(rows: &'a [T], key: impl Fn(&'a T) -> &'a str) -> HashMap<&'a str, &'a T> {
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        index.entry(key(row)).or_insert(row);
    }
    index
}
