//! Campaign master maintenance: registering and removing campaigns.
//!
//! Requests are validated against the current snapshot, then handed to the
//! [`CampaignStore`]. The generation returned by the store must be used for
//! the next snapshot so the aggregator sees the change.

use crate::domain::campaign_id::next_campaign_id;
use crate::domain::errors::{DashboardError, ValidationError};
use crate::domain::ports::CampaignStore;
use crate::domain::records::Campaign;
use crate::domain::tables::{Generation, TableSet};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

/// Form input for a new campaign
#[derive(Debug, Clone, PartialEq)]
pub struct NewCampaign {
    pub name: String,
    pub product_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_budget: Decimal,
}

impl NewCampaign {
    /// Checks the request against the product table, in form order
    pub fn validate(&self, tables: &TableSet) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if tables.product_by_name(&self.product_name).is_none() {
            return Err(ValidationError::UnknownProduct {
                product_name: self.product_name.clone(),
            });
        }
        if self.total_budget <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveBudget {
                budget: self.total_budget,
            });
        }
        if self.end_date < self.start_date {
            return Err(ValidationError::EndBeforeStart {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}

/// Outcome of a successful registration
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedCampaign {
    pub campaign: Campaign,
    pub generation: Generation,
}

/// Entry of the delete picker
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignChoice {
    pub campaign_id: String,
    pub label: String,
}

pub struct CampaignAdmin<S> {
    store: S,
    id_prefix: String,
}

impl<S: CampaignStore> CampaignAdmin<S> {
    pub fn new(store: S, id_prefix: impl Into<String>) -> Self {
        Self {
            store,
            id_prefix: id_prefix.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn add(&self, tables: &TableSet, request: &NewCampaign) -> Result<CreatedCampaign, DashboardError> {
        request.validate(tables)?;

        let product = tables
            .product_by_name(&request.product_name)
            .ok_or_else(|| ValidationError::UnknownProduct {
                product_name: request.product_name.clone(),
            })?;
        let campaign_id = next_campaign_id(
            &self.id_prefix,
            tables.campaigns.iter().map(|c| c.campaign_id.as_str()),
        )?;

        let campaign = Campaign {
            campaign_id,
            campaign_name: request.name.trim().to_string(),
            product_id: product.product_id.clone(),
            start_date: request.start_date,
            end_date: request.end_date,
            total_budget: request.total_budget,
        };
        let generation = self.store.append(&campaign)?;
        info!(
            "Registered campaign '{}' ({}) for product {}",
            campaign.campaign_name, campaign.campaign_id, campaign.product_id
        );

        Ok(CreatedCampaign {
            campaign,
            generation,
        })
    }

    pub fn delete(&self, tables: &TableSet, campaign_id: &str) -> Result<Generation, DashboardError> {
        if !tables.campaigns.iter().any(|c| c.campaign_id == campaign_id) {
            return Err(DashboardError::CampaignNotFound {
                campaign_id: campaign_id.to_string(),
            });
        }
        let generation = self.store.delete(campaign_id)?;
        info!("Deleted campaign {}", campaign_id);
        Ok(generation)
    }
}

/// Picker entries: `name (product | id)`, product left blank when unmatched
pub fn delete_choices(tables: &TableSet) -> Vec<CampaignChoice> {
    let products = tables.product_index();
    tables
        .campaigns
        .iter()
        .map(|c| {
            let product_name = products
                .get(c.product_id.as_str())
                .map(|p| p.product_name.as_str())
                .unwrap_or("");
            CampaignChoice {
                campaign_id: c.campaign_id.clone(),
                label: format!("{} ({} | {})", c.campaign_name, product_name, c.campaign_id),
            }
        })
        .collect()
}
