use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or mutating the dashboard tables
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Missing source table '{table}': {path} not found")]
    MissingSource { table: &'static str, path: PathBuf },

    #[error("Malformed table '{table}': {reason}")]
    MalformedTable { table: &'static str, reason: String },

    #[error("Campaign not found: {campaign_id}")]
    CampaignNotFound { campaign_id: String },

    #[error("Campaign id '{campaign_id}' has no numeric suffix, cannot derive the next id")]
    UnnumberedCampaignId { campaign_id: String },

    #[error("Campaign id '{campaign_id}' has a suffix too large to increment")]
    CampaignIdOutOfRange { campaign_id: String },

    #[error("Invalid campaign: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DashboardError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DashboardError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(table: &'static str, reason: impl ToString) -> Self {
        DashboardError::MalformedTable {
            table,
            reason: reason.to_string(),
        }
    }
}

/// Rejections of a new-campaign request
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Campaign name must not be empty")]
    EmptyName,

    #[error("Unknown product: {product_name}")]
    UnknownProduct { product_name: String },

    #[error("Budget must be positive, got {budget}")]
    NonPositiveBudget { budget: Decimal },

    #[error("End date {end} is before start date {start}")]
    EndBeforeStart {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}
