use crate::domain::campaign_id::DEFAULT_CAMPAIGN_ID_PREFIX;
use crate::domain::performance::DEFAULT_RANKING_LIMIT;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_DATA_DIR: &str = "table";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Data directory must not be empty")]
    EmptyDataDir,

    #[error("Campaign id prefix must not be empty")]
    EmptyCampaignIdPrefix,

    #[error("Campaign id prefix '{prefix}' must not end with '-'")]
    TrailingSeparator { prefix: String },

    #[error("Ranking limit must be at least 1, got {limit}")]
    ZeroRankingLimit { limit: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Directory holding the four master tables
    pub data_dir: PathBuf,
    pub campaign_id_prefix: String,
    /// Rows kept in the campaign ROAS and influencer revenue rankings
    pub ranking_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            campaign_id_prefix: DEFAULT_CAMPAIGN_ID_PREFIX.to_string(),
            ranking_limit: DEFAULT_RANKING_LIMIT,
        }
    }
}

impl DashboardConfig {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        campaign_id_prefix: impl Into<String>,
        ranking_limit: usize,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            data_dir: data_dir.into(),
            campaign_id_prefix: campaign_id_prefix.into(),
            ranking_limit,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self> {
        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        let campaign_id_prefix = env::var("CAMPAIGN_ID_PREFIX")
            .unwrap_or_else(|_| DEFAULT_CAMPAIGN_ID_PREFIX.to_string());
        let ranking_limit = env::var("RANKING_LIMIT")
            .unwrap_or_else(|_| DEFAULT_RANKING_LIMIT.to_string())
            .parse::<usize>()
            .context("Failed to parse RANKING_LIMIT")?;

        Self::new(data_dir, campaign_id_prefix.trim(), ranking_limit)
            .context("Invalid dashboard configuration")
    }

    /// Same settings rooted at another data directory
    pub fn with_data_dir(self, data_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let config = Self {
            data_dir: data_dir.into(),
            ..self
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }
        if self.campaign_id_prefix.is_empty() {
            return Err(ConfigError::EmptyCampaignIdPrefix);
        }
        // The numeric suffix is joined with its own separator
        if self.campaign_id_prefix.ends_with('-') {
            return Err(ConfigError::TrailingSeparator {
                prefix: self.campaign_id_prefix.clone(),
            });
        }
        if self.ranking_limit == 0 {
            return Err(ConfigError::ZeroRankingLimit {
                limit: self.ranking_limit,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.data_dir, PathBuf::from("table"));
        assert_eq!(config.campaign_id_prefix, "DALBA-CAMP");
        assert_eq!(config.ranking_limit, 10);
    }

    #[test]
    fn test_invalid_settings() {
        assert_eq!(
            DashboardConfig::new("table", "", 10).unwrap_err(),
            ConfigError::EmptyCampaignIdPrefix
        );
        assert_eq!(
            DashboardConfig::new("table", "ACME-", 10).unwrap_err(),
            ConfigError::TrailingSeparator {
                prefix: "ACME-".to_string()
            }
        );
        assert_eq!(
            DashboardConfig::new("table", "ACME", 0).unwrap_err(),
            ConfigError::ZeroRankingLimit { limit: 0 }
        );
        assert_eq!(
            DashboardConfig::new("", "ACME", 5).unwrap_err(),
            ConfigError::EmptyDataDir
        );
    }

    #[test]
    fn test_with_data_dir_revalidates() {
        let config = DashboardConfig::default().with_data_dir("/srv/tables").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/tables"));
        assert!(DashboardConfig::default().with_data_dir("").is_err());
    }
}
