pub mod campaign_store;
pub mod csv_tables;

pub use campaign_store::CsvCampaignStore;
pub use csv_tables::{CsvTableSource, TablePaths};
