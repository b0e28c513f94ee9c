//! CSV-backed table source.
//!
//! Loads the four master tables from one data directory and keeps the last
//! snapshot. The snapshot is reused while the requested generation and the
//! files' size and modification time are unchanged.

use crate::domain::errors::DashboardError;
use crate::domain::ports::TableSource;
use crate::domain::tables::{
    CAMPAIGN_TABLE, Generation, INFLUENCER_TABLE, PERFORMANCE_TABLE, PRODUCT_TABLE, TableSet,
};
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;
use tracing::{debug, info};

/// File locations of the four tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePaths {
    pub products: PathBuf,
    pub influencers: PathBuf,
    pub campaigns: PathBuf,
    pub performance: PathBuf,
}

impl TablePaths {
    /// Standard file names under `data_dir`
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Self {
            products: dir.join(format!("{PRODUCT_TABLE}.csv")),
            influencers: dir.join(format!("{INFLUENCER_TABLE}.csv")),
            campaigns: dir.join(format!("{CAMPAIGN_TABLE}.csv")),
            performance: dir.join(format!("{PERFORMANCE_TABLE}.csv")),
        }
    }

    fn all(&self) -> [(&'static str, &Path); 4] {
        [
            (PRODUCT_TABLE, self.products.as_path()),
            (INFLUENCER_TABLE, self.influencers.as_path()),
            (CAMPAIGN_TABLE, self.campaigns.as_path()),
            (PERFORMANCE_TABLE, self.performance.as_path()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    len: u64,
    modified: Option<SystemTime>,
}

struct CachedSnapshot {
    generation: Generation,
    stamps: Vec<FileStamp>,
    tables: Arc<TableSet>,
}

pub struct CsvTableSource {
    paths: TablePaths,
    cache: RwLock<Option<CachedSnapshot>>,
}

impl CsvTableSource {
    pub fn new(paths: TablePaths) -> Self {
        Self {
            paths,
            cache: RwLock::new(None),
        }
    }

    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(TablePaths::in_dir(data_dir))
    }

    pub fn paths(&self) -> &TablePaths {
        &self.paths
    }

    fn stamps(&self) -> Result<Vec<FileStamp>, DashboardError> {
        self.paths
            .all()
            .iter()
            .map(|&(table, path)| match fs::metadata(path) {
                Ok(meta) => Ok(FileStamp {
                    len: meta.len(),
                    modified: meta.modified().ok(),
                }),
                Err(e) if e.kind() == ErrorKind::NotFound => Err(DashboardError::MissingSource {
                    table,
                    path: path.to_path_buf(),
                }),
                Err(e) => Err(DashboardError::io(path, e)),
            })
            .collect()
    }

    fn load(&self) -> Result<TableSet, DashboardError> {
        let tables = TableSet::new(
            read_table(PRODUCT_TABLE, &self.paths.products)?,
            read_table(INFLUENCER_TABLE, &self.paths.influencers)?,
            read_table(CAMPAIGN_TABLE, &self.paths.campaigns)?,
            read_table(PERFORMANCE_TABLE, &self.paths.performance)?,
        );
        info!(
            "Loaded tables: {} products, {} influencers, {} campaigns, {} performance rows",
            tables.products.len(),
            tables.influencers.len(),
            tables.campaigns.len(),
            tables.performance.len()
        );
        Ok(tables)
    }
}

impl TableSource for CsvTableSource {
    fn snapshot(&self, generation: Generation) -> Result<Arc<TableSet>, DashboardError> {
        let stamps = self.stamps()?;

        {
            let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(cached) = cache.as_ref()
                && cached.generation == generation
                && cached.stamps == stamps
            {
                debug!("Serving cached snapshot (generation {})", generation.value());
                return Ok(Arc::clone(&cached.tables));
            }
        }

        let tables = Arc::new(self.load()?);
        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        *cache = Some(CachedSnapshot {
            generation,
            stamps,
            tables: Arc::clone(&tables),
        });
        Ok(tables)
    }
}

/// Deserialize one CSV table by header; extra columns are ignored
pub fn read_table<T: DeserializeOwned>(
    table: &'static str,
    path: &Path,
) -> Result<Vec<T>, DashboardError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(DashboardError::MissingSource {
                table,
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(DashboardError::io(path, e)),
    };

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(file);
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: T = result.map_err(|e| DashboardError::malformed(table, e))?;
        rows.push(row);
    }
    debug!("Read {} rows from {:?}", rows.len(), path);
    Ok(rows)
}
