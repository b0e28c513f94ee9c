//! Direct edits of `campaign_master.csv`.
//!
//! Append adds one data row under the existing header, using the file's
//! own line terminator. Delete rewrites the whole file without the target
//! row; the rewrite goes through a temp file and a rename so a crash never
//! leaves a truncated table. Every other byte, including a leading BOM and
//! the original quoting, is copied through unchanged.
//!
//! There is no locking: two writers racing on the same file can lose each
//! other's changes.

use crate::domain::errors::DashboardError;
use crate::domain::ports::CampaignStore;
use crate::domain::records::Campaign;
use crate::domain::tables::{CAMPAIGN_TABLE, Generation};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub struct CsvCampaignStore {
    path: PathBuf,
    generation: AtomicU64,
}

impl CsvCampaignStore {
    /// Store over `path`; generations handed out continue after `current`
    pub fn new(path: impl Into<PathBuf>, current: Generation) -> Self {
        Self {
            path: path.into(),
            generation: AtomicU64::new(current.value()),
        }
    }

    pub fn in_dir(data_dir: impl AsRef<Path>, current: Generation) -> Self {
        Self::new(
            data_dir.as_ref().join(format!("{CAMPAIGN_TABLE}.csv")),
            current,
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn bump(&self) -> Generation {
        Generation::new(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn read_raw(&self) -> Result<Vec<u8>, DashboardError> {
        fs::read(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DashboardError::MissingSource {
                table: CAMPAIGN_TABLE,
                path: self.path.clone(),
            },
            _ => DashboardError::io(&self.path, e),
        })
    }
}

/// Header cell compared the way the loader sees it: BOM and padding ignored
fn header_name(cell: &[u8]) -> &[u8] {
    cell.strip_prefix(UTF8_BOM).unwrap_or(cell).trim_ascii()
}

/// First byte at or after `at` that is not part of a line break.
///
/// The reader reports a row as starting right after the previous row's
/// content, so the tail of a CRLF and any blank lines would otherwise be
/// attributed to the following row.
fn skip_line_breaks(raw: &[u8], mut at: usize) -> usize {
    while matches!(raw.get(at), Some(b'\r' | b'\n')) {
        at += 1;
    }
    at
}

/// CRLF when the file already uses it, LF otherwise
fn line_terminator(raw: &[u8]) -> csv::Terminator {
    if raw.windows(2).any(|w| w == b"\r\n") {
        csv::Terminator::CRLF
    } else {
        csv::Terminator::Any(b'\n')
    }
}

fn line_break(terminator: csv::Terminator) -> &'static [u8] {
    match terminator {
        csv::Terminator::CRLF => b"\r\n",
        _ => b"\n",
    }
}

/// Field value of `campaign` for a header column; unknown columns stay empty
fn campaign_field(campaign: &Campaign, column: &[u8]) -> String {
    match header_name(column) {
        b"campaign_id" => campaign.campaign_id.clone(),
        b"campaign_name" => campaign.campaign_name.clone(),
        b"product_id" => campaign.product_id.clone(),
        b"start_date" => campaign.start_date.to_string(),
        b"end_date" => campaign.end_date.to_string(),
        b"total_budget" => campaign.total_budget.to_string(),
        _ => String::new(),
    }
}

impl CampaignStore for CsvCampaignStore {
    fn append(&self, campaign: &Campaign) -> Result<Generation, DashboardError> {
        let raw = self.read_raw()?;
        let header = csv::ReaderBuilder::new()
            .from_reader(raw.as_slice())
            .byte_headers()
            .map_err(|e| DashboardError::malformed(CAMPAIGN_TABLE, e))?
            .clone();
        let record: Vec<String> = header.iter().map(|col| campaign_field(campaign, col)).collect();
        let terminator = line_terminator(&raw);

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| DashboardError::io(&self.path, e))?;
        if !raw.is_empty() && !raw.ends_with(b"\n") {
            file.write_all(line_break(terminator))
                .map_err(|e| DashboardError::io(&self.path, e))?;
        }
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(terminator)
            .from_writer(file);
        wtr.write_record(&record)
            .and_then(|_| wtr.flush().map_err(csv::Error::from))
            .map_err(|e| DashboardError::malformed(CAMPAIGN_TABLE, e))?;

        let generation = self.bump();
        info!(
            "Appended campaign {} to {:?} (generation {})",
            campaign.campaign_id,
            self.path,
            generation.value()
        );
        Ok(generation)
    }

    fn delete(&self, campaign_id: &str) -> Result<Generation, DashboardError> {
        let raw = self.read_raw()?;
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(raw.as_slice());
        let key = rdr
            .byte_headers()
            .map_err(|e| DashboardError::malformed(CAMPAIGN_TABLE, e))?
            .iter()
            .position(|h| header_name(h) == b"campaign_id")
            .ok_or_else(|| DashboardError::malformed(CAMPAIGN_TABLE, "no campaign_id column"))?;

        // Start offset of every data row, and whether it is the one to drop
        let mut rows: Vec<(usize, bool)> = Vec::new();
        for result in rdr.byte_records() {
            let record = result.map_err(|e| DashboardError::malformed(CAMPAIGN_TABLE, e))?;
            let start = record
                .position()
                .map(|p| skip_line_breaks(&raw, p.byte() as usize))
                .ok_or_else(|| DashboardError::malformed(CAMPAIGN_TABLE, "row without position"))?;
            rows.push((start, record.get(key) == Some(campaign_id.as_bytes())));
        }

        let removed = rows.iter().filter(|(_, target)| *target).count();
        if removed == 0 {
            return Err(DashboardError::CampaignNotFound {
                campaign_id: campaign_id.to_string(),
            });
        }

        let header_end = rows.first().map_or(raw.len(), |&(start, _)| start);
        let mut out = Vec::with_capacity(raw.len());
        out.extend_from_slice(&raw[..header_end]);
        for (i, &(start, target)) in rows.iter().enumerate() {
            let end = rows.get(i + 1).map_or(raw.len(), |&(next, _)| next);
            if !target {
                out.extend_from_slice(&raw[start..end]);
            }
        }

        let temp_path = self.path.with_extension("csv.tmp");
        fs::write(&temp_path, &out).map_err(|e| DashboardError::io(&temp_path, e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| DashboardError::io(&self.path, e))?;
        debug!(
            "Rewrote {:?}: {} -> {} rows",
            self.path,
            rows.len(),
            rows.len() - removed
        );

        let generation = self.bump();
        info!(
            "Deleted campaign {} from {:?} (generation {})",
            campaign_id,
            self.path,
            generation.value()
        );
        Ok(generation)
    }
}
