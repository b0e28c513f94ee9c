//! CSV export of filtered merged records, one flat row per post.

use crate::domain::merged::{MergedColumn, MergedRecord, standard_merged_columns};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Fields of one joined side, keyed by source column name
fn fields<T: Serialize>(side: Option<&T>) -> Result<Map<String, Value>> {
    match side {
        Some(value) => match serde_json::to_value(value).context("Failed to serialize record")? {
            Value::Object(map) => Ok(map),
            other => anyhow::bail!("Expected a record object, got {}", other),
        },
        None => Ok(Map::new()),
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn flatten(record: &MergedRecord<'_>, columns: &[MergedColumn]) -> Result<Vec<String>> {
    let mut performance = fields(Some(record.performance))?;
    // The merged frame carries the parsed date; unparseable values export empty
    performance.insert(
        "post_date".to_string(),
        record
            .post_date
            .map(|d| Value::String(d.to_string()))
            .unwrap_or(Value::Null),
    );
    let sides = [
        performance,
        fields(record.campaign)?,
        fields(record.product)?,
        fields(record.influencer)?,
    ];

    Ok(columns
        .iter()
        .map(|col| cell(sides[col.table].get(&col.source)))
        .collect())
}

pub fn write_records<W: Write>(writer: W, records: &[MergedRecord<'_>]) -> Result<()> {
    let columns = standard_merged_columns();
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(columns.iter().map(|c| c.name.as_str()))
        .context("Failed to write export header")?;
    for record in records {
        wtr.write_record(flatten(record, &columns)?)
            .context("Failed to write export row")?;
    }
    wtr.flush().context("Failed to flush export")?;
    Ok(())
}

pub fn export_records(path: &Path, records: &[MergedRecord<'_>]) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_records(file, records)?;
    info!("Exported {} merged records to {:?}", records.len(), path);
    Ok(records.len())
}
