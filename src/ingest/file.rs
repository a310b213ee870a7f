//! JSON interchange files between the scrape, embed and load stages

use std::path::Path;

use tracing::info;

use crate::errors::FaqRagError;
use crate::errors::Result;
use crate::models::FaqRecord;

/// Read a JSON array of records
pub fn read_records(path: &Path) -> Result<Vec<FaqRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        FaqRagError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {e}", path.display()),
        ))
    })?;
    let records: Vec<FaqRecord> = serde_json::from_str(&content)?;
    info!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Write records as a pretty-printed JSON array, replacing the file
pub fn write_records(path: &Path, records: &[FaqRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
