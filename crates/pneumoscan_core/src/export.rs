//! CSV export of a finished batch.

use std::path::Path;

use anyhow::Result;

use crate::view::ResultCard;

/// Export the result rows to CSV with headers:
/// image,result,confidence
pub fn export_csv(rows: &[ResultCard], path: impl AsRef<Path>) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["image", "result", "confidence"])?;

    for card in rows {
        let position = format!("Image {}", card.index);
        wtr.write_record([
            position.as_str(),
            card.label.as_str(),
            card.confidence.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
