use crate::domain::model::FlatRecord;
use crate::utils::error::{EtlError, Result};

/// `{city}_{state}_{region_id}.{extension}`
pub fn output_filename(city: &str, state: &str, region_id: &str, extension: &str) -> String {
    format!("{}_{}_{}.{}", city, state, region_id, extension)
}

/// Renders records as delimited text. The header comes from the first
/// record; every later record must carry the same number of fields.
pub fn render_delimited(records: &[FlatRecord], delimiter: u8) -> Result<Vec<u8>> {
    let first = records.first().ok_or(EtlError::EmptyDataset)?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(first.headers())?;
    for record in records {
        writer.write_record(record.values())?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}
