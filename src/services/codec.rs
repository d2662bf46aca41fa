use crate::domain::paste::PasteRecord;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("corrupt paste record: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("corrupt paste record: {0}")]
    Inconsistent(&'static str),
}

/// Serializes a record as JSON. Absent optionals are written as `null`.
pub fn encode(record: &PasteRecord) -> Result<String, CodecError> {
    Ok(serde_json::to_string(record)?)
}

pub fn decode(raw: &str) -> Result<PasteRecord, CodecError> {
    let record: PasteRecord = serde_json::from_str(raw)?;
    match (record.max_views, record.remaining_views) {
        (Some(_), None) | (None, Some(_)) => {
            Err(CodecError::Inconsistent("remaining_views must be present exactly when max_views is"))
        }
        (Some(max), Some(left)) if left > max => Err(CodecError::Inconsistent("remaining_views exceeds max_views")),
        _ => Ok(record),
    }
}
