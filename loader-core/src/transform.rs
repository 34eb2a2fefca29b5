//! Conversion between CSV rows and queue payloads.

use csv::{ReaderBuilder, StringRecord};

use crate::{error::PipelineError, model::LookupRequest};

const BAD_ROW: &str = "bad data provided";
const BAD_MESSAGE: &str = "invalid message, lon/lat required";

/// Read every record of a CSV document, header line included.
///
/// Records may carry any number of fields; blank lines are skipped.
pub fn parse_rows(content: &[u8]) -> Result<Vec<StringRecord>, csv::Error> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content)
        .records()
        .collect()
}

/// Build a request from the first two fields of a row (lon, lat).
pub fn row_to_request(row: &StringRecord) -> Result<LookupRequest, PipelineError> {
    match (row.get(0), row.get(1)) {
        (Some(lon), Some(lat)) if !lon.is_empty() && !lat.is_empty() => {
            Ok(LookupRequest::new(lon, lat))
        }
        _ => Err(PipelineError::validation(BAD_ROW)),
    }
}

pub fn encode_request(request: &LookupRequest) -> Result<String, PipelineError> {
    serde_json::to_string(request).map_err(PipelineError::Encode)
}

/// Decode a queued payload and check both coordinates are present.
pub fn decode_request(body: &str) -> Result<LookupRequest, PipelineError> {
    let request: LookupRequest = serde_json::from_str(body)?;
    if request.lon.is_empty() || request.lat.is_empty() {
        return Err(PipelineError::validation(BAD_MESSAGE));
    }
    Ok(request)
}
