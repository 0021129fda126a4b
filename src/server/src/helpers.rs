use std::path::Path;

use actix_multipart::Multipart;
use futures_util::StreamExt;

use libvantage::error::VantageError;

/// A file pulled out of a multipart form
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Reads the first file part named `field_name`, buffering at most `limit` bytes.
///
/// Other parts are drained and ignored. A missing field or a part without a
/// filename is a bad request.
pub async fn read_file_field(
    mut payload: Multipart,
    field_name: &str,
    limit: usize,
) -> Result<UploadedFile, VantageError> {
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| VantageError::bad_request(e.to_string()))?;

        let (name, filename) = match field.content_disposition() {
            Some(disposition) => (
                disposition.get_name().map(String::from),
                disposition.get_filename().map(String::from),
            ),
            None => (None, None),
        };

        if name.as_deref() != Some(field_name) {
            log::debug!("skipping multipart field {:?}", name);
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| VantageError::bad_request(e.to_string()))?;
            }
            continue;
        }

        let Some(filename) = filename else {
            return Err(VantageError::bad_request(format!(
                "field '{field_name}' has no filename"
            )));
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| VantageError::bad_request(e.to_string()))?;
            if bytes.len() + chunk.len() > limit {
                return Err(VantageError::PayloadTooLarge { limit });
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok(UploadedFile { filename, bytes });
    }

    Err(VantageError::bad_request(format!(
        "missing '{field_name}' file field"
    )))
}

/// Final component of a stored path, as reported back to the client
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}
