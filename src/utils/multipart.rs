use std::collections::HashMap;

use actix_multipart::Multipart;
use futures_util::TryStreamExt;

use crate::errors::AppError;
use crate::utils::upload_schema::UploadSlot;

/// Text fields of a multipart form. Repeated keys keep every value in arrival order.
#[derive(Debug, Default, Clone)]
pub struct FormFields {
    values: HashMap<String, Vec<String>>,
}

impl FormFields {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// First value sent for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for FormFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut fields = FormFields::default();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

/// A file part that has been read but not yet written to the file store.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub slot: UploadSlot,
    pub original_filename: String,
    pub bytes: Vec<u8>,
}

/// Splits a multipart body into text fields and file parts.
///
/// File parts must use one of the known upload field names. The total number
/// of bytes read is capped at `max_body_bytes`.
pub async fn read_form(
    mut payload: Multipart,
    max_body_bytes: usize,
) -> Result<(FormFields, Vec<PendingUpload>), AppError> {
    let mut fields = FormFields::default();
    let mut uploads = Vec::new();
    let mut total = 0usize;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|err| AppError::BadRequest(format!("Malformed multipart body: {}", err)))?
    {
        let (name, filename) = {
            let disposition = field.content_disposition();
            (
                disposition.get_name().unwrap_or_default().to_string(),
                disposition.get_filename().map(str::to_string),
            )
        };

        let mut buf = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|err| AppError::BadRequest(format!("Malformed multipart body: {}", err)))?
        {
            total += chunk.len();
            if total > max_body_bytes {
                return Err(AppError::BadRequest(format!(
                    "Request body exceeds {} bytes",
                    max_body_bytes
                )));
            }
            buf.extend_from_slice(&chunk);
        }

        match filename {
            Some(filename) => {
                // Browsers send an empty part for file inputs left blank.
                if filename.is_empty() && buf.is_empty() {
                    continue;
                }
                let slot = UploadSlot::from_field_name(&name)
                    .ok_or_else(|| AppError::BadRequest(format!("Unexpected file field: {}", name)))?;
                uploads.push(PendingUpload {
                    slot,
                    original_filename: filename,
                    bytes: buf,
                });
            }
            None => {
                let value = String::from_utf8(buf).map_err(|_| {
                    AppError::BadRequest(format!("Field {} is not valid UTF-8", name))
                })?;
                fields.insert(name, value);
            }
        }
    }

    Ok((fields, uploads))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_wins_for_repeated_keys() {
        let fields: FormFields = [("gender", "female"), ("gender", "other"), ("email", "a@b.c")]
            .into_iter()
            .collect();

        assert_eq!(fields.get("gender"), Some("female"));
        assert_eq!(fields.get("email"), Some("a@b.c"));
        assert_eq!(fields.get("missing"), None);
    }
}
