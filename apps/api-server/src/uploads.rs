//! Multipart form handling for post and image uploads.

use std::collections::HashMap;

use actix_multipart::Multipart;
use futures::TryStreamExt;

use agora_core::ports::ImageStore;

use crate::middleware::AppError;

/// Name of the multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/png", "image/jpg", "image/jpeg"];

/// Byte caps enforced while a multipart body streams in.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub file_bytes: usize,
    pub text_bytes: usize,
    pub total_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            file_bytes: 5 * 1024 * 1024,
            text_bytes: 64 * 1024,
            total_bytes: 6 * 1024 * 1024,
        }
    }
}

/// A file part of an upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A decoded multipart form: text fields plus at most one accepted image.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    image: Option<UploadedFile>,
}

impl UploadForm {
    /// Drain the multipart stream under the default [`UploadLimits`].
    ///
    /// File parts that are not png/jpeg are skipped as if they were absent.
    pub async fn read(payload: Multipart) -> Result<Self, AppError> {
        Self::read_with_limits(payload, UploadLimits::default()).await
    }

    /// Drain the multipart stream, failing as soon as a field or the whole
    /// body grows past `limits`.
    pub async fn read_with_limits(
        mut payload: Multipart,
        limits: UploadLimits,
    ) -> Result<Self, AppError> {
        let mut form = UploadForm::default();
        let mut total = 0usize;

        while let Some(mut field) = payload.try_next().await.map_err(bad_multipart)? {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_string);
            let content_type = field
                .content_type()
                .map(|mime| mime.essence_str().to_string());

            let limit = if file_name.is_some() {
                limits.file_bytes
            } else {
                limits.text_bytes
            };

            let mut bytes = Vec::new();
            while let Some(chunk) = field.try_next().await.map_err(bad_multipart)? {
                total = total.saturating_add(chunk.len());
                if bytes.len() + chunk.len() > limit || total > limits.total_bytes {
                    return Err(AppError::PayloadTooLarge(format!(
                        "Field '{name}' exceeds the upload size limit"
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }

            match file_name {
                Some(file_name) if name == IMAGE_FIELD => {
                    let content_type = content_type.unwrap_or_default();
                    if ACCEPTED_IMAGE_TYPES.contains(&content_type.as_str()) {
                        form.image = Some(UploadedFile { file_name, bytes });
                    } else {
                        tracing::debug!(content_type = %content_type, "Ignoring unsupported upload");
                    }
                }
                Some(_) => tracing::debug!(field = %name, "Ignoring unexpected file field"),
                None => {
                    form.fields
                        .insert(name, String::from_utf8_lossy(&bytes).into_owned());
                }
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Text field value, empty when absent.
    pub fn text_or_empty(&self, name: &str) -> String {
        self.text(name).unwrap_or_default().to_string()
    }

    /// Persist the uploaded image, if any, returning its public URL.
    pub async fn store_image(&self, images: &dyn ImageStore) -> Result<Option<String>, AppError> {
        match &self.image {
            Some(file) => {
                let url = images
                    .store(&file.file_name, &file.bytes)
                    .await
                    .map_err(|e| AppError::Internal(e.to_string()))?;
                Ok(Some(url))
            }
            None => Ok(None),
        }
    }
}

fn bad_multipart(err: actix_multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Malformed multipart body: {err}"))
}

/// Remove an image stored for a request that then failed.
pub async fn discard_upload(images: &dyn ImageStore, url: Option<&str>) {
    let Some(url) = url else { return };
    if let Err(e) = images.remove(url).await {
        tracing::warn!(image_url = %url, error = %e, "Failed to remove orphaned upload");
    }
}


#[cfg(test)]
mod tests {
    use actix_multipart::Multipart;
    use actix_web::error::PayloadError;
    use actix_web::http::header::{self, HeaderMap, HeaderValue};
    use actix_web::web::Bytes;

    use super::test_support::{Part, body, content_type, png};
    use super::*;

    fn multipart(parts: &[Part<'_>]) -> Multipart {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(&content_type()).unwrap(),
        );
        let bytes = Bytes::from(body(parts));
        Multipart::new(
            &headers,
            futures::stream::once(async move { Ok::<_, PayloadError>(bytes) }),
        )
    }

    fn small() -> UploadLimits {
        UploadLimits {
            file_bytes: 16,
            text_bytes: 8,
            total_bytes: 24,
        }
    }

    #[actix_web::test]
    async fn test_fields_within_limits() {
        let form = UploadForm::read_with_limits(
            multipart(&[Part::Text("title", "Hello"), png("a.png")]),
            small(),
        )
        .await
        .unwrap();

        assert_eq!(form.text("title"), Some("Hello"));
        assert_eq!(form.text_or_empty("content"), "");
        assert!(form.image.is_some());
    }

    #[actix_web::test]
    async fn test_oversized_text_field_rejected() {
        let err = UploadForm::read_with_limits(
            multipart(&[Part::Text("title", "Far too long a title")]),
            small(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::PayloadTooLarge(ref msg) if msg.contains("title")));
    }

    #[actix_web::test]
    async fn test_oversized_file_rejected() {
        let big = Part::File {
            name: "image",
            file_name: "big.png",
            content_type: "image/png",
            bytes: &[0u8; 64],
        };

        let err = UploadForm::read_with_limits(multipart(&[big]), small())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[actix_web::test]
    async fn test_total_limit_spans_fields() {
        let parts = [
            Part::Text("a", "1234567"),
            Part::Text("b", "1234567"),
            Part::Text("c", "1234567"),
            Part::Text("d", "1234567"),
        ];

        let err = UploadForm::read_with_limits(multipart(&parts), small())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PayloadTooLarge(ref msg) if msg.contains("'d'")));
    }
}
