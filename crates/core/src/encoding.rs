//! Transport encoding of image bytes.
//!
//! The annotation provider requires the whole image inline in one request
//! body, so encoding is a single non-streamed pass: read every byte behind
//! an [`ImageRef`], Base64-encode the lot. Encoding is deterministic — the
//! same bytes always produce the same payload.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::error::{AppError, Result};
use crate::source::ImageRef;

/// Transport-safe textual encoding of image bytes.
///
/// Immutable once built; regenerated per request rather than cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    /// The Base64 text, as placed in the request body.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Reads the full byte content behind `image` and Base64-encodes it.
///
/// # Errors
///
/// Returns [`AppError::Read`] when the bytes cannot be read (missing file,
/// permission failure, I/O fault). These are distinct from the network
/// errors the annotation call can raise later.
pub async fn encode(image: &ImageRef) -> Result<EncodedPayload> {
    let bytes = match image {
        ImageRef::Path(path) => tokio::fs::read(path)
            .await
            .map_err(|e| AppError::read(path.display().to_string(), e))?,
        ImageRef::Memory { bytes, .. } => bytes.clone(),
    };

    log::debug!("encoding {} bytes from {}", bytes.len(), image.display_name());
    Ok(EncodedPayload(BASE64.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn encode_is_deterministic_for_same_bytes() {
        let image = ImageRef::from_bytes("a", vec![1, 2, 3, 250, 251, 252]);
        let first = encode(&image).await.unwrap();
        let second = encode(&image).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn encode_produces_standard_base64() {
        let image = ImageRef::from_bytes("b", b"hello".to_vec());
        let payload = encode(&image).await.unwrap();
        assert_eq!(payload.as_str(), "aGVsbG8=");
    }

    #[tokio::test]
    async fn encode_reports_read_error_for_missing_path() {
        let image = ImageRef::from_path("/no/such/image.jpg");
        let err = encode(&image).await.unwrap_err();
        assert!(matches!(err, AppError::Read { .. }));
    }
}
