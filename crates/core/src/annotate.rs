//! Vision API annotation client.
//!
//! Builds the provider's `images:annotate` request from an encoded payload
//! and a feature specification, sends it over an [`HttpTransport`], and
//! parses the response into a normalized list of [`Label`]s.
//!
//! The request and response shapes reproduce the provider contract exactly:
//!
//! ```json
//! { "requests": [ { "image": { "content": "<base64>" },
//!                   "features": [ { "type": "LABEL_DETECTION", "maxResults": 5 } ] } ] }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::encoding::EncodedPayload;
use crate::error::{AppError, Result};
use crate::transport::HttpTransport;

/// Kind of annotation requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    LabelDetection,
}

impl FeatureKind {
    fn wire_name(self) -> &'static str {
        match self {
            Self::LabelDetection => "LABEL_DETECTION",
        }
    }
}

/// What to detect and how many results to return.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSpec {
    pub kind: FeatureKind,
    pub max_results: u32,
}

impl FeatureSpec {
    pub fn labels(max_results: u32) -> Self {
        Self {
            kind: FeatureKind::LabelDetection,
            max_results,
        }
    }
}

/// One detected concept.
///
/// `mid` is a provider-assigned token used as a rendering key only; the
/// provider does not guarantee uniqueness across calls, so it carries no
/// semantic identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub mid: String,
    pub description: String,
}

// --- wire types, provider shape reproduced field for field ---

#[derive(Serialize)]
struct AnnotateRequest {
    requests: Vec<ImageRequest>,
}

#[derive(Serialize)]
struct ImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(rename = "maxResults")]
    max_results: u32,
}

#[derive(Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Deserialize, Default)]
struct ImageResponse {
    #[serde(rename = "labelAnnotations", default)]
    label_annotations: Vec<LabelAnnotation>,
}

#[derive(Deserialize)]
struct LabelAnnotation {
    #[serde(default)]
    mid: String,
    #[serde(default)]
    description: String,
}

/// Client for the provider's annotation endpoint.
pub struct AnnotationClient {
    config: Config,
    transport: Arc<dyn HttpTransport>,
}

impl AnnotationClient {
    pub fn new(config: Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    /// Sends one annotation request and returns the detected labels.
    ///
    /// An absent or empty `labelAnnotations` array is a successful empty
    /// result, not an error; callers decide whether to surface "no labels
    /// found". Single attempt: nothing is retried.
    ///
    /// # Errors
    ///
    /// - [`AppError::Auth`] when the provider rejects the credential (401/403)
    /// - [`AppError::Quota`] when rate limited (429)
    /// - [`AppError::Network`] on transport failure or any other non-success
    ///   status, preserving the provider message when present
    /// - [`AppError::MalformedResponse`] when a success body cannot be parsed
    pub async fn annotate(
        &self,
        payload: &EncodedPayload,
        spec: &FeatureSpec,
    ) -> Result<Vec<Label>> {
        // Credential travels as a query parameter, per the provider contract
        let mut url = self.config.endpoint.clone();
        url.query_pairs_mut().append_pair("key", &self.config.api_key);

        let request = AnnotateRequest {
            requests: vec![ImageRequest {
                image: ImageContent {
                    content: payload.as_str().to_string(),
                },
                features: vec![Feature {
                    kind: spec.kind.wire_name(),
                    max_results: spec.max_results,
                }],
            }],
        };
        let body = serde_json::to_value(&request)?;

        let response = self.transport.post_json(url.as_str(), &body).await?;

        if !response.is_success() {
            let message = provider_message(&response.body);
            log::warn!("annotation request failed with status {}", response.status);
            return Err(match response.status {
                401 | 403 => AppError::Auth(
                    message.unwrap_or_else(|| "credential rejected".to_string()),
                ),
                429 => AppError::Quota,
                _ => AppError::Network { message },
            });
        }

        let parsed: AnnotateResponse = serde_json::from_str(&response.body)
            .map_err(|e| AppError::malformed(e.to_string()))?;

        let labels: Vec<Label> = parsed
            .responses
            .into_iter()
            .next()
            .unwrap_or_default()
            .label_annotations
            .into_iter()
            .map(|a| Label {
                mid: a.mid,
                description: a.description,
            })
            .collect();

        log::info!("annotation returned {} label(s)", labels.len());
        Ok(labels)
    }
}

/// Best-effort extraction of `error.message` from a provider error body.
fn provider_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::HttpResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeTransport {
        response: HttpResponse,
        seen: Mutex<Vec<(String, serde_json::Value)>>,
    }

    impl FakeTransport {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                response: HttpResponse {
                    status,
                    body: body.to_string(),
                },
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn post_json(
            &self,
            url: &str,
            body: &serde_json::Value,
        ) -> Result<HttpResponse> {
            self.seen
                .lock()
                .unwrap()
                .push((url.to_string(), body.clone()));
            Ok(self.response.clone())
        }
    }

    fn client_with(transport: Arc<FakeTransport>) -> AnnotationClient {
        let config = Config::with_key("test-key").unwrap();
        AnnotationClient::new(config, transport)
    }

    // encode() is exercised in encoding::tests; here any payload works
    async fn payload() -> EncodedPayload {
        crate::encoding::encode(&crate::source::ImageRef::from_bytes("t", b"img".to_vec()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn request_body_matches_provider_contract() {
        let transport = Arc::new(FakeTransport::replying(200, r#"{"responses":[{}]}"#));
        let client = client_with(transport.clone());

        client
            .annotate(&payload().await, &FeatureSpec::labels(5))
            .await
            .unwrap();

        let seen = transport.seen.lock().unwrap();
        let (url, body) = &seen[0];
        assert!(url.starts_with("https://vision.googleapis.com/v1/images:annotate"));
        assert!(url.contains("key=test-key"));
        assert_eq!(
            *body,
            serde_json::json!({
                "requests": [{
                    "image": { "content": "aW1n" },
                    "features": [{ "type": "LABEL_DETECTION", "maxResults": 5 }]
                }]
            })
        );
    }

    #[tokio::test]
    async fn labels_are_returned_in_response_order() {
        let body = r#"{"responses":[{"labelAnnotations":[
            {"mid":"/m/1","description":"Cat","score":0.98},
            {"mid":"/m/2","description":"Animal","score":0.95},
            {"mid":"/m/3","description":"Pet","score":0.91}
        ]}]}"#;
        let client = client_with(Arc::new(FakeTransport::replying(200, body)));

        let labels = client
            .annotate(&payload().await, &FeatureSpec::labels(3))
            .await
            .unwrap();

        let descriptions: Vec<_> = labels.iter().map(|l| l.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Cat", "Animal", "Pet"]);
        assert_eq!(labels[0].mid, "/m/1");
    }

    #[tokio::test]
    async fn missing_label_annotations_is_a_successful_empty_result() {
        let client = client_with(Arc::new(FakeTransport::replying(
            200,
            r#"{"responses":[{"fullTextAnnotation":null}]}"#,
        )));
        let labels = client
            .annotate(&payload().await, &FeatureSpec::labels(5))
            .await
            .unwrap();
        assert!(labels.is_empty());
    }

    #[tokio::test]
    async fn empty_responses_array_is_a_successful_empty_result() {
        let client = client_with(Arc::new(FakeTransport::replying(200, r#"{"responses":[]}"#)));
        let labels = client
            .annotate(&payload().await, &FeatureSpec::labels(5))
            .await
            .unwrap();
        assert!(labels.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_preserves_provider_message() {
        let body = r#"{"error":{"code":400,"message":"Invalid image content."}}"#;
        let client = client_with(Arc::new(FakeTransport::replying(400, body)));

        let err = client
            .annotate(&payload().await, &FeatureSpec::labels(5))
            .await
            .unwrap_err();

        match err {
            AppError::Network { message } => {
                assert_eq!(message.as_deref(), Some("Invalid image content."));
            }
            other => panic!("expected Network, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn forbidden_maps_to_auth_error() {
        let body = r#"{"error":{"message":"API key not valid."}}"#;
        let client = client_with(Arc::new(FakeTransport::replying(403, body)));
        let err = client
            .annotate(&payload().await, &FeatureSpec::labels(5))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Auth(msg) if msg == "API key not valid."));
    }

    #[tokio::test]
    async fn rate_limit_maps_to_quota_error() {
        let client = client_with(Arc::new(FakeTransport::replying(429, "{}")));
        let err = client
            .annotate(&payload().await, &FeatureSpec::labels(5))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Quota));
    }

    #[tokio::test]
    async fn undecodable_success_body_is_malformed_response() {
        let client = client_with(Arc::new(FakeTransport::replying(200, "<html>oops</html>")));
        let err = client
            .annotate(&payload().await, &FeatureSpec::labels(5))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }
}
