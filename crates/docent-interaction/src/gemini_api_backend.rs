//! GeminiApiBackend - Direct REST API implementation for Gemini.
//!
//! Sends one `generateContent` call per question: the grounding policy as the
//! system instruction, every document as an inline data part, and the
//! question as the final text part.

use async_trait::async_trait;
use docent_core::{BackendError, Credential, GenerateRequest, GenerativeBackend};
use docent_infrastructure::BackendConfig;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Backend implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiApiBackend {
    client: Client,
    model: String,
    base_url: String,
}

impl GeminiApiBackend {
    /// Creates a backend from configuration, applying the request timeout.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| BackendError::Transport(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    async fn send_request(
        &self,
        credential: &Credential,
        body: &GenerateContentRequest,
    ) -> Result<String, BackendError> {
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, credential.expose())
            .json(body)
            .send()
            .await
            .map_err(|err| {
                let timed_out = err.is_timeout();
                let connect = err.is_connect();
                BackendError::Transport(format!(
                    "Gemini API request failed (timeout: {timed_out}, connect: {connect}): {}",
                    err.without_url()
                ))
            })?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|err| BackendError::Transport(format!("Failed to read Gemini response: {err}")))?;

        if !status.is_success() {
            return Err(map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body_text)
            .map_err(|err| BackendError::MalformedResponse(format!("Failed to parse Gemini response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiApiBackend {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        credential: &Credential,
        request: &GenerateRequest,
    ) -> Result<String, BackendError> {
        let body = build_request_body(request);
        self.send_request(credential, &body).await
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Builds the wire body: documents first, question last.
pub(crate) fn build_request_body(request: &GenerateRequest) -> GenerateContentRequest {
    let mut parts: Vec<Part> = request
        .documents
        .iter()
        .map(|doc| Part::InlineData {
            inline_data: InlineDataPayload {
                mime_type: doc.media_type.clone(),
                data: doc.data.clone(),
            },
        })
        .collect();
    parts.push(Part::Text {
        text: request.question.clone(),
    });

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        system_instruction: Content {
            role: None,
            parts: vec![Part::Text {
                text: request.system_instruction.clone(),
            }],
        },
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_text_response(response: GenerateContentResponse) -> Result<String, BackendError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(BackendError::MalformedResponse(format!(
            "Gemini blocked the prompt: {reason}"
        )));
    }

    let texts: Vec<String> = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if texts.is_empty() {
        return Err(BackendError::MalformedResponse(
            "Gemini API returned no text in the response candidates".into(),
        ));
    }

    Ok(texts.concat())
}

/// Classifies a non-success response. Credential problems are told apart
/// from every other failure so the caller can clear the stored key.
pub(crate) fn map_http_error(status: StatusCode, body: &str) -> BackendError {
    let (status_text, message) = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            (
                wrapper.error.status.unwrap_or_default(),
                wrapper.error.message.unwrap_or_else(|| body.to_string()),
            )
        })
        .unwrap_or_else(|_| (String::new(), body.to_string()));

    let rejects_key = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || (status == StatusCode::BAD_REQUEST
            && (body.contains("API_KEY_INVALID") || message.contains("API key not valid")));

    let detail = if status_text.is_empty() {
        message
    } else {
        format!("{status_text}: {message}")
    };

    if rejects_key {
        BackendError::InvalidCredential(detail)
    } else {
        BackendError::Http {
            status: status.as_u16(),
            message: detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_core::InlinePart;
    use serde_json::json;

    fn sample_request() -> GenerateRequest {
        GenerateRequest {
            system_instruction: "only the documents".into(),
            documents: vec![
                InlinePart {
                    media_type: "application/pdf".into(),
                    data: "QQ==".into(),
                },
                InlinePart {
                    media_type: "application/pdf".into(),
                    data: "Qg==".into(),
                },
            ],
            question: "ما هو موضوع الاختبار؟".into(),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(build_request_body(&sample_request())).unwrap();

        assert_eq!(
            body,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "inlineData": { "mimeType": "application/pdf", "data": "QQ==" } },
                        { "inlineData": { "mimeType": "application/pdf", "data": "Qg==" } },
                        { "text": "ما هو موضوع الاختبار؟" }
                    ]
                }],
                "systemInstruction": {
                    "parts": [{ "text": "only the documents" }]
                }
            })
        );
    }

    #[test]
    fn test_extract_text_concatenates_parts_verbatim() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "  first" }, { "text": " second\n" }] }
            }]
        }))
        .unwrap();

        assert_eq!(extract_text_response(response).unwrap(), "  first second\n");
    }

    #[test]
    fn test_extract_text_without_candidates_is_malformed() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(matches!(
            extract_text_response(response),
            Err(BackendError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_blocked_prompt_is_malformed() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        let err = extract_text_response(response).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_invalid_api_key_400_is_invalid_credential() {
        let body = json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT",
                "details": [{ "reason": "API_KEY_INVALID" }]
            }
        })
        .to_string();

        let err = map_http_error(StatusCode::BAD_REQUEST, &body);
        assert!(err.is_invalid_credential());
    }

    #[test]
    fn test_unauthorized_and_forbidden_are_invalid_credential() {
        assert!(map_http_error(StatusCode::UNAUTHORIZED, "").is_invalid_credential());
        assert!(map_http_error(StatusCode::FORBIDDEN, "{}").is_invalid_credential());
    }

    #[test]
    fn test_other_failures_keep_status() {
        let body = json!({
            "error": { "code": 429, "message": "Resource exhausted", "status": "RESOURCE_EXHAUSTED" }
        })
        .to_string();

        assert_eq!(
            map_http_error(StatusCode::TOO_MANY_REQUESTS, &body),
            BackendError::Http {
                status: 429,
                message: "RESOURCE_EXHAUSTED: Resource exhausted".into(),
            }
        );

        let plain = map_http_error(StatusCode::BAD_REQUEST, "bad payload");
        assert_eq!(
            plain,
            BackendError::Http {
                status: 400,
                message: "bad payload".into(),
            }
        );
    }

    #[test]
    fn test_endpoint_uses_model_and_trims_base_url() {
        let config = BackendConfig {
            base_url: "http://localhost:9999/v1beta/models/".into(),
            ..BackendConfig::default()
        };
        let backend = GeminiApiBackend::new(&config).unwrap().with_model("gemini-test");

        assert_eq!(backend.model(), "gemini-test");
        assert_eq!(
            backend.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-test:generateContent"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let config = BackendConfig {
            base_url: "http://127.0.0.1:9/v1beta/models".into(),
            request_timeout_secs: 5,
            ..BackendConfig::default()
        };
        let backend = GeminiApiBackend::new(&config).unwrap();
        let credential = Credential::new("AIza-test").unwrap();

        let err = backend.generate(&credential, &sample_request()).await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
        assert!(!err.to_string().contains("AIza-test"));
    }
}
