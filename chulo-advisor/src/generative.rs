use async_trait::async_trait;
use chulo_store::app_config::GenerativeConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::backend::PricingBackend;
use crate::error::{AdvisorUnavailable, SetupError};
use crate::models::{PricingRequest, PricingResponse};
use crate::prompt::render_prompt;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Suggestions from a hosted generative model (`generateContent` API, JSON response mode)
pub struct GenerativeBackend {
    client: Client,
    config: GenerativeConfig,
    request_timeout: Duration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerativeBackend {
    pub fn new(config: GenerativeConfig, request_timeout: Duration) -> Result<Self, SetupError> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self { client, config, request_timeout })
    }

    /// Client timeouts are reported like advisor timeouts
    fn send_error(&self, e: reqwest::Error) -> AdvisorUnavailable {
        if e.is_timeout() {
            AdvisorUnavailable::Timeout(self.request_timeout)
        } else {
            AdvisorUnavailable::Transport(e.to_string())
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl PricingBackend for GenerativeBackend {
    fn name(&self) -> &'static str {
        "generative"
    }

    async fn evaluate(&self, request: &PricingRequest) -> Result<PricingResponse, AdvisorUnavailable> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: render_prompt(request) }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: self.config.temperature,
            },
        };

        let mut call = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.config.api_key {
            call = call.header(API_KEY_HEADER, key);
        }

        tracing::debug!(model = %self.config.model, product = %request.product_name(), "Calling pricing model");

        let response = call.send().await.map_err(|e| self.send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisorUnavailable::Status(status.as_u16()));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AdvisorUnavailable::Malformed(format!("unexpected response body: {}", e)))?;

        let text = payload
            .candidates
            .into_iter()
            .find_map(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| AdvisorUnavailable::Malformed("response has no candidate text".to_string()))?;

        parse_suggestion(&text)
    }
}

/// Schema-check the model's JSON text. Positivity and consistency are left to the guard.
pub fn parse_suggestion(text: &str) -> Result<PricingResponse, AdvisorUnavailable> {
    let value: Value = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| AdvisorUnavailable::Malformed(format!("model output is not JSON: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| AdvisorUnavailable::Malformed("model output is not a JSON object".to_string()))?;

    let suggested_price = match object.get("suggestedPrice") {
        None | Some(Value::Null) => {
            return Err(AdvisorUnavailable::Malformed("missing field suggestedPrice".to_string()))
        }
        Some(v) => v
            .as_f64()
            .ok_or_else(|| AdvisorUnavailable::Malformed(format!("suggestedPrice must be a number, got {}", v)))?,
    };

    let reasoning = match object.get("reasoning") {
        None | Some(Value::Null) => return Err(AdvisorUnavailable::Malformed("missing field reasoning".to_string())),
        Some(v) => v
            .as_str()
            .ok_or_else(|| AdvisorUnavailable::Malformed(format!("reasoning must be a string, got {}", v)))?,
    };

    Ok(PricingResponse {
        suggested_price,
        reasoning: reasoning.trim().to_string(),
    })
}

/// Models sometimes wrap JSON in a ```json fence despite the response mime type
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
            body.trim_end().strip_suffix("```").unwrap_or(body).trim()
        }
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> GenerativeConfig {
        GenerativeConfig {
            base_url: base_url.to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key: Some("test-key".to_string()),
            temperature: 0.2,
        }
    }

    fn model_reply(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    }

    fn momo() -> PricingRequest {
        PricingRequest::new("Chicken Momo", 50, 10.0, "high", 250.0).unwrap()
    }

    #[test]
    fn test_parse_suggestion() {
        let parsed = parse_suggestion(r#"{"suggestedPrice": 210, "reasoning": " Lower the price. "}"#).unwrap();
        assert_eq!(parsed, PricingResponse { suggested_price: 210.0, reasoning: "Lower the price.".to_string() });
    }

    #[test]
    fn test_parse_fenced_suggestion() {
        let text = "```json\n{\"suggestedPrice\": 199.5, \"reasoning\": \"Lower the price.\"}\n```";
        assert_eq!(parse_suggestion(text).unwrap().suggested_price, 199.5);
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        let cases = [
            ("not json at all", "not JSON"),
            ("[1, 2]", "not a JSON object"),
            (r#"{"reasoning": "Lower the price."}"#, "missing field suggestedPrice"),
            (r#"{"suggestedPrice": "210", "reasoning": "x"}"#, "must be a number"),
            (r#"{"suggestedPrice": 210}"#, "missing field reasoning"),
            (r#"{"suggestedPrice": 210, "reasoning": 5}"#, "must be a string"),
        ];

        for (text, expected) in cases {
            match parse_suggestion(text) {
                Err(AdvisorUnavailable::Malformed(msg)) => assert!(msg.contains(expected), "{}: {}", text, msg),
                other => panic!("{} parsed as {:?}", text, other),
            }
        }
    }

    #[tokio::test]
    async fn test_evaluate_calls_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/v1beta/models/gemini-2\.0-flash:generateContent$"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({ "generationConfig": { "responseMimeType": "application/json" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(model_reply(
                r#"{"suggestedPrice": 205, "reasoning": "Lower the price: spoilage risk is high."}"#,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let backend = GenerativeBackend::new(config(&server.uri()), Duration::from_secs(5)).unwrap();
        let response = backend.evaluate(&momo()).await.unwrap();

        assert_eq!(response.suggested_price, 205.0);
        assert!(response.reasoning.contains("spoilage"));
    }

    #[tokio::test]
    async fn test_error_status_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let backend = GenerativeBackend::new(config(&server.uri()), Duration::from_secs(5)).unwrap();
        assert_eq!(backend.evaluate(&momo()).await, Err(AdvisorUnavailable::Status(503)));
    }

    #[tokio::test]
    async fn test_empty_candidates_are_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let backend = GenerativeBackend::new(config(&server.uri()), Duration::from_secs(5)).unwrap();
        assert!(matches!(backend.evaluate(&momo()).await, Err(AdvisorUnavailable::Malformed(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let backend = GenerativeBackend::new(config("http://127.0.0.1:1"), Duration::from_secs(2)).unwrap();
        assert!(matches!(backend.evaluate(&momo()).await, Err(AdvisorUnavailable::Transport(_))));
    }

    #[tokio::test]
    async fn test_slow_model_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(model_reply(r#"{"suggestedPrice": 205, "reasoning": "Lower the price."}"#))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let backend = GenerativeBackend::new(config(&server.uri()), Duration::from_millis(200)).unwrap();
        assert_eq!(
            backend.evaluate(&momo()).await,
            Err(AdvisorUnavailable::Timeout(Duration::from_millis(200)))
        );
    }
}
