//! HTTP classifier client for a Gemini-style `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use log::{debug, warn};
use serde_json::json;

use crate::classifier::{Classifier, ClassifierOutcome, ClassifierVerdict};
use crate::config::ClassifierConfig;

/// Instruction sent alongside the document. The model must answer with JSON
/// only; anything else is handled by the fence stripping and brace scan below.
const CLASSIFY_PROMPT: &str = r#"Extract the following information from the document:
1. Complaint/Document Date (YYYY-MM-DD format). If multiple dates are present, pick the most relevant one (e.g. date of application/complaint).
2. Priority (Low, Medium, High, Critical) based on the content urgency.

Output valid JSON only: {"extracted_date": "YYYY-MM-DD", "priority": "Level"}"#;

pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout(),
        }
    }

    async fn request(
        &self,
        api_key: &str,
        document: &[u8],
        mime_type: Option<&str>,
    ) -> Result<String, String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, api_key
        );

        let body = json!({
            "contents": [{
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": mime_type.unwrap_or("application/octet-stream"),
                            "data": base64::engine::general_purpose::STANDARD.encode(document),
                        }
                    },
                    { "text": CLASSIFY_PROMPT }
                ]
            }]
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("classifier returned HTTP {}", response.status()));
        }

        response
            .text()
            .await
            .map_err(|e| format!("failed to read response body: {}", e))
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, document: &[u8], mime_type: Option<&str>) -> ClassifierOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            return ClassifierOutcome::Unavailable {
                reason: "no API key configured".to_string(),
            };
        };

        let request = self.request(api_key, document, mime_type);
        let raw = match tokio::time::timeout(self.timeout, request).await {
            Err(_) => {
                warn!("Classifier timed out after {:?}", self.timeout);
                return ClassifierOutcome::Unavailable {
                    reason: format!("timed out after {:?}", self.timeout),
                };
            }
            Ok(Err(reason)) => {
                warn!("Classifier unavailable: {}", reason);
                return ClassifierOutcome::Unavailable { reason };
            }
            Ok(Ok(raw)) => raw,
        };

        match parse_response(&raw) {
            Ok(verdict) => {
                debug!(
                    "Classifier verdict: priority={:?} date={:?}",
                    verdict.priority, verdict.extracted_date
                );
                ClassifierOutcome::Classified(verdict)
            }
            Err(reason) => {
                warn!("Classifier response malformed: {}", reason);
                ClassifierOutcome::Malformed { reason }
            }
        }
    }
}

/// Digs the generated text out of the response envelope and parses the JSON
/// object inside it.
fn parse_response(raw: &str) -> Result<ClassifierVerdict, String> {
    let envelope: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| format!("response is not JSON: {}", e))?;

    let text = envelope
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| "response has no generated text".to_string())?;

    // Models wrap JSON in markdown fences despite the prompt.
    let text = text.replace("```json", "").replace("```", "");
    let json_str = extract_json(&text);

    serde_json::from_str(&json_str)
        .map_err(|e| format!("generated text is not the expected JSON: {}", e))
}

/// Extracts the first balanced JSON object from free-form model output.
/// Tracks string boundaries and escape sequences so braces inside string
/// values do not confuse the depth count.
fn extract_json(response: &str) -> String {
    let start = match response.find('{') {
        Some(idx) => idx,
        None => return response.to_string(),
    };

    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;
    let mut end = response.len();

    for (i, c) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => {
                escape_next = true;
            }
            '"' => {
                in_string = !in_string;
            }
            '{' if !in_string => {
                depth += 1;
            }
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    end = start + i + 1;
                    break;
                }
            }
            _ => {}
        }
    }

    response[start..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_plain() {
        let text = r#"{"extracted_date": "2024-03-05", "priority": "High"}"#;
        assert_eq!(extract_json(text), text);
    }

    #[test]
    fn test_extract_json_with_surrounding_prose() {
        let text = "Here is the result:\n{\"priority\": \"Low\"}\nHope that helps!";
        assert_eq!(extract_json(text), "{\"priority\": \"Low\"}");
    }

    #[test]
    fn test_extract_json_braces_inside_strings() {
        let text = r#"{"priority": "High", "note": "see {bracket} usage"} trailing"#;
        assert_eq!(
            extract_json(text),
            r#"{"priority": "High", "note": "see {bracket} usage"}"#
        );
    }

    #[test]
    fn test_parse_response_happy_path() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"text": "```json\n{\"extracted_date\": \"2024-03-05\", \"priority\": \"Critical\"}\n```"}]
                }
            }]
        }"#;

        let verdict = parse_response(raw).unwrap();
        assert_eq!(verdict.priority.as_deref(), Some("Critical"));
        assert_eq!(verdict.extracted_date.as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn test_parse_response_missing_fields_tolerated() {
        let raw = r#"{
            "candidates": [{
                "content": { "parts": [{"text": "{\"priority\": \"High\"}"}] }
            }]
        }"#;

        let verdict = parse_response(raw).unwrap();
        assert_eq!(verdict.priority.as_deref(), Some("High"));
        assert!(verdict.extracted_date.is_none());
    }

    #[test]
    fn test_parse_response_no_text() {
        let raw = r#"{"candidates": []}"#;
        assert!(parse_response(raw).is_err());
    }

    #[test]
    fn test_parse_response_not_json() {
        assert!(parse_response("internal server error").is_err());
    }

    #[tokio::test]
    async fn test_unconfigured_key_is_unavailable() {
        let config = ClassifierConfig {
            api_key: None,
            ..ClassifierConfig::default()
        };
        let classifier = HttpClassifier::new(&config);

        let outcome = classifier.classify(b"document bytes", None).await;
        assert!(matches!(outcome, ClassifierOutcome::Unavailable { .. }));
    }
}
