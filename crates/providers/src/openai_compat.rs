//! OpenAI-compatible adapter.
//!
//! Works with OpenAI and any other endpoint that follows the OpenAI
//! chat completions contract.

use serde_json::Value;

use dg_domain::config::LlmConfig;
use dg_domain::error::{Error, Result};
use dg_domain::message::Message;

use crate::traits::{ChatRequest, ChatResponse, CompletionClient, Usage};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A completion client for any OpenAI-compatible API endpoint.
pub struct OpenAiCompatProvider {
    id: String,
    base_url: String,
    /// Resolved at construction. `None` means the key env var was not
    /// set at startup; every call fails with an auth error until the
    /// process is restarted with the key in place.
    api_key: Option<String>,
    default_model: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new client from the deserialized LLM config.
    ///
    /// A missing API key is logged as a warning and does not prevent
    /// construction; calls that need it degrade to a per-turn failure.
    pub fn from_config(cfg: &LlmConfig) -> Result<Self> {
        let api_key = match std::env::var(&cfg.api_key_env) {
            Ok(val) if !val.is_empty() => Some(val),
            _ => {
                tracing::warn!(
                    env = %cfg.api_key_env,
                    "completion API key not found in environment; \
                     completion calls will fail"
                );
                None
            }
        };

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            id: "openai_compat".into(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key,
            default_model: cfg.model.clone(),
            client,
        })
    }

    fn effective_model(&self, req: &ChatRequest) -> String {
        req.model
            .clone()
            .unwrap_or_else(|| self.default_model.clone())
    }

    fn build_chat_body(&self, req: &ChatRequest) -> Value {
        let messages: Vec<Value> = req.messages.iter().map(msg_to_openai).collect();

        let mut body = serde_json::json!({
            "model": self.effective_model(req),
            "messages": messages,
        });

        if let Some(temp) = req.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        if let Some(max) = req.max_tokens {
            body["max_tokens"] = serde_json::json!(max);
        }
        if let Some(top_p) = req.top_p {
            body["top_p"] = serde_json::json!(top_p);
        }
        if let Some(fp) = req.frequency_penalty {
            body["frequency_penalty"] = serde_json::json!(fp);
        }
        if let Some(pp) = req.presence_penalty {
            body["presence_penalty"] = serde_json::json!(pp);
        }
        body
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Message serialization helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn msg_to_openai(msg: &Message) -> Value {
    serde_json::json!({
        "role": msg.role.as_str(),
        "content": msg.content,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response deserialization helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn parse_chat_response(body: &Value) -> Result<ChatResponse> {
    let choice = body
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .ok_or_else(|| Error::Provider {
            provider: "openai_compat".into(),
            message: "no choices in response".into(),
        })?;

    let message = choice.get("message").ok_or_else(|| Error::Provider {
        provider: "openai_compat".into(),
        message: "no message in choice".into(),
    })?;

    let content = message
        .get("content")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let finish_reason = choice
        .get("finish_reason")
        .and_then(|v| v.as_str())
        .map(String::from);

    let model = body
        .get("model")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();

    let usage = body.get("usage").and_then(parse_openai_usage);

    Ok(ChatResponse {
        content,
        model,
        finish_reason,
        usage,
    })
}

fn parse_openai_usage(v: &Value) -> Option<Usage> {
    Some(Usage {
        prompt_tokens: v.get("prompt_tokens")?.as_u64()? as u32,
        completion_tokens: v.get("completion_tokens")?.as_u64()? as u32,
        total_tokens: v.get("total_tokens")?.as_u64()? as u32,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl CompletionClient for OpenAiCompatProvider {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse> {
        let key = self.api_key.as_ref().ok_or_else(|| {
            Error::Auth("completion API key was not set at startup".into())
        })?;

        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_chat_body(req);

        tracing::debug!(provider = %self.id, url = %url, "chat completion request");

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {key}"))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(format!("completion call to {url}: {e}"))
                } else {
                    Error::Http(e.to_string())
                }
            })?;

        let status = resp.status();
        let resp_text = resp
            .text()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Provider {
                provider: self.id.clone(),
                message: format!("HTTP {} - {}", status.as_u16(), resp_text),
            });
        }

        let resp_json: Value = serde_json::from_str(&resp_text)?;
        parse_chat_response(&resp_json)
    }

    fn provider_id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_domain::config::LlmConfig;

    fn provider() -> OpenAiCompatProvider {
        OpenAiCompatProvider::from_config(&LlmConfig::default()).unwrap()
    }

    #[test]
    fn body_carries_sampling_params() {
        let req = ChatRequest {
            messages: vec![Message::system("sys"), Message::user("hi")],
            model: None,
            temperature: Some(0.75),
            max_tokens: Some(350),
            top_p: Some(1.0),
            frequency_penalty: Some(0.3),
            presence_penalty: Some(0.6),
        };
        let body = provider().build_chat_body(&req);

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["temperature"], 0.75);
        assert_eq!(body["max_tokens"], 350);
        assert_eq!(body["frequency_penalty"], 0.3);
        assert_eq!(body["presence_penalty"], 0.6);
    }

    #[test]
    fn unset_params_are_omitted_from_body() {
        let req = ChatRequest {
            messages: vec![Message::user("hi")],
            ..Default::default()
        };
        let body = provider().build_chat_body(&req);
        assert!(body.get("temperature").is_none());
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("frequency_penalty").is_none());
    }

    #[test]
    fn model_override_wins() {
        let req = ChatRequest {
            messages: vec![Message::user("hi")],
            model: Some("gpt-4o-mini".into()),
            ..Default::default()
        };
        let body = provider().build_chat_body(&req);
        assert_eq!(body["model"], "gpt-4o-mini");
    }

    #[test]
    fn parses_chat_response() {
        let body = serde_json::json!({
            "model": "gpt-4o",
            "choices": [{
                "message": { "role": "assistant", "content": "Namaste 🙏" },
                "finish_reason": "stop",
            }],
            "usage": { "prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49 },
        });
        let resp = parse_chat_response(&body).unwrap();
        assert_eq!(resp.content, "Namaste 🙏");
        assert_eq!(resp.finish_reason.as_deref(), Some("stop"));
        assert_eq!(resp.usage.unwrap().total_tokens, 49);
    }

    #[test]
    fn missing_choices_is_a_provider_error() {
        let body = serde_json::json!({ "model": "gpt-4o", "choices": [] });
        let err = parse_chat_response(&body).unwrap_err();
        assert!(matches!(err, Error::Provider { .. }));
    }
}
