use super::{GenerateRequest, GenerativeModel};
use crate::config::AiConfig;
use crate::error::AiError;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// Gemini generateContent 客户端
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AiError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// 请求体: 图片在前, 文本在后, 要求 JSON 输出
pub fn request_body(request: &GenerateRequest) -> Value {
    let mut parts = Vec::new();
    if let Some(image) = &request.image {
        parts.push(json!({
            "inlineData": {
                "mimeType": image.mime_type,
                "data": STANDARD.encode(&image.data)
            }
        }));
    }
    parts.push(json!({ "text": request.prompt }));

    json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": request.response_schema
        }
    })
}

/// 取第一个候选的文本部分
pub fn response_text(payload: &Value) -> Option<String> {
    let parts = payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_json(&self, request: GenerateRequest) -> Result<Value, AiError> {
        let start = std::time::Instant::now();
        let body = request_body(&request);

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!("Gemini {} returned {}: {}", self.model, status, body);
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = resp.json().await?;
        let text = response_text(&payload).ok_or(AiError::EmptyResponse)?;
        tracing::debug!("Gemini {} responded in {:?}", self.model, start.elapsed());

        Ok(serde_json::from_str(&text)?)
    }
}
