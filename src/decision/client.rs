use async_trait::async_trait;
use base64::Engine as _;

use crate::computer::interface::ScreenSize;
use crate::config::AzureConfig;
use crate::decision::types::{ActionDescriptor, ConversationContext};
use crate::errors::{DeskPilotError, DeskPilotResult};

const MAX_OUTPUT_TOKENS: u32 = 1500;

/// External decision service: screenshot + task prompt in, zero or more
/// action descriptors out. Trait seam so the perception loop is testable
/// without network access.
#[async_trait]
pub trait Decider: Send + Sync {
    async fn decide(
        &self,
        ctx: &mut ConversationContext,
        task_prompt: &str,
        screenshot_png: &[u8],
        screen: ScreenSize,
    ) -> DeskPilotResult<Vec<ActionDescriptor>>;
}

/// Azure OpenAI Responses API client for the computer-use-preview model.
pub struct AzureDecider {
    endpoint: String,
    api_key: String,
    deployment: String,
    client: reqwest::Client,
}

impl AzureDecider {
    pub fn new(config: &AzureConfig) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            deployment: config.deployment.clone(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Decider for AzureDecider {
    async fn decide(
        &self,
        ctx: &mut ConversationContext,
        task_prompt: &str,
        screenshot_png: &[u8],
        screen: ScreenSize,
    ) -> DeskPilotResult<Vec<ActionDescriptor>> {
        let image_b64 = base64::engine::general_purpose::STANDARD.encode(screenshot_png);

        let mut body = serde_json::json!({
            "model": self.deployment,
            "tools": [{
                "type": "computer_use_preview",
                "display_width": screen.width,
                "display_height": screen.height,
                "environment": "windows",
            }],
            "input": [{
                "role": "user",
                "content": [
                    { "type": "input_text", "text": task_prompt },
                    {
                        "type": "input_image",
                        "image_url": format!("data:image/png;base64,{image_b64}"),
                    },
                ],
            }],
            "truncation": "auto",
            "max_output_tokens": MAX_OUTPUT_TOKENS,
        });
        if let Some(prev) = ctx.last_response_id() {
            body["previous_response_id"] = serde_json::json!(prev);
        }

        tracing::debug!(
            deployment = %self.deployment,
            image_bytes = screenshot_png.len(),
            previous_response_id = ?ctx.last_response_id(),
            "requesting next actions"
        );

        let url = format!("{}/openai/v1/responses", self.endpoint);
        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let err_body = response.text().await.unwrap_or_default();
            return Err(DeskPilotError::Decision(format!("{status}: {err_body}")));
        }

        let json: serde_json::Value = response.json().await?;

        let response_id = json["id"].as_str().unwrap_or_default().to_string();
        if !response_id.is_empty() {
            ctx.push(response_id);
        }

        let actions: Vec<ActionDescriptor> = json["output"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item["type"] == "computer_call")
                    .map(|item| ActionDescriptor {
                        kind: item["action"]["type"].as_str().unwrap_or_default().to_string(),
                        call_id: item["call_id"].as_str().unwrap_or_default().to_string(),
                        params: item["action"].clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        tracing::info!(
            actions = actions.len(),
            kinds = ?actions.iter().map(|a| a.kind.as_str()).collect::<Vec<_>>(),
            exchanges = ctx.exchanges(),
            "decision received"
        );

        Ok(actions)
    }
}
