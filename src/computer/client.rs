use async_trait::async_trait;
use base64::Engine as _;

use crate::computer::interface::{ComputerInterface, Point, ScreenSize};
use crate::errors::{DeskPilotError, DeskPilotResult};

/// HTTP client for the desktop-control backend. Commands are JSON posts to
/// `{base_url}/cmd`; responses carry `success`, an optional `error`, and
/// command-specific payload fields.
pub struct HttpComputer {
    base_url: String,
    client: reqwest::Client,
}

impl HttpComputer {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn command(
        &self,
        command: &str,
        params: serde_json::Value,
    ) -> DeskPilotResult<serde_json::Value> {
        let url = format!("{}/cmd", self.base_url);
        tracing::debug!(command, "sending backend command");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "command": command, "params": params }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DeskPilotError::Backend(format!(
                "{command}: {status}: {body}"
            )));
        }

        let json: serde_json::Value = response.json().await?;
        if !json["success"].as_bool().unwrap_or(false) {
            let reason = json["error"].as_str().unwrap_or("backend reported failure");
            return Err(DeskPilotError::Backend(format!("{command}: {reason}")));
        }
        Ok(json)
    }
}

#[async_trait]
impl ComputerInterface for HttpComputer {
    async fn connect(&self) -> DeskPilotResult<()> {
        self.command("connect", serde_json::json!({})).await?;
        tracing::info!(base_url = %self.base_url, "backend session established");
        Ok(())
    }

    async fn disconnect(&self) -> DeskPilotResult<()> {
        self.command("disconnect", serde_json::json!({})).await?;
        tracing::info!(base_url = %self.base_url, "backend session released");
        Ok(())
    }

    async fn screenshot(&self) -> DeskPilotResult<Vec<u8>> {
        let json = self.command("screenshot", serde_json::json!({})).await?;
        let encoded = json["image_data"].as_str().ok_or_else(|| {
            DeskPilotError::Backend("screenshot response missing image_data".into())
        })?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| DeskPilotError::Backend(format!("screenshot decode: {e}")))
    }

    async fn left_click(&self, x: i32, y: i32) -> DeskPilotResult<()> {
        self.command("left_click", serde_json::json!({ "x": x, "y": y }))
            .await?;
        Ok(())
    }

    async fn move_cursor(&self, x: i32, y: i32) -> DeskPilotResult<()> {
        self.command("move_cursor", serde_json::json!({ "x": x, "y": y }))
            .await?;
        Ok(())
    }

    async fn type_text(&self, text: &str) -> DeskPilotResult<()> {
        self.command("type_text", serde_json::json!({ "text": text }))
            .await?;
        Ok(())
    }

    async fn press_key(&self, key: &str) -> DeskPilotResult<()> {
        self.command("press_key", serde_json::json!({ "key": key }))
            .await?;
        Ok(())
    }

    async fn hotkey(&self, keys: &[&str]) -> DeskPilotResult<()> {
        self.command("hotkey", serde_json::json!({ "keys": keys }))
            .await?;
        Ok(())
    }

    async fn scroll(&self, x: i32, y: i32, scroll_x: i32, scroll_y: i32) -> DeskPilotResult<()> {
        self.command(
            "scroll",
            serde_json::json!({ "x": x, "y": y, "scroll_x": scroll_x, "scroll_y": scroll_y }),
        )
        .await?;
        Ok(())
    }

    async fn get_cursor_position(&self) -> DeskPilotResult<Point> {
        let json = self
            .command("get_cursor_position", serde_json::json!({}))
            .await?;
        match (json["x"].as_i64(), json["y"].as_i64()) {
            (Some(x), Some(y)) => Ok(Point {
                x: x as i32,
                y: y as i32,
            }),
            _ => Err(DeskPilotError::Backend(
                "cursor position response missing x/y".into(),
            )),
        }
    }

    async fn get_screen_size(&self) -> DeskPilotResult<ScreenSize> {
        let json = self
            .command("get_screen_size", serde_json::json!({}))
            .await?;
        match (json["width"].as_u64(), json["height"].as_u64()) {
            (Some(width), Some(height)) => Ok(ScreenSize {
                width: width as u32,
                height: height as u32,
            }),
            _ => Err(DeskPilotError::Backend(
                "screen size response missing width/height".into(),
            )),
        }
    }
}
