use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::DeskPilotResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

/// Primitive operations of the remote desktop-control backend. The backend
/// itself is an external collaborator; this trait is the consumed surface.
///
/// Calls return once the backend has accepted the operation. Nothing waits
/// for the target application to settle; callers insert their own delays.
#[async_trait]
pub trait ComputerInterface: Send + Sync {
    async fn connect(&self) -> DeskPilotResult<()>;
    async fn disconnect(&self) -> DeskPilotResult<()>;

    async fn screenshot(&self) -> DeskPilotResult<Vec<u8>>;
    async fn left_click(&self, x: i32, y: i32) -> DeskPilotResult<()>;
    async fn move_cursor(&self, x: i32, y: i32) -> DeskPilotResult<()>;
    async fn type_text(&self, text: &str) -> DeskPilotResult<()>;
    async fn press_key(&self, key: &str) -> DeskPilotResult<()>;
    async fn hotkey(&self, keys: &[&str]) -> DeskPilotResult<()>;
    async fn scroll(&self, x: i32, y: i32, scroll_x: i32, scroll_y: i32) -> DeskPilotResult<()>;
    async fn get_cursor_position(&self) -> DeskPilotResult<Point>;
    async fn get_screen_size(&self) -> DeskPilotResult<ScreenSize>;
}
