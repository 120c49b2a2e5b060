use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::computer::interface::{ComputerInterface, Point, ScreenSize};
use crate::errors::{DeskPilotError, DeskPilotResult};

/// In-memory backend double. Records every primitive call in order so
/// tests can assert sequencing, and counts connect/disconnect pairs.
pub struct RecordingComputer {
    calls: Mutex<Vec<String>>,
    cursor: Mutex<Point>,
    screen: ScreenSize,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
    fail_connect: AtomicBool,
    fail_screenshot: AtomicBool,
}

impl RecordingComputer {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            cursor: Mutex::new(Point { x: 0, y: 0 }),
            screen: ScreenSize {
                width: 1920,
                height: 1080,
            },
            connects: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
            fail_connect: AtomicBool::new(false),
            fail_screenshot: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    pub fn set_cursor(&self, point: Point) {
        *self.cursor.lock().expect("cursor lock") = point;
    }

    pub fn fail_connect(&self) {
        self.fail_connect.store(true, Ordering::SeqCst);
    }

    pub fn fail_screenshot(&self) {
        self.fail_screenshot.store(true, Ordering::SeqCst);
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

impl Default for RecordingComputer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ComputerInterface for RecordingComputer {
    async fn connect(&self) -> DeskPilotResult<()> {
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(DeskPilotError::Backend("connect refused".into()));
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> DeskPilotResult<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn screenshot(&self) -> DeskPilotResult<Vec<u8>> {
        if self.fail_screenshot.load(Ordering::SeqCst) {
            return Err(DeskPilotError::Backend("screenshot unavailable".into()));
        }
        self.record("screenshot".into());
        Ok(vec![0x89, 0x50, 0x4e, 0x47])
    }

    async fn left_click(&self, x: i32, y: i32) -> DeskPilotResult<()> {
        self.record(format!("left_click({x},{y})"));
        Ok(())
    }

    async fn move_cursor(&self, x: i32, y: i32) -> DeskPilotResult<()> {
        self.record(format!("move_cursor({x},{y})"));
        Ok(())
    }

    async fn type_text(&self, text: &str) -> DeskPilotResult<()> {
        self.record(format!("type_text({text})"));
        Ok(())
    }

    async fn press_key(&self, key: &str) -> DeskPilotResult<()> {
        self.record(format!("press_key({key})"));
        Ok(())
    }

    async fn hotkey(&self, keys: &[&str]) -> DeskPilotResult<()> {
        self.record(format!("hotkey({})", keys.join("+")));
        Ok(())
    }

    async fn scroll(&self, x: i32, y: i32, scroll_x: i32, scroll_y: i32) -> DeskPilotResult<()> {
        self.record(format!("scroll({x},{y},{scroll_x},{scroll_y})"));
        Ok(())
    }

    async fn get_cursor_position(&self) -> DeskPilotResult<Point> {
        Ok(*self.cursor.lock().expect("cursor lock"))
    }

    async fn get_screen_size(&self) -> DeskPilotResult<ScreenSize> {
        Ok(self.screen)
    }
}
