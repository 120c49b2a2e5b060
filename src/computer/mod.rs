pub mod client;
pub mod interface;
pub mod session;

#[cfg(test)]
pub mod mock;

pub use client::HttpComputer;
pub use interface::{ComputerInterface, Point, ScreenSize};
pub use session::{with_session, Session};
