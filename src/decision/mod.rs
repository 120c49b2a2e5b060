pub mod client;
pub mod types;

pub use client::{AzureDecider, Decider};
pub use types::{ActionDescriptor, ConversationContext};
