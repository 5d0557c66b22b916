//! # shellwright core
//!
//! Domain types, traits, and error definitions shared by every shellwright
//! crate. Nothing in here performs I/O: the transport lives behind the
//! [`Provider`] trait and the credential is an explicit [`Credential`] value.

pub mod credential;
pub mod error;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use credential::Credential;
pub use error::{Error, ExecutionError, ProviderError, Result};
pub use message::{Conversation, ConversationId, Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
