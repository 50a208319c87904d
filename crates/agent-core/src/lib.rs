//! Core abstractions for multi-agent delegation
//!
//! This crate defines the fundamental traits and types used throughout the
//! workspace: the [`Agent`] contract, conversation [`Message`]s, agent
//! descriptors, session state, and the shared error taxonomy.

pub mod agent;
pub mod descriptor;
pub mod error;
pub mod message;
pub mod session;

pub use agent::Agent;
pub use descriptor::{AgentDescriptor, ContentType};
pub use error::{Error, Result};
pub use message::{ContentPart, Message, Role};
pub use session::{InMemorySessionStore, SessionState, SessionStore};
