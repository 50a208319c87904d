//! Concrete agent implementations

pub mod local;

pub use local::{LocalAgent, LocalAgentBuilder};
