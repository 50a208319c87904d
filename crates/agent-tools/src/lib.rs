//! Tool management and execution framework for agent-rs
//!
//! This crate provides a framework for defining and executing tools (functions)
//! that agents can use to perform actions. Every tool publishes a typed
//! [`ToolDescriptor`]; arguments are validated against it before the tool runs.

pub mod descriptor;
pub mod error;
pub mod registry;
pub mod tool;

pub use descriptor::{ParameterSpec, ToolDescriptor, ValueType};
pub use error::{Result, ToolError};
pub use registry::ToolRegistry;
pub use tool::{Tool, render_output};
