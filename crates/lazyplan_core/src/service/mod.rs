//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the planner view-model API.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod task_store;
