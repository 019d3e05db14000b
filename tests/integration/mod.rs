//! Integration tests module
//!
//! This module contains all integration tests for action-versions CLI commands.

pub mod check;
pub mod common;
pub mod update;
