//! Core types for Storemind.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod actor;
pub mod id;
pub mod permission;

pub use actor::{Actor, ActorType, ParseActorTypeError};
pub use id::*;
pub use permission::{ParsePermissionError, Permission};
