//! Socket factory builder
//!
//! # Modules
//!
//! - [`types`] - Core `SocketFactoryBuilder` struct and configuration methods
//! - [`build`] - Final build logic

pub mod build;
pub mod types;

pub use types::SocketFactoryBuilder;
