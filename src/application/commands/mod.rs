// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between the presentation layer and services
// - Commands accept plain values, return DTOs
// - Commands handle error conversion
// - Commands NEVER contain business logic

pub mod catalog_commands;
pub mod favorites_commands;

pub use catalog_commands::*;
pub use favorites_commands::*;
