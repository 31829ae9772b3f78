// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Sits above services and is the only thing a presentation layer talks to
// - Commands take plain arguments and return DTOs
// - Errors cross the boundary as serialized ErrorResponse strings

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod state;

pub use commands::*;
pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use state::AppState;
