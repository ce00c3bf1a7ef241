//! Banter API Models
//!
//! Request/response DTOs. Successful responses are wrapped in
//! [`ApiResponse`]: `{ "success": true, "data": ... }`.

mod auth;
mod chat;
mod openrouter;
mod prompt;

pub use auth::*;
pub use chat::*;
pub use openrouter::*;
pub use prompt::*;

use axum::Json;
use serde::Serialize;

/// Success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}
