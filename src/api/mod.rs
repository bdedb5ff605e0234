//! API handlers for bookshelf REST endpoints

pub mod books;
pub mod health;
pub mod openapi;

use serde::Serialize;
use utoipa::ToSchema;

/// Success envelope carrying only a message
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    /// Always `success`
    pub status: String,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: &str) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
        }
    }
}
