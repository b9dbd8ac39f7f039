//! API response DTOs not covered by the evaluation contract

use serde::{Deserialize, Serialize};

/// Static liveness indicator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn running() -> Self {
        Self {
            status: "archlens backend is running".to_string(),
        }
    }
}
