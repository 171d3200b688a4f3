// SPDX-License-Identifier: GPL-3.0-only

//! Detection/generation endpoint payloads
//!
//! The endpoint answers with either
//!
//! ```text
//! { "recipe": { "title", "ingredients", "steps" }, "ingredients": [{ "name", "count" }] }
//! { "error": "..." }
//! ```
//!
//! An `error` field wins over the HTTP status so that service-side messages
//! reach the user even on a 4xx/5xx answer.

use crate::errors::DetectionError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A generated recipe. Immutable once attached to a gallery item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
}

/// An ingredient the detector found in the photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedIngredient {
    pub name: String,
    #[serde(default)]
    pub count: u32,
}

/// Successful outcome of one detection/generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    pub recipe: Recipe,
    #[serde(default)]
    pub detected: Vec<DetectedIngredient>,
}

impl Generation {
    pub fn new(recipe: Recipe) -> Self {
        Self {
            recipe,
            detected: Vec::new(),
        }
    }

    pub fn with_detected(mut self, detected: Vec<DetectedIngredient>) -> Self {
        self.detected = detected;
        self
    }
}

#[derive(Debug, Deserialize)]
struct EndpointResponse {
    #[serde(default)]
    recipe: Option<Recipe>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    ingredients: Vec<DetectedIngredient>,
}

/// Turn an HTTP status and body into a generation or a classified failure
pub fn interpret_response(status: u16, body: &[u8]) -> Result<Generation, DetectionError> {
    let success = (200..300).contains(&status);

    let parsed: EndpointResponse = match serde_json::from_slice(body) {
        Ok(parsed) => parsed,
        Err(e) if success => {
            return Err(DetectionError::Malformed(format!(
                "Unreadable response body: {}",
                e
            )));
        }
        Err(_) => return Err(DetectionError::Transport(format!("HTTP {}", status))),
    };

    if let Some(error) = parsed.error.filter(|e| !e.trim().is_empty()) {
        debug!(status, error = %error, "Endpoint reported an error");
        return Err(DetectionError::Service(error));
    }

    if !success {
        return Err(DetectionError::Transport(format!("HTTP {}", status)));
    }

    match parsed.recipe {
        Some(recipe) => Ok(Generation::new(recipe).with_detected(parsed.ingredients)),
        None => Err(DetectionError::Malformed(
            "Response carries neither a recipe nor an error".to_string(),
        )),
    }
}
