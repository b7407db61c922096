use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    brush::{MAX_BRUSH_SIZE, MIN_BRUSH_SIZE},
    error::ScatterError,
};

/// Presenter settings that persist with the widget, not with the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterGuiOptions {
    /// Plot image size in ems.
    pub image_size_em: [f64; 2],
    /// Brush radius as a ratio of the scatter bounds width.
    pub random_brush_size: f64,
    pub selected_class_idx: usize,
}

impl Default for ScatterGuiOptions {
    fn default() -> Self {
        Self {
            image_size_em: [20.0, 20.0],
            random_brush_size: 0.1,
            selected_class_idx: 0,
        }
    }
}

impl ScatterGuiOptions {
    pub fn save_to_json(&self) -> Value {
        // Plain data with string keys always serializes.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Load options from JSON. Missing keys keep their defaults.
    pub fn load_from_json(json: &Value) -> Result<Self, ScatterError> {
        Ok(Self::deserialize(json)?.sanitized())
    }

    pub fn to_json_string(&self) -> Result<String, ScatterError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ScatterError> {
        Ok(serde_json::from_str::<Self>(json)?.sanitized())
    }

    /// Clamp values into the ranges the widget can display.
    pub fn sanitized(mut self) -> Self {
        self.random_brush_size = if self.random_brush_size.is_finite() {
            self.random_brush_size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE)
        } else {
            ScatterGuiOptions::default().random_brush_size
        };
        for size in &mut self.image_size_em {
            if !size.is_finite() || *size < 1.0 {
                *size = 1.0;
            }
        }
        self
    }
}
