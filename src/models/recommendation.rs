use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RecommendError;

/// Which of the two hosted model variants scores the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelVariant {
    Standard,
    Generative,
}

impl ModelVariant {
    pub fn from_flag(use_gen_model: bool) -> Self {
        if use_gen_model {
            ModelVariant::Generative
        } else {
            ModelVariant::Standard
        }
    }

    /// Display label shown next to the results
    pub fn label(&self) -> &'static str {
        match self {
            ModelVariant::Standard => "DeepFM",
            ModelVariant::Generative => "DeepFM (gen)",
        }
    }
}

/// Incoming recommendation request.
///
/// Fields are kept as raw JSON values because callers disagree on whether
/// they send numbers or strings; `normalize` coerces them.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default)]
    pub gender: Value,
    #[serde(default)]
    pub age_group: Value,
    #[serde(default)]
    pub shopping_level: Value,
    #[serde(default)]
    pub is_student: Value,
    #[serde(default)]
    pub hour_of_click: Value,
    #[serde(default)]
    pub day_of_click: Value,
    #[serde(default, alias = "model")]
    pub use_gen_model: Value,
}

/// Payload in the shape the hosted model expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInput {
    pub gender: String,
    pub age: String,
    pub shopping: String,
    pub occupation: String,
    pub hour: i64,
    pub day: i64,
    pub use_gen_model: bool,
}

impl RecommendationRequest {
    /// Model-selection flag; a native `true` or the string `"true"` select the
    /// generative variant, anything else the standard one.
    pub fn use_gen_model(&self) -> bool {
        match &self.use_gen_model {
            Value::Bool(b) => *b,
            Value::String(s) => s == "true",
            _ => false,
        }
    }

    pub fn variant(&self) -> ModelVariant {
        ModelVariant::from_flag(self.use_gen_model())
    }

    /// Coerces the raw request into the hosted model's input shape
    pub fn normalize(&self) -> Result<ModelInput, RecommendError> {
        Ok(ModelInput {
            gender: coerce_string("gender", &self.gender)?,
            age: coerce_string("ageGroup", &self.age_group)?,
            shopping: coerce_string("shoppingLevel", &self.shopping_level)?,
            occupation: coerce_string("isStudent", &self.is_student)?,
            hour: coerce_int("hourOfClick", &self.hour_of_click)?,
            day: coerce_int("dayOfClick", &self.day_of_click)?,
            use_gen_model: self.use_gen_model(),
        })
    }
}

fn coerce_string(field: &str, value: &Value) -> Result<String, RecommendError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(i.to_string()),
            (None, Some(f)) if f.fract() == 0.0 => Ok(format!("{}", f as i64)),
            _ => Ok(n.to_string()),
        },
        _ => Err(RecommendError::InvalidInput(format!("{} is required", field))),
    }
}

fn coerce_int(field: &str, value: &Value) -> Result<i64, RecommendError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        _ => None,
    };

    parsed.ok_or_else(|| RecommendError::InvalidInput(format!("{} must be an integer", field)))
}

/// One scored item as returned by the hosted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub brand: i64,
    pub cate_id: i64,
    pub price: f64,
    pub probability: f64,
}

/// Raw response body of the hosted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    pub top_10_recommendations: Vec<RecommendationItem>,
    pub total_products_scored: u64,
}

/// A scored item with human-readable brand and category names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRecommendation {
    pub rank: usize,
    pub brand_id: i64,
    pub brand_name: String,
    pub category_id: i64,
    pub category_name: String,
    pub price: f64,
    pub probability: f64,
    pub confidence: u32,
}

/// Response of `POST /api/recommend`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub success: bool,
    pub model_type: String,
    pub total_products_scored: u64,
    pub recommendations: Vec<EnrichedRecommendation>,
}

/// Probability as a whole percentage, rounded half away from zero
pub fn confidence(probability: f64) -> u32 {
    (probability * 100.0).round() as u32
}
