//! Analysis API DTOs

use serde::{Deserialize, Serialize};

/// Body returned by `GET /api/vercel/stock-analysis`
///
/// Every field is optional on the wire; the analysis workflow fills in
/// `analysis` once it has finished, and reports failures through `error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub stock_code: Option<String>,
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub analysis: Option<serde_json::Value>,
    #[serde(default)]
    pub stock_info: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AnalysisResponse {
    /// The backend error, if one was reported; an empty string means none
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }

    /// Whether the `analysis` object carries any finished article text
    ///
    /// Follows the API's JSON truthiness: empty strings, `null`, `false` and
    /// zero count as absent, any other value as present.
    pub fn has_analysis_text(&self) -> bool {
        let Some(analysis) = self.analysis.as_ref() else {
            return false;
        };

        ["professional_analysis", "dark_analysis"]
            .iter()
            .any(|key| match analysis.get(key) {
                Some(serde_json::Value::String(text)) => !text.is_empty(),
                Some(serde_json::Value::Bool(flag)) => *flag,
                Some(serde_json::Value::Number(n)) => n.as_f64() != Some(0.0),
                Some(serde_json::Value::Null) | None => false,
                Some(_) => true,
            })
    }
}
