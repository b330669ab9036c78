//! Analysis report domain type

use serde::{Deserialize, Serialize};

use crate::dto::analysis::AnalysisResponse;

const DEFAULT_DATA_SOURCE: &str = "n8n_workflow";
const DEFAULT_STATUS: &str = "completed";

/// Normalised analysis report, ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub stock_code: String,
    pub data_source: String,
    pub timestamp: String,
    pub status: String,
    pub analysis: Option<serde_json::Value>,
    pub stock_info: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl AnalysisReport {
    /// Builds a report from a raw response, filling display defaults
    ///
    /// `requested_code` is used when the response omits `stock_code`.
    pub fn from_response(response: AnalysisResponse, requested_code: &str) -> Self {
        Self {
            stock_code: response
                .stock_code
                .unwrap_or_else(|| requested_code.to_string()),
            data_source: response
                .data_source
                .unwrap_or_else(|| DEFAULT_DATA_SOURCE.to_string()),
            timestamp: response
                .timestamp
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
            status: response
                .status
                .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            analysis: response.analysis,
            stock_info: response.stock_info,
            error: response.error.filter(|e| !e.is_empty()),
        }
    }

    /// Text sections of the analysis, in display order
    pub fn sections(&self) -> Vec<(&str, &str)> {
        let Some(analysis) = self.analysis.as_ref() else {
            return Vec::new();
        };

        [
            ("Professional analysis", "professional_analysis"),
            ("Contrarian analysis", "dark_analysis"),
        ]
        .into_iter()
        .filter_map(|(title, key)| {
            analysis
                .get(key)
                .and_then(|v| v.as_str())
                .filter(|text| !text.trim().is_empty())
                .map(|text| (title, text))
        })
        .collect()
    }
}
