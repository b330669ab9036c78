//! Status check contract
//!
//! The poller never talks HTTP itself. It drives anything implementing
//! [`StatusCheck`], which keeps the state machine testable with scripted
//! fakes and lets the HTTP client plug in unchanged.

use async_trait::async_trait;
use std::future::Future;

use crate::domain::check::{CheckError, CheckResult};
use crate::domain::report::AnalysisReport;
use crate::dto::analysis::AnalysisResponse;

/// Asks the analysis backend whether a job has finished
///
/// Implementations must not panic on transport failures; they resolve to
/// [`CheckResult::Error`] instead.
#[async_trait]
pub trait StatusCheck: Send + Sync {
    /// Performs one check for `job_id`
    async fn check(&self, job_id: &str) -> CheckResult;
}

#[async_trait]
impl<F, Fut> StatusCheck for F
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CheckResult> + Send + 'static,
{
    async fn check(&self, job_id: &str) -> CheckResult {
        (self)(job_id.to_string()).await
    }
}

/// Classifies an API response
///
/// - a non-empty `error` field wins and yields [`CheckError::Upstream`]
/// - finished analysis text or `status == "completed"` yields `Ready` with the
///   normalised report as payload
/// - anything else is `NotReady`
pub fn classify(response: AnalysisResponse, job_id: &str) -> CheckResult {
    if let Some(error) = response.error_message() {
        return CheckResult::Error(CheckError::Upstream(error.to_string()));
    }

    let completed = response.status.as_deref() == Some("completed");
    if !response.has_analysis_text() && !completed {
        return CheckResult::NotReady;
    }

    let report = AnalysisReport::from_response(response, job_id);
    match serde_json::to_value(&report) {
        Ok(payload) => CheckResult::Ready(payload),
        Err(e) => CheckResult::Error(CheckError::MalformedResponse(e.to_string())),
    }
}
