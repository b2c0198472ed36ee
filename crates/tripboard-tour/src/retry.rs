//! Retry policy for tourism API calls.
//!
//! [`RetryPolicy::run`] retries transient failures of one upstream operation
//! with exponential back-off. A quota error (`22`) trips the client's shared
//! [`QuotaGate`], so concurrent and subsequent calls stop hitting the gateway
//! until the cool-down passes instead of each burning its own retries.

use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::TourApiError;

/// Upstream result codes that indicate a transient gateway-side failure.
///
/// `01` application error, `04` HTTP error, `05` service timeout.
const TRANSIENT_RESULT_CODES: &[&str] = &["01", "04", "05"];

/// `LIMITED_NUMBER_OF_SERVICE_REQUESTS_EXCEEDS_ERROR`.
pub(crate) const QUOTA_EXCEEDED_CODE: &str = "22";

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection reset.
/// - HTTP 5xx responses.
/// - Result codes in [`TRANSIENT_RESULT_CODES`].
///
/// **Not retriable:**
/// - Any other [`TourApiError::ApiError`] (bad key, quota, bad parameters).
/// - Malformed bodies and configuration errors.
pub(crate) fn is_retriable(err: &TourApiError) -> bool {
    match err {
        TourApiError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        TourApiError::ApiError { code, .. } => TRANSIENT_RESULT_CODES.contains(&code.as_str()),
        TourApiError::Deserialize { .. }
        | TourApiError::Xml(_)
        | TourApiError::InvalidBaseUrl { .. } => false,
    }
}

/// Short label for logs: the upstream result code or HTTP status.
fn failure_code(err: &TourApiError) -> String {
    match err {
        TourApiError::ApiError { code, .. } => code.clone(),
        TourApiError::Http(e) => e
            .status()
            .map_or_else(|| "network".to_string(), |s| s.as_u16().to_string()),
        TourApiError::Deserialize { .. } => "malformed_json".to_string(),
        TourApiError::Xml(_) => "malformed_xml".to_string(),
        TourApiError::InvalidBaseUrl { .. } => "invalid_base_url".to_string(),
    }
}

/// Blocks calls for a cool-down period after the gateway reports that the
/// request quota is exhausted.
#[derive(Debug)]
pub(crate) struct QuotaGate {
    cooldown: Duration,
    closed_until: Mutex<Option<Instant>>,
}

impl QuotaGate {
    pub(crate) fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            closed_until: Mutex::new(None),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed_until
            .lock()
            .is_ok_and(|until| until.is_some_and(|t| Instant::now() < t))
    }

    fn trip(&self) {
        if let Ok(mut until) = self.closed_until.lock() {
            *until = Some(Instant::now() + self.cooldown);
        }
    }
}

/// How many times, and how patiently, an upstream operation is retried.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    pub(crate) max_retries: u32,
    pub(crate) backoff_base_ms: u64,
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based):
    /// `backoff_base_ms × 2^(retry-1)`, capped at 60 s, then jittered ±25 %.
    fn delay_for(self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(10);
        let capped = self
            .backoff_base_ms
            .saturating_mul(1u64 << exponent)
            .min(MAX_DELAY_MS);
        let jitter = rand::random::<f64>() * 0.5 + 0.75;
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let jittered = (capped as f64 * jitter) as u64;
        Duration::from_millis(jittered)
    }

    /// Runs `call` for the upstream operation `op`.
    ///
    /// Gives up immediately on non-retriable errors and while `gate` is
    /// closed. A quota error closes `gate` for every caller sharing it.
    pub(crate) async fn run<T, F, Fut>(
        self,
        op: &str,
        gate: &QuotaGate,
        mut call: F,
    ) -> Result<T, TourApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TourApiError>>,
    {
        let mut retry = 0u32;
        loop {
            if gate.is_closed() {
                tracing::debug!(op, "tour API quota gate closed, skipping call");
                return Err(TourApiError::ApiError {
                    code: QUOTA_EXCEEDED_CODE.to_string(),
                    message: "request quota exhausted; call skipped".to_string(),
                });
            }

            let err = match call().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            let code = failure_code(&err);

            if code == QUOTA_EXCEEDED_CODE {
                tracing::warn!(op, cooldown_secs = gate.cooldown.as_secs(), "tour API quota exhausted");
                gate.trip();
                return Err(err);
            }
            if !is_retriable(&err) || retry >= self.max_retries {
                return Err(err);
            }

            retry += 1;
            let delay = self.delay_for(retry);
            tracing::warn!(
                op,
                code = %code,
                retry,
                max_retries = self.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "tour API call failed, backing off"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
