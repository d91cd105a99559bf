//! Tracing, timing and error logging around service calls.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{Instrument, debug, error, info_span, warn};

use taskflow_core::config::MonitoringConfig;
use taskflow_core::result::AppResult;

use crate::context::RequestContext;

/// Wraps service calls with a span carrying the trace id, entry/exit logs,
/// slow-call warnings and error logging. Results pass through unchanged.
#[derive(Debug, Clone, Copy)]
pub struct CallInterceptor {
    slow_threshold: Duration,
}

impl CallInterceptor {
    /// Creates an interceptor from monitoring settings.
    pub fn new(config: &MonitoringConfig) -> Self {
        Self {
            slow_threshold: Duration::from_millis(config.slow_threshold_ms),
        }
    }

    /// The configured slow-call threshold.
    pub fn slow_threshold(&self) -> Duration {
        self.slow_threshold
    }

    /// Run `call` as the service method `method` on behalf of `ctx`.
    pub async fn around<T, F>(&self, ctx: &RequestContext, method: &str, call: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        let trace_id = ctx.trace_id.as_str();
        let span = info_span!("service_call", trace_id, method, user = ctx.username());

        async move {
            debug!("[{trace_id}] -> {method}");
            let started = Instant::now();
            let result = call.await;
            let elapsed = started.elapsed();
            let elapsed_ms = elapsed.as_millis() as u64;

            if elapsed > self.slow_threshold {
                warn!(method, elapsed_ms, "Slow method: {method} took {elapsed_ms}ms");
            }

            match &result {
                Ok(_) => debug!("[{trace_id}] <- {method} ({elapsed_ms}ms)"),
                Err(e) => error!(
                    trace_id,
                    method,
                    error_code = e.code(),
                    error = %e.message,
                    "[{trace_id}] !! {method} failed after {elapsed_ms}ms"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }
}

impl Default for CallInterceptor {
    fn default() -> Self {
        Self::new(&MonitoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskflow_core::AppError;
    use taskflow_core::error::ErrorKind;

    #[tokio::test]
    async fn test_result_passes_through() {
        let calls = CallInterceptor::default();
        let ctx = RequestContext::anonymous();

        let ok = calls.around(&ctx, "StoryService.get", async { Ok(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = calls
            .around::<(), _>(&ctx, "StoryService.get", async {
                Err(AppError::not_found("Story 1 not found"))
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Story 1 not found");
    }

    #[test]
    fn test_threshold_from_config() {
        let calls = CallInterceptor::new(&MonitoringConfig {
            slow_threshold_ms: 250,
        });
        assert_eq!(calls.slow_threshold(), Duration::from_millis(250));
    }
}
