use std::time::Duration;

use super::classification::ErrorClassification;

impl ErrorClassification {
    /// Delay before a retried attempt (0-indexed `attempt`). Only
    /// `ToolTimeout` is ever retried by `runner::retry`, and then only once,
    /// but the backoff shape follows the same exponential-plus-jitter
    /// convention used for every other retryable path in this engine.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let base: f64 = 2.0_f64.powi(attempt as i32);
        let jitter: f64 = rand::random::<f64>();
        let secs = (base + jitter).min(30.0);
        Duration::from_secs_f64(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;

    #[test]
    fn delay_grows_with_attempt() {
        let class = EngineError::ToolTimeout("nikto".into()).classify();
        let d0 = class.retry_delay(0);
        let d3 = class.retry_delay(3);
        assert!(d3 >= d0);
    }

    #[test]
    fn delay_is_capped() {
        let class = EngineError::ToolTimeout("nikto".into()).classify();
        let d = class.retry_delay(10);
        assert!(d.as_secs_f64() <= 30.0);
    }
}
