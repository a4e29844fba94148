//! Retrying options loader decorator

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::CascadeEngine;
use crate::error::{CascadeError, CascadeResult};
use crate::traits::OptionsLoader;
use crate::types::{PickerOption, PickerValue};

const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);
const MAX_DELAY: Duration = Duration::from_secs(10);

/// Re-invokes the wrapped loader with the same arguments when it fails with
/// a retryable error.
///
/// # Retry strategy
/// - Only retry errors where [`CascadeError::is_retryable`] holds
/// - Exponential backoff: 100ms, 200ms, 400ms, ... (maximum 10 seconds)
pub struct RetryingLoader<T: PickerValue> {
    inner: Arc<dyn OptionsLoader<T>>,
    max_retries: u32,
    base_delay: Duration,
}

impl<T: PickerValue> RetryingLoader<T> {
    /// Wrap `inner`, retrying at most `max_retries` times (0 means no retries)
    #[must_use]
    pub fn new(inner: Arc<dyn OptionsLoader<T>>, max_retries: u32) -> Self {
        Self {
            inner,
            max_retries,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }

    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(MAX_DELAY)
    }
}

#[async_trait]
impl<T: PickerValue> OptionsLoader<T> for RetryingLoader<T> {
    async fn load(
        &self,
        picker: &CascadeEngine<T>,
        parent: Option<&T>,
        column: usize,
    ) -> CascadeResult<Vec<PickerOption<T>>> {
        let mut attempt = 0;
        loop {
            match self.inner.load(picker, parent, column).await {
                Ok(options) => return Ok(options),
                Err(e) if attempt < self.max_retries && e.is_retryable() => {
                    let delay = self.backoff_delay(attempt);
                    log::warn!(
                        "[{}] Loading column {} failed (attempt {}/{}), retrying in {:.1}s: {}",
                        picker.data_key(),
                        column,
                        attempt + 1,
                        self.max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_host, region_script, ScriptedLoader};
    use crate::types::CascadeOptions;

    fn retrying(inner: Arc<ScriptedLoader<i32>>, max_retries: u32) -> Arc<RetryingLoader<i32>> {
        Arc::new(RetryingLoader::<i32>::new(inner, max_retries).with_base_delay(Duration::ZERO))
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let inner = Arc::new(ScriptedLoader::new(region_script));
        let loader = RetryingLoader::<i32>::new(inner, 3);
        assert_eq!(loader.backoff_delay(0), Duration::from_millis(100));
        assert_eq!(loader.backoff_delay(2), Duration::from_millis(400));
        assert_eq!(loader.backoff_delay(20), MAX_DELAY);
    }

    #[tokio::test]
    async fn transient_failures_are_retried_with_same_arguments() {
        let inner = Arc::new(ScriptedLoader::new(region_script));
        inner.fail_column(0, 2).await;
        let (host, _, _) = create_test_host();

        let engine = crate::CascadeEngine::create(
            host,
            "picker",
            retrying(inner.clone(), 3),
            CascadeOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(engine.column_options(0).await.map(|o| o.len()), Some(2));
        let calls = inner.calls().await;
        assert_eq!(&calls[..3], &[(None, 0), (None, 0), (None, 0)]);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let inner = Arc::new(ScriptedLoader::new(region_script));
        inner.fail_column(0, 5).await;
        let (host, _, _) = create_test_host();

        let result = crate::CascadeEngine::create(
            host,
            "picker",
            retrying(inner.clone(), 2),
            CascadeOptions::default(),
        )
        .await;

        assert!(matches!(result, Err(CascadeError::Loader { column: 0, .. })));
        assert_eq!(inner.calls().await.len(), 3);
    }
}
