use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

/// Enforces a minimum spacing between successive API calls. Probing is
/// strictly sequential, so a single shared timestamp is all the pacing
/// state needed.
#[derive(Debug, Clone)]
pub struct Throttle {
    min_interval: Duration,
    last_call: Arc<Mutex<Option<Instant>>>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Arc::new(Mutex::new(None)),
        }
    }

    /// Waits until at least `min_interval` has passed since the previous
    /// call, then records the new call time.
    pub async fn pace(&self) {
        let mut last_call = self.last_call.lock().await;
        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        *last_call = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_call_does_not_wait() {
        let throttle = Throttle::new(Duration::from_secs(5));
        let started = Instant::now();
        throttle.pace().await;
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_second_call_is_spaced() {
        let throttle = Throttle::new(Duration::from_millis(120));
        throttle.pace().await;
        let started = Instant::now();
        throttle.pace().await;
        assert!(started.elapsed() >= Duration::from_millis(100));
    }
}
