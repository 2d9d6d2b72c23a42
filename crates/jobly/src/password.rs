//! Password hashing for user records.
//!
//! bcrypt is deliberately slow, so both operations run on tokio's blocking
//! pool and the calling task only awaits the result.

use crate::error::{JoblyError, JoblyResult};
use tokio::task;

/// bcrypt hasher with a fixed work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Lowest cost bcrypt accepts. Only suitable for tests.
    pub const MIN_COST: u32 = 4;
    /// Highest cost bcrypt accepts.
    pub const MAX_COST: u32 = 31;
    pub const DEFAULT_COST: u32 = 12;

    /// Create a hasher; `cost` is clamped into bcrypt's accepted range.
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(Self::MIN_COST, Self::MAX_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub async fn hash(&self, password: &str) -> JoblyResult<String> {
        let cost = self.cost;
        let password = password.to_owned();
        blocking(move || bcrypt::hash(password, cost)).await
    }

    pub async fn verify(&self, password: &str, hash: &str) -> JoblyResult<bool> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        blocking(move || bcrypt::verify(password, &hash)).await
    }
}

async fn blocking<T, F>(f: F) -> JoblyResult<T>
where
    F: FnOnce() -> Result<T, bcrypt::BcryptError> + Send + 'static,
    T: Send + 'static,
{
    match task::spawn_blocking(f).await {
        Ok(result) => Ok(result?),
        Err(err) => Err(JoblyError::Password(err.to_string())),
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn hash_then_verify() {
        let hasher = PasswordHasher::new(PasswordHasher::MIN_COST);
        let hash = hasher.hash("hunter22").await.unwrap();
        assert_ne!(hash, "hunter22");
        assert!(hasher.verify("hunter22", &hash).await.unwrap());
        assert!(!hasher.verify("hunter23", &hash).await.unwrap());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn hashing_leaves_the_runtime_responsive() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let ticker = tokio::spawn({
            let ticks = Arc::clone(&ticks);
            async move {
                loop {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                    ticks.fetch_add(1, Ordering::Relaxed);
                }
            }
        });

        let hasher = PasswordHasher::default();
        let hash = hasher.hash("hunter22").await.unwrap();
        let during_hash = ticks.load(Ordering::Relaxed);
        assert!(hasher.verify("hunter22", &hash).await.unwrap());
        ticker.abort();

        // A cost-12 hash takes far longer than a few 1ms sleeps.
        assert!(during_hash >= 3, "ticker only advanced {during_hash} times");
        assert!(ticks.load(Ordering::Relaxed) > during_hash);
    }

    #[test]
    fn cost_is_clamped() {
        assert_eq!(PasswordHasher::new(1).cost(), PasswordHasher::MIN_COST);
        assert_eq!(PasswordHasher::new(99).cost(), PasswordHasher::MAX_COST);
        assert_eq!(PasswordHasher::default().cost(), 12);
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        let hasher = PasswordHasher::new(PasswordHasher::MIN_COST);
        assert!(hasher.verify("x", "not-a-bcrypt-hash").await.is_err());
    }
}
