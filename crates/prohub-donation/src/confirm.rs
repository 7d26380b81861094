// Confirmation Polling
//
// Polls `confirm_transaction` until the signature is confirmed, the chain
// reports an error, the timeout elapses, or the caller cancels. Giving up
// only means the outcome is unverified; the transaction may still land.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use solana_sdk::{hash::Hash, signature::Signature};
use tracing::{debug, info, warn};

use crate::chain::ChainQuery;
use crate::errors::DonationError;

/// Shared cancel flag. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl ConfirmationPolicy {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationResult {
    pub signature: Signature,
    pub block_reference: Hash,
    pub attempts: u32,
    pub elapsed: Duration,
}

pub fn await_confirmation<C: ChainQuery + ?Sized>(
    chain: &C,
    signature: &Signature,
    block_reference: &Hash,
    policy: &ConfirmationPolicy,
    cancel: &CancellationToken,
) -> Result<ConfirmationResult, DonationError> {
    let started = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            debug!(%signature, attempts, "confirmation wait cancelled");
            return Err(DonationError::Cancelled);
        }

        attempts = attempts.saturating_add(1);
        match chain.confirm_transaction(signature, block_reference) {
            Ok(true) => {
                let elapsed = started.elapsed();
                info!(%signature, attempts, ?elapsed, "transaction confirmed");
                return Ok(ConfirmationResult {
                    signature: *signature,
                    block_reference: *block_reference,
                    attempts,
                    elapsed,
                });
            }
            Ok(false) => {}
            Err(err) => {
                warn!(%signature, error = %err, "confirmation lookup failed");
                return Err(DonationError::ConfirmationFailed {
                    signature: *signature,
                    reason: err.to_string(),
                });
            }
        }

        let elapsed = started.elapsed();
        if elapsed >= policy.timeout {
            warn!(%signature, attempts, ?elapsed, "gave up waiting for confirmation");
            return Err(DonationError::ConfirmationFailed {
                signature: *signature,
                reason: format!("not confirmed after {} attempts", attempts),
            });
        }

        thread::sleep(policy.poll_interval.min(policy.timeout - elapsed));
    }
}
