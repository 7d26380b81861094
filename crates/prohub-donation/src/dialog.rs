// Donation Dialog
//
// Per-dialog state around the submitter: the amount field, a busy flag that
// allows one in-flight attempt, and a cancel token tripped when the dialog
// closes. Closing stops polling and drops pending UI updates; it cannot undo
// a transaction that was already broadcast.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::amount::{format_ui_amount, to_ui_amount};
use crate::chain::ChainQuery;
use crate::config::DonationConfig;
use crate::confirm::CancellationToken;
use crate::errors::DonationError;
use crate::notify::{Notice, Notifier, TracingNotifier};
use crate::project::{DonationRecord, DonationRecorder, ListingRef};
use crate::submitter::{DonationReceipt, DonationRequest, DonationSubmitter};
use crate::wallet::WalletProvider;

#[derive(Debug)]
pub enum SubmitOutcome {
    // Another attempt was in flight; nothing was sent
    Ignored,
    Donated(DonationReceipt),
    Failed(DonationError),
}

struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

type BoxedRecorder = Box<dyn DonationRecorder + Send + Sync>;

pub struct DonationDialog<W, C, N = TracingNotifier> {
    wallet: W,
    chain: C,
    notifier: N,
    config: DonationConfig,
    destination: String,
    recorder: Option<(ListingRef, BoxedRecorder)>,
    amount: Mutex<String>,
    busy: AtomicBool,
    cancel: CancellationToken,
}

impl<W, C> DonationDialog<W, C, TracingNotifier>
where
    W: WalletProvider,
    C: ChainQuery,
{
    pub fn with_logging(wallet: W, chain: C, config: DonationConfig, destination: impl Into<String>) -> Self {
        Self::new(wallet, chain, TracingNotifier, config, destination)
    }
}

impl<W, C, N> DonationDialog<W, C, N>
where
    W: WalletProvider,
    C: ChainQuery,
    N: Notifier,
{
    pub fn new(
        wallet: W,
        chain: C,
        notifier: N,
        config: DonationConfig,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            wallet,
            chain,
            notifier,
            config,
            destination: destination.into(),
            recorder: None,
            amount: Mutex::new(String::new()),
            busy: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_recorder<R>(mut self, listing: ListingRef, recorder: R) -> Self
    where
        R: DonationRecorder + Send + Sync + 'static,
    {
        self.recorder = Some((listing, Box::new(recorder)));
        self
    }

    fn amount_field(&self) -> MutexGuard<'_, String> {
        self.amount.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_amount(&self, input: impl Into<String>) {
        *self.amount_field() = input.into();
    }

    pub fn amount(&self) -> String {
        self.amount_field().clone()
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn close(&self) {
        debug!(destination = %self.destination, "donation dialog closed");
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn submit(&self) -> SubmitOutcome {
        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            debug!("donation already in flight, ignoring submit");
            return SubmitOutcome::Ignored;
        };
        if self.is_closed() {
            return SubmitOutcome::Failed(DonationError::Cancelled);
        }

        let request = DonationRequest::from_wallet(&self.wallet, self.destination.as_str(), self.amount());
        let submitter = DonationSubmitter::new(&self.wallet, &self.chain, &self.config);

        let prepared = match submitter.validate(&request) {
            Ok(prepared) => prepared,
            Err(err) => return self.fail(err),
        };
        self.notifier.notify(Notice::Processing {
            amount: format_ui_amount(prepared.amount, self.config.decimals),
        });

        match submitter.execute(&prepared, &self.cancel) {
            Ok(receipt) => self.succeed(receipt),
            Err(err) => self.fail(err),
        }
    }

    fn fail(&self, err: DonationError) -> SubmitOutcome {
        if !self.is_closed() {
            if let Some(notice) = err.notice() {
                self.notifier.notify(notice);
            }
        }
        SubmitOutcome::Failed(err)
    }

    fn succeed(&self, receipt: DonationReceipt) -> SubmitOutcome {
        // The transfer landed, so it is recorded even if the dialog is gone
        let record_saved = self.record(&receipt);

        if self.is_closed() {
            return SubmitOutcome::Donated(receipt);
        }

        self.notifier.notify(Notice::Success {
            signature: receipt.signature(),
            amount: format_ui_amount(receipt.split.total, self.config.decimals),
        });
        if !record_saved {
            self.notifier.notify(Notice::RecordNotSaved);
        }
        self.amount_field().clear();

        if self.config.disconnect_on_success {
            if let Err(err) = self.wallet.disconnect() {
                warn!(error = %err, "wallet disconnect after donation failed");
            }
        }

        SubmitOutcome::Donated(receipt)
    }

    // Returns false only when a configured recorder failed
    fn record(&self, receipt: &DonationReceipt) -> bool {
        let Some((listing, recorder)) = &self.recorder else {
            return true;
        };

        let record = DonationRecord {
            donation_amount: to_ui_amount(receipt.split.total, self.config.decimals),
            donator: receipt.sender.to_string(),
        };
        match recorder.record(listing, &record) {
            Ok(response) if response.status => true,
            Ok(response) => {
                warn!(
                    path = %listing.donate_path(),
                    message = response.message.as_deref().unwrap_or(""),
                    "backend rejected donation record"
                );
                false
            }
            Err(err) => {
                warn!(path = %listing.donate_path(), error = %err, "failed to record donation");
                false
            }
        }
    }
}
