use std::fmt;
use std::sync::Arc;

use solana_sdk::signature::Signature;
use tracing::{info, warn};

/// Toast-style message for a state the user should see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Processing { amount: String },
    NotConnected,
    InvalidAmount,
    InvalidDestination,
    InsufficientFunds,
    SubmissionFailed,
    ConfirmationUnverified { signature: Signature },
    ChainError,
    Success { signature: Signature, amount: String },
    RecordNotSaved,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::Processing { .. } | Notice::Success { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Processing { amount } => write!(f, "Processing your donation of {} USDC...", amount),
            Notice::NotConnected => write!(f, "Connect your wallet to donate"),
            Notice::InvalidAmount => write!(f, "Enter a valid donation amount"),
            Notice::InvalidDestination => write!(f, "This project has no valid wallet address"),
            Notice::InsufficientFunds => write!(f, "Insufficient USDC balance. Fund your wallet first"),
            Notice::SubmissionFailed => write!(f, "Transaction was not sent. Please try again"),
            Notice::ConfirmationUnverified { signature } => write!(
                f,
                "Could not verify the transaction {}. Check your wallet before retrying",
                signature
            ),
            Notice::ChainError => write!(f, "Something went wrong talking to the network"),
            Notice::Success { amount, .. } => write!(f, "Thank you! You donated {} USDC", amount),
            Notice::RecordNotSaved => write!(f, "Donation sent, but it could not be saved to your history"),
        }
    }
}

pub trait Notifier {
    fn notify(&self, notice: Notice);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

// Default notifier for hosts without a UI: notices become log events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        if notice.is_error() {
            warn!(target: "prohub_donation::notice", "{}", notice);
        } else {
            info!(target: "prohub_donation::notice", "{}", notice);
        }
    }
}
