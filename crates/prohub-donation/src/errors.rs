use solana_sdk::{pubkey::Pubkey, signature::Signature};
use thiserror::Error;

use crate::notify::Notice;

// Terminal outcomes of a single donation attempt.
// None of them is retried; the user re-triggers a new attempt.
#[derive(Error, Debug)]
pub enum DonationError {
    #[error("Wallet is not connected")]
    NotConnected,

    #[error("Donation amount must be a positive number, got {0:?}")]
    InvalidAmount(String),

    #[error("Destination is not a valid wallet address: {0:?}")]
    InvalidDestination(String),

    #[error("Insufficient funds: {available} available, {requested} requested (smallest units)")]
    InsufficientFunds { available: u64, requested: u64 },

    #[error("Transaction submission failed: {0}")]
    SubmissionFailed(String),

    // The transaction may still land; callers must not report lost funds.
    #[error("Could not verify confirmation of {signature}: {reason}")]
    ConfirmationFailed { signature: Signature, reason: String },

    #[error("Chain request failed: {0}")]
    UnknownChainError(#[from] ChainError),

    #[error("Transaction plan rejected: {0}")]
    InvalidPlan(#[from] PlanError),

    #[error("Donation cancelled")]
    Cancelled,
}

impl DonationError {
    // User-facing notice for this failure. Cancellation is expected and stays silent.
    pub fn notice(&self) -> Option<Notice> {
        let notice = match self {
            DonationError::NotConnected => Notice::NotConnected,
            DonationError::InvalidAmount(_) => Notice::InvalidAmount,
            DonationError::InvalidDestination(_) => Notice::InvalidDestination,
            DonationError::InsufficientFunds { .. } => Notice::InsufficientFunds,
            DonationError::SubmissionFailed(_) => Notice::SubmissionFailed,
            DonationError::ConfirmationFailed { signature, .. } => {
                Notice::ConfirmationUnverified { signature: *signature }
            }
            DonationError::UnknownChainError(_) | DonationError::InvalidPlan(_) => Notice::ChainError,
            DonationError::Cancelled => return None,
        };
        Some(notice)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("Account {0} not found")]
    AccountNotFound(Pubkey),

    #[error("Account {0} is not a valid token account")]
    InvalidAccountData(Pubkey),

    #[error("RPC error: {0}")]
    Rpc(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Wallet is not connected")]
    NotConnected,

    #[error("Wallet rejected the transaction: {0}")]
    Rejected(String),

    #[error("Wallet transport error: {0}")]
    Transport(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Token account {0} neither exists nor is created earlier in the plan")]
    AccountNotReady(Pubkey),

    #[error("Transfer amount cannot be zero")]
    ZeroTransfer,

    #[error("Plan contains no transfer")]
    NoTransfers,

    #[error("Fee basis points {0} exceed the denominator")]
    FeeOutOfRange(u16),

    #[error("Instruction encoding failed: {0}")]
    Encoding(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {field} address: {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("Fee basis points cannot exceed maximum allowed ({max}), got {got}")]
    FeeTooHigh { got: u16, max: u16 },

    #[error("Token decimals cannot exceed {max}, got {got}")]
    DecimalsOutOfRange { got: u8, max: u8 },

    #[error("Confirmation poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("Treasury wallet cannot be the token mint")]
    TreasuryIsMint,

    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Backend unreachable: {0}")]
    Transport(String),

    #[error("Backend rejected the donation record: {0}")]
    Rejected(String),
}
