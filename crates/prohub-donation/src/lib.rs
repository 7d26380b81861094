// ProHub Donation Client
//
// Sends a stable-token donation from a connected wallet to a project wallet,
// splitting a fixed platform fee to the treasury.
//
// Flow:
// - validate: wallet connected, amount positive, destination parses
// - fund check: sender token account must hold at least the amount
// - plan: create missing treasury / project token accounts, then transfer
//   the fee and the net donation
// - submit through the wallet, then poll the chain for confirmation
//
// The wallet and chain are reached only through the `WalletProvider` and
// `ChainQuery` traits so the flow can run against mocks or an in-process
// validator.

pub mod amount;
pub mod chain;
pub mod config;
pub mod confirm;
pub mod constants;
pub mod dialog;
pub mod errors;
pub mod notify;
pub mod plan;
pub mod project;
pub mod submitter;
pub mod wallet;

pub use amount::{format_ui_amount, parse_token_amount, split_fee, to_ui_amount, FeeSplit};
pub use chain::ChainQuery;
pub use config::DonationConfig;
pub use confirm::{await_confirmation, CancellationToken, ConfirmationPolicy, ConfirmationResult};
pub use dialog::{DonationDialog, SubmitOutcome};
pub use errors::{ChainError, ConfigError, DonationError, PlanError, RecordError, WalletError};
pub use notify::{Notice, Notifier, TracingNotifier};
pub use plan::{PlanBuilder, PlanStep, TokenAccountRef, TransactionPlan};
pub use project::{
    donate_path, Achievement, DonateResponse, DonationRecord, DonationRecorder, ListingRef,
    Milestone, Project, ProjectStatus, TeamMember,
};
pub use submitter::{DonationReceipt, DonationRequest, DonationSubmitter, PreparedDonation};
pub use wallet::WalletProvider;
