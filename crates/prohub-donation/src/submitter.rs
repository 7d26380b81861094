// Donation Submitter
//
// One linear attempt per call. Validation never touches the network;
// every later failure is terminal for the attempt and is never retried.

use std::str::FromStr;

use solana_sdk::{pubkey::Pubkey, signature::Signature};
use tracing::{debug, info, warn};

use crate::amount::{format_ui_amount, parse_token_amount, split_fee, FeeSplit};
use crate::chain::ChainQuery;
use crate::config::DonationConfig;
use crate::confirm::{await_confirmation, CancellationToken, ConfirmationResult};
use crate::errors::{DonationError, PlanError};
use crate::plan::{PlanBuilder, TokenAccountRef};
use crate::wallet::WalletProvider;

/// Raw user input for one attempt. Built fresh on every submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationRequest {
    pub sender: Option<Pubkey>,
    pub destination: String,
    pub amount: String,
}

impl DonationRequest {
    pub fn new(sender: Option<Pubkey>, destination: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            sender,
            destination: destination.into(),
            amount: amount.into(),
        }
    }

    // Sender is taken from the wallet only while it reports a live connection
    pub fn from_wallet<W: WalletProvider + ?Sized>(
        wallet: &W,
        destination: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        let sender = if wallet.is_connected() {
            wallet.connected_address()
        } else {
            None
        };
        Self::new(sender, destination, amount)
    }
}

// Request that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreparedDonation {
    pub sender: Pubkey,
    pub destination: Pubkey,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationReceipt {
    pub sender: Pubkey,
    pub destination: Pubkey,
    pub split: FeeSplit,
    pub confirmation: ConfirmationResult,
}

impl DonationReceipt {
    pub fn signature(&self) -> Signature {
        self.confirmation.signature
    }
}

pub struct DonationSubmitter<'a, W: ?Sized, C: ?Sized> {
    wallet: &'a W,
    chain: &'a C,
    config: &'a DonationConfig,
}

impl<'a, W, C> DonationSubmitter<'a, W, C>
where
    W: WalletProvider + ?Sized,
    C: ChainQuery + ?Sized,
{
    pub fn new(wallet: &'a W, chain: &'a C, config: &'a DonationConfig) -> Self {
        Self {
            wallet,
            chain,
            config,
        }
    }

    pub fn submit(
        &self,
        request: &DonationRequest,
        cancel: &CancellationToken,
    ) -> Result<DonationReceipt, DonationError> {
        let prepared = self.validate(request)?;
        self.execute(&prepared, cancel)
    }

    // Checked in order, first failure wins: sender, amount, destination
    pub fn validate(&self, request: &DonationRequest) -> Result<PreparedDonation, DonationError> {
        let sender = request.sender.ok_or(DonationError::NotConnected)?;
        let amount = parse_token_amount(&request.amount, self.config.decimals)?;
        let destination = Pubkey::from_str(request.destination.trim())
            .map_err(|_| DonationError::InvalidDestination(request.destination.clone()))?;

        Ok(PreparedDonation {
            sender,
            destination,
            amount,
        })
    }

    pub fn execute(
        &self,
        prepared: &PreparedDonation,
        cancel: &CancellationToken,
    ) -> Result<DonationReceipt, DonationError> {
        let config = self.config;
        let sender_account = TokenAccountRef::associated(prepared.sender, config.mint);

        // A missing sender token account reads the same as an empty one
        let balance = match self.chain.token_account_balance(&sender_account) {
            Ok(balance) => balance,
            Err(err) => {
                warn!(sender = %prepared.sender, error = %err, "sender token account lookup failed");
                return Err(DonationError::InsufficientFunds {
                    available: 0,
                    requested: prepared.amount,
                });
            }
        };
        debug!(
            sender = %prepared.sender,
            balance = %format_ui_amount(balance, config.decimals),
            requested = %format_ui_amount(prepared.amount, config.decimals),
            "sender balance resolved"
        );
        if balance == 0 || balance < prepared.amount {
            warn!(balance, requested = prepared.amount, "insufficient funds");
            return Err(DonationError::InsufficientFunds {
                available: balance,
                requested: prepared.amount,
            });
        }

        let split = split_fee(prepared.amount, config.fee_basis_points)
            .ok_or(PlanError::FeeOutOfRange(config.fee_basis_points))?;
        debug!(total = split.total, fee = split.fee, net = split.net, "fee split computed");

        let mut builder = PlanBuilder::new(prepared.sender, config.mint, config.decimals);
        builder.ensure_account(sender_account, true);

        // Dust donations carry no fee, so the treasury is left out entirely
        let treasury_account = if split.fee > 0 {
            let account = TokenAccountRef::associated(config.treasury, config.mint);
            let exists = self.chain.account_exists(&account)?;
            debug!(address = %account.address, exists, "treasury token account");
            builder.ensure_account(account, exists);
            Some(account)
        } else {
            None
        };

        let destination_account = TokenAccountRef::associated(prepared.destination, config.mint);
        let exists = self.chain.account_exists(&destination_account)?;
        debug!(address = %destination_account.address, exists, "destination token account");
        builder.ensure_account(destination_account, exists);

        if let Some(treasury_account) = treasury_account {
            builder.transfer(&sender_account, &treasury_account, split.fee)?;
        }
        builder.transfer(&sender_account, &destination_account, split.net)?;

        let block_reference = self.chain.latest_block_reference()?;
        let plan = builder.build(block_reference)?;

        // Last point where cancelling still prevents the broadcast
        if cancel.is_cancelled() {
            return Err(DonationError::Cancelled);
        }

        let signature = match self.wallet.send_transaction(&plan) {
            Ok(Some(signature)) => signature,
            Ok(None) => {
                warn!("wallet returned no signature");
                return Err(DonationError::SubmissionFailed(
                    "wallet returned no signature".to_string(),
                ));
            }
            Err(err) => {
                warn!(error = %err, "wallet failed to send transaction");
                return Err(DonationError::SubmissionFailed(err.to_string()));
            }
        };
        info!(%signature, steps = plan.steps().len(), debited = plan.total_debited(), "donation submitted");

        let confirmation = await_confirmation(
            self.chain,
            &signature,
            &block_reference,
            &config.confirmation_policy(),
            cancel,
        )?;

        Ok(DonationReceipt {
            sender: prepared.sender,
            destination: prepared.destination,
            split,
            confirmation,
        })
    }
}
