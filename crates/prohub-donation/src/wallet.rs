use std::sync::Arc;

use solana_sdk::{pubkey::Pubkey, signature::Signature};

use crate::errors::WalletError;
use crate::plan::TransactionPlan;

// Connected-wallet capability surface.
//
// The session lives as long as the host keeps the provider connected; the
// donation flow only reads it and never connects on its own.
pub trait WalletProvider {
    fn connected_address(&self) -> Option<Pubkey>;

    fn is_connected(&self) -> bool;

    // Sign and broadcast the plan as one transaction.
    // `Ok(None)` means the wallet finished without producing a signature.
    fn send_transaction(&self, plan: &TransactionPlan) -> Result<Option<Signature>, WalletError>;

    fn disconnect(&self) -> Result<(), WalletError>;
}

impl<T: WalletProvider + ?Sized> WalletProvider for &T {
    fn connected_address(&self) -> Option<Pubkey> {
        (**self).connected_address()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn send_transaction(&self, plan: &TransactionPlan) -> Result<Option<Signature>, WalletError> {
        (**self).send_transaction(plan)
    }

    fn disconnect(&self) -> Result<(), WalletError> {
        (**self).disconnect()
    }
}

impl<T: WalletProvider + ?Sized> WalletProvider for Arc<T> {
    fn connected_address(&self) -> Option<Pubkey> {
        (**self).connected_address()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn send_transaction(&self, plan: &TransactionPlan) -> Result<Option<Signature>, WalletError> {
        (**self).send_transaction(plan)
    }

    fn disconnect(&self) -> Result<(), WalletError> {
        (**self).disconnect()
    }
}
