use std::sync::Arc;

use solana_sdk::{hash::Hash, signature::Signature};

use crate::errors::ChainError;
use crate::plan::TokenAccountRef;

/// Read-only chain queries used by the donation flow.
pub trait ChainQuery {
    /// Raw token balance (smallest units) held by `account`.
    fn token_account_balance(&self, account: &TokenAccountRef) -> Result<u64, ChainError>;

    fn account_exists(&self, account: &TokenAccountRef) -> Result<bool, ChainError>;

    /// Recent blockhash; transactions are built and confirmed against it.
    fn latest_block_reference(&self) -> Result<Hash, ChainError>;

    /// `Ok(false)` means not (yet) confirmed; callers decide whether to keep waiting.
    fn confirm_transaction(
        &self,
        signature: &Signature,
        block_reference: &Hash,
    ) -> Result<bool, ChainError>;
}

impl<T: ChainQuery + ?Sized> ChainQuery for &T {
    fn token_account_balance(&self, account: &TokenAccountRef) -> Result<u64, ChainError> {
        (**self).token_account_balance(account)
    }

    fn account_exists(&self, account: &TokenAccountRef) -> Result<bool, ChainError> {
        (**self).account_exists(account)
    }

    fn latest_block_reference(&self) -> Result<Hash, ChainError> {
        (**self).latest_block_reference()
    }

    fn confirm_transaction(
        &self,
        signature: &Signature,
        block_reference: &Hash,
    ) -> Result<bool, ChainError> {
        (**self).confirm_transaction(signature, block_reference)
    }
}

impl<T: ChainQuery + ?Sized> ChainQuery for Arc<T> {
    fn token_account_balance(&self, account: &TokenAccountRef) -> Result<u64, ChainError> {
        (**self).token_account_balance(account)
    }

    fn account_exists(&self, account: &TokenAccountRef) -> Result<bool, ChainError> {
        (**self).account_exists(account)
    }

    fn latest_block_reference(&self) -> Result<Hash, ChainError> {
        (**self).latest_block_reference()
    }

    fn confirm_transaction(
        &self,
        signature: &Signature,
        block_reference: &Hash,
    ) -> Result<bool, ChainError> {
        (**self).confirm_transaction(signature, block_reference)
    }
}
