// Transaction Plan
//
// Ordered steps for one donation transaction: token account creations come
// first, transfers after. `PlanBuilder` refuses a transfer into an account
// that was neither confirmed to exist nor created earlier in the same plan.

use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    message::Message,
    pubkey::Pubkey,
    transaction::Transaction,
};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};

use crate::errors::PlanError;

/// Where one owner's balance of one mint is held (the associated token account).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenAccountRef {
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub address: Pubkey,
}

impl TokenAccountRef {
    pub fn associated(owner: Pubkey, mint: Pubkey) -> Self {
        Self {
            owner,
            mint,
            address: get_associated_token_address(&owner, &mint),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStep {
    // Create the associated token account, paid for by the plan's payer
    CreateAccount(TokenAccountRef),
    Transfer {
        from: TokenAccountRef,
        to: TokenAccountRef,
        amount: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPlan {
    payer: Pubkey,
    mint: Pubkey,
    decimals: u8,
    recent_block_reference: Hash,
    steps: Vec<PlanStep>,
}

impl TransactionPlan {
    pub fn payer(&self) -> Pubkey {
        self.payer
    }

    pub fn mint(&self) -> Pubkey {
        self.mint
    }

    pub fn recent_block_reference(&self) -> Hash {
        self.recent_block_reference
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn creations(&self) -> impl Iterator<Item = &TokenAccountRef> {
        self.steps.iter().filter_map(|step| match step {
            PlanStep::CreateAccount(account) => Some(account),
            _ => None,
        })
    }

    // Sum of all transfer amounts debited from the payer
    pub fn total_debited(&self) -> u64 {
        self.steps
            .iter()
            .map(|step| match step {
                PlanStep::Transfer { amount, .. } => *amount,
                _ => 0,
            })
            .sum()
    }

    pub fn instructions(&self) -> Result<Vec<Instruction>, PlanError> {
        self.steps
            .iter()
            .map(|step| match step {
                PlanStep::CreateAccount(account) => Ok(create_associated_token_account_idempotent(
                    &self.payer,
                    &account.owner,
                    &account.mint,
                    &spl_token::ID,
                )),
                PlanStep::Transfer { from, to, amount } => spl_token::instruction::transfer_checked(
                    &spl_token::ID,
                    &from.address,
                    &self.mint,
                    &to.address,
                    &from.owner,
                    &[],
                    *amount,
                    self.decimals,
                )
                .map_err(|e| PlanError::Encoding(e.to_string())),
            })
            .collect()
    }

    // Unsigned transaction, payer first, pinned to the plan's block reference
    pub fn to_transaction(&self) -> Result<Transaction, PlanError> {
        let instructions = self.instructions()?;
        let message = Message::new_with_blockhash(
            &instructions,
            Some(&self.payer),
            &self.recent_block_reference,
        );
        Ok(Transaction::new_unsigned(message))
    }
}

#[derive(Debug)]
pub struct PlanBuilder {
    payer: Pubkey,
    mint: Pubkey,
    decimals: u8,
    ready: Vec<Pubkey>,
    creations: Vec<PlanStep>,
    transfers: Vec<PlanStep>,
}

impl PlanBuilder {
    pub fn new(payer: Pubkey, mint: Pubkey, decimals: u8) -> Self {
        Self {
            payer,
            mint,
            decimals,
            ready: Vec::new(),
            creations: Vec::new(),
            transfers: Vec::new(),
        }
    }

    fn is_ready(&self, address: &Pubkey) -> bool {
        self.ready.contains(address)
    }

    // Register an account; a missing one gets a creation step
    pub fn ensure_account(&mut self, account: TokenAccountRef, exists: bool) -> &mut Self {
        if self.is_ready(&account.address) {
            return self;
        }
        if !exists {
            self.creations.push(PlanStep::CreateAccount(account));
        }
        self.ready.push(account.address);
        self
    }

    pub fn transfer(
        &mut self,
        from: &TokenAccountRef,
        to: &TokenAccountRef,
        amount: u64,
    ) -> Result<&mut Self, PlanError> {
        if amount == 0 {
            return Err(PlanError::ZeroTransfer);
        }
        for account in [from, to] {
            if !self.is_ready(&account.address) {
                return Err(PlanError::AccountNotReady(account.address));
            }
        }

        self.transfers.push(PlanStep::Transfer {
            from: *from,
            to: *to,
            amount,
        });
        Ok(self)
    }

    pub fn build(self, recent_block_reference: Hash) -> Result<TransactionPlan, PlanError> {
        if self.transfers.is_empty() {
            return Err(PlanError::NoTransfers);
        }

        let mut steps = self.creations;
        steps.extend(self.transfers);

        Ok(TransactionPlan {
            payer: self.payer,
            mint: self.mint,
            decimals: self.decimals,
            recent_block_reference,
            steps,
        })
    }
}
