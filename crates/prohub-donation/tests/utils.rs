// Test utilities for the donation client
//
// Two kinds of collaborators:
// - in-memory mocks (MockWallet / MockChain) for deterministic failure paths
// - LiteSVM-backed adapters (SvmWallet / SvmChain) running the real SPL
//   token and associated token account programs in-process

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::time::Duration;

use litesvm::LiteSVM;
use litesvm_token::{
    get_spl_account, spl_token::state::Account as TokenAccount, CreateAssociatedTokenAccount,
    CreateMint, MintTo,
};
use prohub_donation::{
    ChainError, ChainQuery, DonateResponse, DonationConfig, DonationRecord, DonationRecorder,
    ListingRef, Notice, Notifier, RecordError, TokenAccountRef, TransactionPlan, WalletError,
    WalletProvider,
};
use solana_sdk::{
    hash::Hash,
    native_token::LAMPORTS_PER_SOL,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};

// Token decimals (USDC)
pub const DECIMALS: u8 = 6;

// Test amounts (with 6 decimals)
pub const FIFTY_TOKENS: u64 = 50_000_000;
pub const TEN_TOKENS: u64 = 10_000_000;

pub fn test_config(treasury: Pubkey) -> DonationConfig {
    DonationConfig::new(treasury).with_confirmation(Duration::from_millis(200), Duration::from_millis(1))
}

// ======================== MOCK WALLET ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendBehavior {
    Sign,
    NoSignature,
    Reject,
}

pub struct MockWallet {
    address: Mutex<Option<Pubkey>>,
    behavior: SendBehavior,
    sent: Mutex<Vec<TransactionPlan>>,
    disconnects: AtomicUsize,
}

impl MockWallet {
    pub fn connected(address: Pubkey) -> Self {
        Self {
            address: Mutex::new(Some(address)),
            behavior: SendBehavior::Sign,
            sent: Mutex::new(Vec::new()),
            disconnects: AtomicUsize::new(0),
        }
    }

    pub fn disconnected() -> Self {
        let wallet = Self::connected(Pubkey::new_unique());
        *wallet.address.lock().unwrap() = None;
        wallet
    }

    pub fn behavior(mut self, behavior: SendBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn sent(&self) -> Vec<TransactionPlan> {
        self.sent.lock().unwrap().clone()
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

impl WalletProvider for MockWallet {
    fn connected_address(&self) -> Option<Pubkey> {
        *self.address.lock().unwrap()
    }

    fn is_connected(&self) -> bool {
        self.address.lock().unwrap().is_some()
    }

    fn send_transaction(&self, plan: &TransactionPlan) -> Result<Option<Signature>, WalletError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(plan.clone());
        match self.behavior {
            SendBehavior::Sign => Ok(Some(Signature::from([sent.len() as u8; 64]))),
            SendBehavior::NoSignature => Ok(None),
            SendBehavior::Reject => Err(WalletError::Rejected("user rejected the request".to_string())),
        }
    }

    fn disconnect(&self) -> Result<(), WalletError> {
        *self.address.lock().unwrap() = None;
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ======================== MOCK CHAIN ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmBehavior {
    Confirmed,
    ConfirmedAfter(usize),
    Never,
    Error,
}

// Blocks the first balance lookup until released
pub struct Gate {
    entered: Sender<()>,
    release: Receiver<()>,
}

pub struct GateHandle {
    pub entered: Receiver<()>,
    pub release: Sender<()>,
}

pub fn gate() -> (Gate, GateHandle) {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    (
        Gate {
            entered: entered_tx,
            release: release_rx,
        },
        GateHandle {
            entered: entered_rx,
            release: release_tx,
        },
    )
}

pub struct MockChain {
    mint: Pubkey,
    balances: HashMap<Pubkey, u64>,
    existing: HashSet<Pubkey>,
    confirm: ConfirmBehavior,
    block_reference: Hash,
    gate: Mutex<Option<Gate>>,
    fail_exists: bool,
    fail_block_reference: bool,
    balance_calls: AtomicUsize,
    exists_calls: AtomicUsize,
    block_calls: AtomicUsize,
    confirm_calls: AtomicUsize,
}

impl MockChain {
    pub fn new(mint: Pubkey) -> Self {
        Self {
            mint,
            balances: HashMap::new(),
            existing: HashSet::new(),
            confirm: ConfirmBehavior::Confirmed,
            block_reference: Hash::new_from_array([42u8; 32]),
            gate: Mutex::new(None),
            fail_exists: false,
            fail_block_reference: false,
            balance_calls: AtomicUsize::new(0),
            exists_calls: AtomicUsize::new(0),
            block_calls: AtomicUsize::new(0),
            confirm_calls: AtomicUsize::new(0),
        }
    }

    // Owner gets an existing token account holding `amount`
    pub fn with_balance(mut self, owner: Pubkey, amount: u64) -> Self {
        let account = TokenAccountRef::associated(owner, self.mint);
        self.balances.insert(account.address, amount);
        self.existing.insert(account.address);
        self
    }

    pub fn with_account(mut self, owner: Pubkey) -> Self {
        self.existing.insert(TokenAccountRef::associated(owner, self.mint).address);
        self
    }

    pub fn confirm(mut self, behavior: ConfirmBehavior) -> Self {
        self.confirm = behavior;
        self
    }

    pub fn gated(self, gate: Gate) -> Self {
        *self.gate.lock().unwrap() = Some(gate);
        self
    }

    // Existence lookups fail with an RPC error
    pub fn fail_exists(mut self) -> Self {
        self.fail_exists = true;
        self
    }

    pub fn fail_block_reference(mut self) -> Self {
        self.fail_block_reference = true;
        self
    }

    pub fn block_reference(&self) -> Hash {
        self.block_reference
    }

    pub fn network_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
            + self.exists_calls.load(Ordering::SeqCst)
            + self.block_calls.load(Ordering::SeqCst)
            + self.confirm_calls.load(Ordering::SeqCst)
    }

    pub fn confirm_calls(&self) -> usize {
        self.confirm_calls.load(Ordering::SeqCst)
    }
}

impl ChainQuery for MockChain {
    fn token_account_balance(&self, account: &TokenAccountRef) -> Result<u64, ChainError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.entered.send(()).unwrap();
            gate.release.recv().unwrap();
        }

        self.balances
            .get(&account.address)
            .copied()
            .ok_or(ChainError::AccountNotFound(account.address))
    }

    fn account_exists(&self, account: &TokenAccountRef) -> Result<bool, ChainError> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_exists {
            return Err(ChainError::Rpc("503 service unavailable".to_string()));
        }
        Ok(self.existing.contains(&account.address))
    }

    fn latest_block_reference(&self) -> Result<Hash, ChainError> {
        self.block_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_block_reference {
            return Err(ChainError::Rpc("blockhash unavailable".to_string()));
        }
        Ok(self.block_reference)
    }

    fn confirm_transaction(&self, _signature: &Signature, block_reference: &Hash) -> Result<bool, ChainError> {
        let attempt = self.confirm_calls.fetch_add(1, Ordering::SeqCst) + 1;
        assert_eq!(*block_reference, self.block_reference, "confirmed against a different block reference");

        match self.confirm {
            ConfirmBehavior::Confirmed => Ok(true),
            ConfirmBehavior::ConfirmedAfter(n) => Ok(attempt >= n),
            ConfirmBehavior::Never => Ok(false),
            ConfirmBehavior::Error => Err(ChainError::Rpc("block height exceeded".to_string())),
        }
    }
}

// ======================== NOTIFIER / RECORDER ========================

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[derive(Default)]
pub struct MockRecorder {
    fail: bool,
    calls: Mutex<Vec<(ListingRef, DonationRecord)>>,
}

impl MockRecorder {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(ListingRef, DonationRecord)> {
        self.calls.lock().unwrap().clone()
    }
}

impl DonationRecorder for MockRecorder {
    fn record(&self, listing: &ListingRef, record: &DonationRecord) -> Result<DonateResponse, RecordError> {
        self.calls.lock().unwrap().push((listing.clone(), record.clone()));
        if self.fail {
            return Err(RecordError::Transport("connection refused".to_string()));
        }
        Ok(DonateResponse {
            status: true,
            message: None,
        })
    }
}

// ======================== LITESVM ADAPTERS ========================

pub struct SvmCluster {
    svm: RefCell<LiteSVM>,
    landed: RefCell<HashSet<Signature>>,
}

pub struct SvmChain(pub Rc<SvmCluster>);

impl ChainQuery for SvmChain {
    fn token_account_balance(&self, account: &TokenAccountRef) -> Result<u64, ChainError> {
        let svm = self.0.svm.borrow();
        let token_account: TokenAccount = get_spl_account(&*svm, &account.address)
            .map_err(|_| ChainError::AccountNotFound(account.address))?;
        Ok(token_account.amount)
    }

    fn account_exists(&self, account: &TokenAccountRef) -> Result<bool, ChainError> {
        Ok(self.0.svm.borrow().get_account(&account.address).is_some())
    }

    fn latest_block_reference(&self) -> Result<Hash, ChainError> {
        Ok(self.0.svm.borrow().latest_blockhash())
    }

    fn confirm_transaction(&self, signature: &Signature, _block_reference: &Hash) -> Result<bool, ChainError> {
        Ok(self.0.landed.borrow().contains(signature))
    }
}

pub struct SvmWallet {
    cluster: Rc<SvmCluster>,
    keypair: Keypair,
    connected: Cell<bool>,
    sent: RefCell<Vec<TransactionPlan>>,
}

impl SvmWallet {
    // Plans handed to the wallet, landed or not
    pub fn sent(&self) -> Vec<TransactionPlan> {
        self.sent.borrow().clone()
    }
}

impl WalletProvider for SvmWallet {
    fn connected_address(&self) -> Option<Pubkey> {
        self.connected.get().then(|| self.keypair.pubkey())
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn send_transaction(&self, plan: &TransactionPlan) -> Result<Option<Signature>, WalletError> {
        if !self.connected.get() {
            return Err(WalletError::NotConnected);
        }
        self.sent.borrow_mut().push(plan.clone());

        let mut tx = plan
            .to_transaction()
            .map_err(|e| WalletError::Rejected(e.to_string()))?;
        tx.try_sign(&[&self.keypair], plan.recent_block_reference())
            .map_err(|e| WalletError::Rejected(e.to_string()))?;
        let signature = tx.signatures[0];

        self.cluster
            .svm
            .borrow_mut()
            .send_transaction(tx)
            .map_err(|e| WalletError::Rejected(format!("{:?}", e.err)))?;
        self.cluster.landed.borrow_mut().insert(signature);

        Ok(Some(signature))
    }

    fn disconnect(&self) -> Result<(), WalletError> {
        self.connected.set(false);
        Ok(())
    }
}

// ======================== SVM FIXTURE ========================

pub struct DonationFixture {
    pub cluster: Rc<SvmCluster>,
    pub mint: Pubkey,
    pub mint_authority: Keypair,
    pub sender: Pubkey,
    pub treasury: Pubkey,
    pub project: Pubkey,
}

// Create a new keypair and fund it with SOL via airdrop
pub fn create_funded_account(svm: &mut LiteSVM, lamports: u64) -> Keypair {
    let keypair = Keypair::new();
    svm.airdrop(&keypair.pubkey(), lamports)
        .expect("Airdrop should succeed");
    keypair
}

// Sender token account: None = never created, Some(n) = created holding n
pub fn setup_donation(sender_tokens: Option<u64>) -> (DonationFixture, SvmWallet) {
    let mut svm = LiteSVM::new();
    let mint_authority = create_funded_account(&mut svm, 10 * LAMPORTS_PER_SOL);
    let sender = create_funded_account(&mut svm, 10 * LAMPORTS_PER_SOL);

    let mint = CreateMint::new(&mut svm, &mint_authority)
        .authority(&mint_authority.pubkey())
        .decimals(DECIMALS)
        .send()
        .expect("Failed to create mint");

    if let Some(amount) = sender_tokens {
        let sender_ata = CreateAssociatedTokenAccount::new(&mut svm, &sender, &mint)
            .owner(&sender.pubkey())
            .send()
            .expect("Failed to create sender ATA");
        if amount > 0 {
            MintTo::new(&mut svm, &mint_authority, &mint, &sender_ata, amount)
                .owner(&mint_authority)
                .send()
                .expect("Failed to mint to sender");
        }
    }

    let cluster = Rc::new(SvmCluster {
        svm: RefCell::new(svm),
        landed: RefCell::new(HashSet::new()),
    });

    let fixture = DonationFixture {
        cluster: cluster.clone(),
        mint,
        mint_authority,
        sender: sender.pubkey(),
        treasury: Pubkey::new_unique(),
        project: Pubkey::new_unique(),
    };
    let wallet = SvmWallet {
        cluster,
        keypair: sender,
        connected: Cell::new(true),
        sent: RefCell::new(Vec::new()),
    };

    (fixture, wallet)
}

impl DonationFixture {
    pub fn chain(&self) -> SvmChain {
        SvmChain(self.cluster.clone())
    }

    pub fn config(&self) -> DonationConfig {
        test_config(self.treasury).with_mint(self.mint, DECIMALS)
    }

    // Pre-create an owner's token account, paid by the mint authority
    pub fn create_token_account(&self, owner: &Pubkey) -> Pubkey {
        let mut svm = self.cluster.svm.borrow_mut();
        CreateAssociatedTokenAccount::new(&mut *svm, &self.mint_authority, &self.mint)
            .owner(owner)
            .send()
            .expect("Failed to create ATA")
    }

    // None when the owner has no token account
    pub fn token_balance(&self, owner: &Pubkey) -> Option<u64> {
        let address = TokenAccountRef::associated(*owner, self.mint).address;
        let svm = self.cluster.svm.borrow();
        get_spl_account::<TokenAccount>(&*svm, &address)
            .ok()
            .map(|account| account.amount)
    }
}
