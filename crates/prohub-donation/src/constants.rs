// Donation Policy Constants

use solana_sdk::pubkey::Pubkey;

// USDC (mainnet) is the donation token
pub const DONATION_MINT: Pubkey =
    Pubkey::from_str_const("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");
pub const TOKEN_DECIMALS: u8 = 6;
pub const MAX_TOKEN_DECIMALS: u8 = 9;

pub const FEE_BASIS_POINTS: u16 = 100; // 1%
pub const MAX_FEE_BASIS_POINTS: u16 = 1000; // 10% max
pub const BASIS_POINTS_DENOMINATOR: u64 = 10_000;

pub const DEFAULT_CONFIRMATION_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
