// Donation Configuration
//
// Defaults come from constants.rs; only the treasury wallet has no default.
// Hosts can also load the config from JSON (string addresses, millisecond
// durations).

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;

use crate::confirm::ConfirmationPolicy;
use crate::constants::*;
use crate::errors::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationConfig {
    pub mint: Pubkey,
    pub treasury: Pubkey,
    pub decimals: u8,
    pub fee_basis_points: u16,
    pub confirmation_timeout: Duration,
    pub poll_interval: Duration,
    // Off by default: resetting the form must not end the wallet session
    pub disconnect_on_success: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct DonationConfigFile {
    treasury: String,
    mint: Option<String>,
    decimals: Option<u8>,
    fee_basis_points: Option<u16>,
    confirmation_timeout_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
    disconnect_on_success: Option<bool>,
}

fn parse_address(field: &'static str, value: &str) -> Result<Pubkey, ConfigError> {
    Pubkey::from_str(value.trim()).map_err(|_| ConfigError::InvalidAddress {
        field,
        value: value.to_string(),
    })
}

impl DonationConfig {
    pub fn new(treasury: Pubkey) -> Self {
        Self {
            mint: DONATION_MINT,
            treasury,
            decimals: TOKEN_DECIMALS,
            fee_basis_points: FEE_BASIS_POINTS,
            confirmation_timeout: Duration::from_millis(DEFAULT_CONFIRMATION_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            disconnect_on_success: false,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let file: DonationConfigFile = serde_json::from_str(json)?;

        let mut config = Self::new(parse_address("treasury", &file.treasury)?);
        if let Some(mint) = file.mint {
            config.mint = parse_address("mint", &mint)?;
        }
        if let Some(decimals) = file.decimals {
            config.decimals = decimals;
        }
        if let Some(fee) = file.fee_basis_points {
            config.fee_basis_points = fee;
        }
        if let Some(ms) = file.confirmation_timeout_ms {
            config.confirmation_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = file.poll_interval_ms {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(disconnect) = file.disconnect_on_success {
            config.disconnect_on_success = disconnect;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_mint(mut self, mint: Pubkey, decimals: u8) -> Self {
        self.mint = mint;
        self.decimals = decimals;
        self
    }

    pub fn with_fee_basis_points(mut self, fee_basis_points: u16) -> Self {
        self.fee_basis_points = fee_basis_points;
        self
    }

    pub fn with_confirmation(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_disconnect_on_success(mut self, disconnect: bool) -> Self {
        self.disconnect_on_success = disconnect;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fee_basis_points > MAX_FEE_BASIS_POINTS {
            return Err(ConfigError::FeeTooHigh {
                got: self.fee_basis_points,
                max: MAX_FEE_BASIS_POINTS,
            });
        }
        if self.decimals > MAX_TOKEN_DECIMALS {
            return Err(ConfigError::DecimalsOutOfRange {
                got: self.decimals,
                max: MAX_TOKEN_DECIMALS,
            });
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.treasury == self.mint {
            return Err(ConfigError::TreasuryIsMint);
        }
        Ok(())
    }

    pub fn confirmation_policy(&self) -> ConfirmationPolicy {
        ConfirmationPolicy::new(self.confirmation_timeout, self.poll_interval)
    }
}
