// Project Listing Types
//
// Shapes of the backend's project listing JSON and of the donation record
// the backend stores. The backend itself is an external collaborator reached
// through `DonationRecorder`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::errors::{DonationError, RecordError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectStatus {
    Pending,
    Declined,
    Published,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub name: String,
    pub x_handle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub uuid: String,
    pub name: String,
    #[serde(rename = "bDescription")]
    pub brief_description: String,
    pub description: String,
    #[serde(rename = "logoURI")]
    pub logo_uri: String,
    #[serde(rename = "bannerURI")]
    pub banner_uri: String,
    pub state: String,
    pub track: String,
    pub wallet_address: String,
    #[serde(rename = "twitterURL", default, skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
    #[serde(rename = "telegramURL", default, skip_serializing_if = "Option::is_none")]
    pub telegram_url: Option<String>,
    #[serde(rename = "websiteURL", default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(rename = "documentationURL", default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

impl Project {
    pub fn is_published(&self) -> bool {
        self.status == Some(ProjectStatus::Published)
    }

    pub fn donation_wallet(&self) -> Result<Pubkey, DonationError> {
        Pubkey::from_str(self.wallet_address.trim())
            .map_err(|_| DonationError::InvalidDestination(self.wallet_address.clone()))
    }
}

// Identifies the listing a donation is recorded against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRef {
    pub user_id: String,
    pub product_uuid: String,
}

impl ListingRef {
    pub fn new(user_id: impl Into<String>, product_uuid: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            product_uuid: product_uuid.into(),
        }
    }

    pub fn donate_path(&self) -> String {
        donate_path(&self.user_id, &self.product_uuid)
    }
}

pub fn donate_path(user_id: &str, product_uuid: &str) -> String {
    format!("/api/products/{}/{}/donate", user_id, product_uuid)
}

/// Body of `POST /api/products/{userId}/{productUuid}/donate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
    pub donation_amount: f64,
    pub donator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonateResponse {
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// Persists confirmed donations with the backend
pub trait DonationRecorder {
    fn record(&self, listing: &ListingRef, record: &DonationRecord) -> Result<DonateResponse, RecordError>;
}

impl<T: DonationRecorder + ?Sized> DonationRecorder for std::sync::Arc<T> {
    fn record(&self, listing: &ListingRef, record: &DonationRecord) -> Result<DonateResponse, RecordError> {
        (**self).record(listing, record)
    }
}
