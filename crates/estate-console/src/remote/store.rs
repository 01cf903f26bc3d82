use serde::{Deserialize, Serialize};

use crate::catalog::domain::{Agent, AgentId, Listing, ListingId};
use crate::catalog::lifecycle::{AgentPatch, ListingPatch};

/// JSON envelope every collection fetch arrives in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Partial row update for the listing table, mirroring the fields the store
/// accepts in an UPDATE.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ListingUpdate {
    pub fn set_active(active: bool) -> Self {
        Self {
            is_active: Some(active),
            ..Self::default()
        }
    }
}

impl From<&ListingPatch> for ListingUpdate {
    fn from(patch: &ListingPatch) -> Self {
        Self {
            title: patch.title.clone(),
            description: patch.description.clone(),
            price: patch.price,
            is_active: None,
        }
    }
}

/// Failure from the backend API or its auth/storage layer. Never retried;
/// surfaced to the caller as a transient failure.
#[derive(Debug, thiserror::Error)]
pub enum RemoteStoreError {
    #[error("remote store request failed: {0}")]
    Request(String),
    #[error("remote store rejected the mutation: {0}")]
    Rejected(String),
    #[error("remote store authorization failed: {0}")]
    Unauthorized(String),
}

/// CRUD surface of the backend listings/agents tables. The domain core never
/// calls this directly; the catalog service forwards confirmed intents.
pub trait RemoteStore: Send + Sync {
    fn fetch_listings(&self) -> Result<Envelope<Vec<Listing>>, RemoteStoreError>;
    /// Insert a pending listing; the returned row carries the assigned id.
    fn insert_listing(&self, listing: &Listing) -> Result<Listing, RemoteStoreError>;
    fn update_listing(
        &self,
        id: &ListingId,
        update: &ListingUpdate,
    ) -> Result<Listing, RemoteStoreError>;
    fn delete_listing(&self, id: &ListingId) -> Result<(), RemoteStoreError>;

    fn fetch_agents(&self) -> Result<Envelope<Vec<Agent>>, RemoteStoreError>;
    fn insert_agent(&self, agent: &Agent) -> Result<Agent, RemoteStoreError>;
    fn update_agent(&self, id: &AgentId, patch: &AgentPatch) -> Result<Agent, RemoteStoreError>;
    fn delete_agent(&self, id: &AgentId) -> Result<(), RemoteStoreError>;
}
