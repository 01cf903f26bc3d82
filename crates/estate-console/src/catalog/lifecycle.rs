//! Legal state changes for listings and agents, expressed as intents the
//! caller forwards to the remote store before touching in-memory state.

use crate::config::Capabilities;
use crate::remote::store::RemoteStoreError;

use super::domain::{
    require_non_empty, validate_price, Agent, AgentDraft, AgentId, Listing, ListingDraft,
    ListingId, ValidationError,
};

/// Partial update for a listing's editable fields. Edits never touch the
/// active flag, the images, or the categories.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ListingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AgentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Confirmed-mutation instruction for the listing table.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingIntent {
    Insert(Listing),
    SetActive { id: ListingId, active: bool },
    UpdateFields { id: ListingId, patch: ListingPatch },
    Delete { id: ListingId },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AgentIntent {
    Insert(Agent),
    UpdateFields { id: AgentId, patch: AgentPatch },
    Delete { id: AgentId },
}

/// Failure taxonomy for catalog operations. Validation and lookup failures
/// are raised synchronously; remote failures are surfaced by the adapter
/// that forwarded the intent.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no listing with id {0}")]
    ListingNotFound(ListingId),
    #[error("no agent with id {0}")]
    AgentNotFound(AgentId),
    #[error("{0} is disabled in this deployment")]
    OperationDisabled(&'static str),
    #[error(transparent)]
    RemoteStore(#[from] RemoteStoreError),
}

/// Encodes every legal transition; storage-agnostic and synchronous.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    capabilities: Capabilities,
}

impl Lifecycle {
    pub fn new(capabilities: Capabilities) -> Self {
        Self { capabilities }
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Validate a draft into the pending row an insert intent would carry.
    pub fn create_listing(&self, draft: ListingDraft) -> Result<Listing, CatalogError> {
        if !self.capabilities.allow_create_listing {
            return Err(CatalogError::OperationDisabled("listing creation"));
        }
        Ok(Listing::from_draft(draft)?)
    }

    /// `Active -> Inactive`. Idempotent: an already-inactive listing yields
    /// `Ok(None)` and no intent, so a double-click or retry is harmless.
    pub fn delist(
        &self,
        listings: &[Listing],
        id: &ListingId,
    ) -> Result<Option<ListingIntent>, CatalogError> {
        self.set_active(listings, id, false)
    }

    /// `Inactive -> Active`, symmetric to [`Lifecycle::delist`].
    pub fn relist(
        &self,
        listings: &[Listing],
        id: &ListingId,
    ) -> Result<Option<ListingIntent>, CatalogError> {
        self.set_active(listings, id, true)
    }

    fn set_active(
        &self,
        listings: &[Listing],
        id: &ListingId,
        active: bool,
    ) -> Result<Option<ListingIntent>, CatalogError> {
        let listing = find_listing(listings, id)?;
        if listing.is_active == active {
            return Ok(None);
        }
        Ok(Some(ListingIntent::SetActive {
            id: id.clone(),
            active,
        }))
    }

    /// Updates title/description/price only; the patched values must satisfy
    /// the creation rules.
    pub fn edit_listing(
        &self,
        listings: &[Listing],
        id: &ListingId,
        patch: ListingPatch,
    ) -> Result<ListingIntent, CatalogError> {
        let listing = find_listing(listings, id)?;

        let title = patch.title.as_deref().unwrap_or(&listing.title);
        require_non_empty("title", title)?;
        let description = patch.description.as_deref().unwrap_or(&listing.description);
        require_non_empty("description", description)?;
        validate_price(patch.price.unwrap_or(listing.price))?;

        Ok(ListingIntent::UpdateFields {
            id: id.clone(),
            patch,
        })
    }

    /// Removes the listing regardless of its active flag.
    pub fn delete_listing(
        &self,
        listings: &[Listing],
        id: &ListingId,
    ) -> Result<ListingIntent, CatalogError> {
        if !self.capabilities.allow_delete_listing {
            return Err(CatalogError::OperationDisabled("listing deletion"));
        }
        find_listing(listings, id)?;
        Ok(ListingIntent::Delete { id: id.clone() })
    }

    pub fn create_agent(&self, draft: AgentDraft) -> Result<Agent, CatalogError> {
        if !self.capabilities.allow_create_agent {
            return Err(CatalogError::OperationDisabled("agent creation"));
        }
        Ok(Agent::from_draft(draft)?)
    }

    pub fn edit_agent(
        &self,
        agents: &[Agent],
        id: &AgentId,
        patch: AgentPatch,
    ) -> Result<AgentIntent, CatalogError> {
        let agent = find_agent(agents, id)?;

        require_non_empty(
            "first name",
            patch.first_name.as_deref().unwrap_or(&agent.first_name),
        )?;
        require_non_empty("surname", patch.surname.as_deref().unwrap_or(&agent.surname))?;
        require_non_empty("email", patch.email.as_deref().unwrap_or(&agent.email))?;

        Ok(AgentIntent::UpdateFields {
            id: id.clone(),
            patch,
        })
    }

    pub fn delete_agent(
        &self,
        agents: &[Agent],
        id: &AgentId,
    ) -> Result<AgentIntent, CatalogError> {
        if !self.capabilities.allow_delete_agent {
            return Err(CatalogError::OperationDisabled("agent deletion"));
        }
        find_agent(agents, id)?;
        Ok(AgentIntent::Delete { id: id.clone() })
    }
}

fn find_listing<'a>(listings: &'a [Listing], id: &ListingId) -> Result<&'a Listing, CatalogError> {
    listings
        .iter()
        .find(|listing| &listing.id == id)
        .ok_or_else(|| CatalogError::ListingNotFound(id.clone()))
}

fn find_agent<'a>(agents: &'a [Agent], id: &AgentId) -> Result<&'a Agent, CatalogError> {
    agents
        .iter()
        .find(|agent| &agent.id == id)
        .ok_or_else(|| CatalogError::AgentNotFound(id.clone()))
}

/// Apply a store-confirmed intent to the in-memory collection. For inserts
/// the intent must carry the row as returned by the store, id included.
pub fn apply_listing_intent(listings: &mut Vec<Listing>, intent: &ListingIntent) {
    match intent {
        ListingIntent::Insert(listing) => listings.push(listing.clone()),
        ListingIntent::SetActive { id, active } => {
            if let Some(listing) = listings.iter_mut().find(|listing| &listing.id == id) {
                listing.is_active = *active;
            }
        }
        ListingIntent::UpdateFields { id, patch } => {
            if let Some(listing) = listings.iter_mut().find(|listing| &listing.id == id) {
                if let Some(title) = &patch.title {
                    listing.title = title.clone();
                }
                if let Some(description) = &patch.description {
                    listing.description = description.clone();
                }
                if let Some(price) = patch.price {
                    listing.price = price;
                }
            }
        }
        ListingIntent::Delete { id } => listings.retain(|listing| &listing.id != id),
    }
}

pub fn apply_agent_intent(agents: &mut Vec<Agent>, intent: &AgentIntent) {
    match intent {
        AgentIntent::Insert(agent) => agents.push(agent.clone()),
        AgentIntent::UpdateFields { id, patch } => {
            if let Some(agent) = agents.iter_mut().find(|agent| &agent.id == id) {
                if let Some(first_name) = &patch.first_name {
                    agent.first_name = first_name.clone();
                }
                if let Some(surname) = &patch.surname {
                    agent.surname = surname.clone();
                }
                if let Some(email) = &patch.email {
                    agent.email = email.clone();
                }
                if let Some(image) = &patch.image {
                    agent.image = Some(image.clone());
                }
            }
        }
        AgentIntent::Delete { id } => agents.retain(|agent| &agent.id != id),
    }
}
