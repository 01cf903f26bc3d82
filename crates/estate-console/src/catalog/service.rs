use std::sync::Arc;

use tracing::info;

use crate::config::Capabilities;
use crate::remote::store::{ListingUpdate, RemoteStore};

use super::domain::{Agent, AgentDraft, AgentId, Listing, ListingDraft, ListingId};
use super::lifecycle::{
    apply_agent_intent, apply_listing_intent, AgentIntent, AgentPatch, CatalogError, Lifecycle,
    ListingIntent, ListingPatch,
};
use super::projection::{project_active, project_inactive};
use super::stats::{derive_stats, DerivedStats};

/// Owner of the in-memory listing and agent collections. Runs lifecycle
/// transitions, forwards the resulting intents to the remote store, and
/// applies them locally only after the store confirms, so a failed remote
/// call leaves the collections untouched.
pub struct CatalogService<S> {
    store: Arc<S>,
    lifecycle: Lifecycle,
    listings: Vec<Listing>,
    agents: Vec<Agent>,
}

impl<S> CatalogService<S>
where
    S: RemoteStore,
{
    pub fn new(store: Arc<S>, capabilities: Capabilities) -> Self {
        Self {
            store,
            lifecycle: Lifecycle::new(capabilities),
            listings: Vec::new(),
            agents: Vec::new(),
        }
    }

    /// Re-fetch both collections. On failure the previous collections stay
    /// in place.
    pub fn refresh(&mut self) -> Result<(), CatalogError> {
        let listings = self.store.fetch_listings()?;
        let agents = self.store.fetch_agents()?;
        self.listings = listings.data;
        self.agents = agents.data;
        info!(
            listings = self.listings.len(),
            agents = self.agents.len(),
            "catalog refreshed"
        );
        Ok(())
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn active_listings(&self) -> Vec<&Listing> {
        project_active(&self.listings)
    }

    pub fn inactive_listings(&self) -> Vec<&Listing> {
        project_inactive(&self.listings)
    }

    pub fn stats(&self) -> DerivedStats {
        derive_stats(&self.listings)
    }

    pub fn create_listing(&mut self, draft: ListingDraft) -> Result<Listing, CatalogError> {
        let pending = self.lifecycle.create_listing(draft)?;
        let stored = self.store.insert_listing(&pending)?;
        apply_listing_intent(&mut self.listings, &ListingIntent::Insert(stored.clone()));
        info!(id = %stored.id, "listing created");
        Ok(stored)
    }

    /// Returns `true` when the listing changed state, `false` when it was
    /// already inactive (idempotent success, no store call made).
    pub fn delist(&mut self, id: &ListingId) -> Result<bool, CatalogError> {
        match self.lifecycle.delist(&self.listings, id)? {
            Some(intent) => {
                self.commit_set_active(&intent)?;
                info!(%id, "listing delisted");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn relist(&mut self, id: &ListingId) -> Result<bool, CatalogError> {
        match self.lifecycle.relist(&self.listings, id)? {
            Some(intent) => {
                self.commit_set_active(&intent)?;
                info!(%id, "listing relisted");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn commit_set_active(&mut self, intent: &ListingIntent) -> Result<(), CatalogError> {
        if let ListingIntent::SetActive { id, active } = intent {
            self.store
                .update_listing(id, &ListingUpdate::set_active(*active))?;
            apply_listing_intent(&mut self.listings, intent);
        }
        Ok(())
    }

    pub fn edit_listing(
        &mut self,
        id: &ListingId,
        patch: ListingPatch,
    ) -> Result<Listing, CatalogError> {
        let intent = self.lifecycle.edit_listing(&self.listings, id, patch)?;
        if let ListingIntent::UpdateFields { id, patch } = &intent {
            self.store.update_listing(id, &ListingUpdate::from(patch))?;
        }
        apply_listing_intent(&mut self.listings, &intent);
        let updated = self
            .listings
            .iter()
            .find(|listing| &listing.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::ListingNotFound(id.clone()))?;
        info!(%id, "listing fields updated");
        Ok(updated)
    }

    pub fn delete_listing(&mut self, id: &ListingId) -> Result<(), CatalogError> {
        let intent = self.lifecycle.delete_listing(&self.listings, id)?;
        self.store.delete_listing(id)?;
        apply_listing_intent(&mut self.listings, &intent);
        info!(%id, "listing deleted");
        Ok(())
    }

    pub fn create_agent(&mut self, draft: AgentDraft) -> Result<Agent, CatalogError> {
        let pending = self.lifecycle.create_agent(draft)?;
        let stored = self.store.insert_agent(&pending)?;
        apply_agent_intent(&mut self.agents, &AgentIntent::Insert(stored.clone()));
        info!(id = %stored.id, "agent created");
        Ok(stored)
    }

    pub fn edit_agent(&mut self, id: &AgentId, patch: AgentPatch) -> Result<Agent, CatalogError> {
        let intent = self.lifecycle.edit_agent(&self.agents, id, patch)?;
        if let AgentIntent::UpdateFields { id, patch } = &intent {
            self.store.update_agent(id, patch)?;
        }
        apply_agent_intent(&mut self.agents, &intent);
        let updated = self
            .agents
            .iter()
            .find(|agent| &agent.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::AgentNotFound(id.clone()))?;
        info!(%id, "agent fields updated");
        Ok(updated)
    }

    pub fn delete_agent(&mut self, id: &AgentId) -> Result<(), CatalogError> {
        let intent = self.lifecycle.delete_agent(&self.agents, id)?;
        self.store.delete_agent(id)?;
        apply_agent_intent(&mut self.agents, &intent);
        info!(%id, "agent deleted");
        Ok(())
    }
}
