//! Listing/agent lifecycle and derived-statistics model: the entities, the
//! legal state transitions, the per-collection stats, and the read-only
//! table projections every page renders from.

pub mod domain;
pub mod lifecycle;
pub mod projection;
pub mod service;
pub mod stats;

#[cfg(test)]
mod tests;

pub use domain::{
    find_agent_by_email, Agent, AgentDraft, AgentId, Listing, ListingDraft, ListingId,
    ValidationError,
};
pub use lifecycle::{
    apply_agent_intent, apply_listing_intent, AgentIntent, AgentPatch, CatalogError, Lifecycle,
    ListingIntent, ListingPatch,
};
pub use projection::{project_active, project_inactive};
pub use service::CatalogService;
pub use stats::{derive_stats, DerivedStats};
