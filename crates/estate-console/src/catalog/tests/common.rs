use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::catalog::domain::{Agent, AgentDraft, AgentId, Listing, ListingDraft, ListingId};
use crate::catalog::lifecycle::AgentPatch;
use crate::remote::store::{Envelope, ListingUpdate, RemoteStore, RemoteStoreError};

pub(super) fn cozy_apartment() -> Listing {
    Listing {
        id: ListingId("1".to_string()),
        title: "Cozy Apartment".to_string(),
        description: "Two bedrooms near the waterfront".to_string(),
        price: 2_000_000.0,
        is_active: true,
        main_image: "https://img.example/cozy.jpg".to_string(),
        additional_images: vec!["https://img.example/cozy-2.jpg".to_string()],
        categories: vec!["apartments".to_string()],
    }
}

pub(super) fn modern_villa() -> Listing {
    Listing {
        id: ListingId("2".to_string()),
        title: "Modern Villa".to_string(),
        description: "Hillside villa with a pool".to_string(),
        price: 5_000_000.0,
        is_active: false,
        main_image: "https://img.example/villa.jpg".to_string(),
        additional_images: Vec::new(),
        categories: vec!["villas".to_string()],
    }
}

pub(super) fn fixture_listings() -> Vec<Listing> {
    vec![cozy_apartment(), modern_villa()]
}

pub(super) fn agent_smith() -> Agent {
    Agent {
        id: AgentId("a1".to_string()),
        first_name: "Agent".to_string(),
        surname: "Smith".to_string(),
        email: "mr.anderson@gmail.com".to_string(),
        image: Some("https://img.example/smith.jpg".to_string()),
    }
}

pub(super) fn james_bond() -> Agent {
    Agent {
        id: AgentId("a2".to_string()),
        first_name: "James".to_string(),
        surname: "Bond".to_string(),
        email: "mr.moneypenny@gmail.com".to_string(),
        image: None,
    }
}

pub(super) fn fixture_agents() -> Vec<Agent> {
    vec![agent_smith(), james_bond()]
}

pub(super) fn valid_listing_draft() -> ListingDraft {
    ListingDraft {
        title: "Harbour Loft".to_string(),
        description: "Converted warehouse loft".to_string(),
        price: "950000".to_string(),
        main_image: "https://img.example/loft.jpg".to_string(),
        additional_images: Vec::new(),
        categories: vec!["apartments".to_string()],
    }
}

pub(super) fn valid_agent_draft() -> AgentDraft {
    AgentDraft {
        first_name: "Jane".to_string(),
        surname: "Moneypenny".to_string(),
        email: "jane@example.com".to_string(),
        image: "https://img.example/jane.jpg".to_string(),
    }
}

/// Remote store double backed by the fixture rows. `fail_mutations` makes
/// every write return a request error so tests can assert the in-memory
/// collections stay untouched.
pub(super) struct FixtureStore {
    state: Mutex<FixtureState>,
    fail_mutations: AtomicBool,
}

struct FixtureState {
    listings: Vec<Listing>,
    agents: Vec<Agent>,
    next_id: u64,
}

impl FixtureStore {
    pub(super) fn seeded() -> Self {
        Self {
            state: Mutex::new(FixtureState {
                listings: fixture_listings(),
                agents: fixture_agents(),
                next_id: 3,
            }),
            fail_mutations: AtomicBool::new(false),
        }
    }

    pub(super) fn fail_mutations(&self) {
        self.fail_mutations.store(true, Ordering::Relaxed);
    }

    pub(super) fn listing_rows(&self) -> Vec<Listing> {
        self.state.lock().expect("store mutex poisoned").listings.clone()
    }

    fn check_available(&self) -> Result<(), RemoteStoreError> {
        if self.fail_mutations.load(Ordering::Relaxed) {
            Err(RemoteStoreError::Request("connection reset".to_string()))
        } else {
            Ok(())
        }
    }
}

impl RemoteStore for FixtureStore {
    fn fetch_listings(&self) -> Result<Envelope<Vec<Listing>>, RemoteStoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(Envelope::ok("listings fetched", state.listings.clone()))
    }

    fn insert_listing(&self, listing: &Listing) -> Result<Listing, RemoteStoreError> {
        self.check_available()?;
        let mut state = self.state.lock().expect("store mutex poisoned");
        let mut stored = listing.clone();
        stored.id = ListingId(state.next_id.to_string());
        state.next_id += 1;
        state.listings.push(stored.clone());
        Ok(stored)
    }

    fn update_listing(
        &self,
        id: &ListingId,
        update: &ListingUpdate,
    ) -> Result<Listing, RemoteStoreError> {
        self.check_available()?;
        let mut state = self.state.lock().expect("store mutex poisoned");
        let listing = state
            .listings
            .iter_mut()
            .find(|listing| &listing.id == id)
            .ok_or_else(|| RemoteStoreError::Rejected(format!("no row with id {id}")))?;
        if let Some(title) = &update.title {
            listing.title = title.clone();
        }
        if let Some(description) = &update.description {
            listing.description = description.clone();
        }
        if let Some(price) = update.price {
            listing.price = price;
        }
        if let Some(active) = update.is_active {
            listing.is_active = active;
        }
        Ok(listing.clone())
    }

    fn delete_listing(&self, id: &ListingId) -> Result<(), RemoteStoreError> {
        self.check_available()?;
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.listings.retain(|listing| &listing.id != id);
        Ok(())
    }

    fn fetch_agents(&self) -> Result<Envelope<Vec<Agent>>, RemoteStoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(Envelope::ok("agents fetched", state.agents.clone()))
    }

    fn insert_agent(&self, agent: &Agent) -> Result<Agent, RemoteStoreError> {
        self.check_available()?;
        let mut state = self.state.lock().expect("store mutex poisoned");
        let mut stored = agent.clone();
        stored.id = AgentId(format!("a{}", state.next_id));
        state.next_id += 1;
        state.agents.push(stored.clone());
        Ok(stored)
    }

    fn update_agent(&self, id: &AgentId, patch: &AgentPatch) -> Result<Agent, RemoteStoreError> {
        self.check_available()?;
        let mut state = self.state.lock().expect("store mutex poisoned");
        let agent = state
            .agents
            .iter_mut()
            .find(|agent| &agent.id == id)
            .ok_or_else(|| RemoteStoreError::Rejected(format!("no row with id {id}")))?;
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
        Ok(agent.clone())
    }

    fn delete_agent(&self, id: &AgentId) -> Result<(), RemoteStoreError> {
        self.check_available()?;
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.agents.retain(|agent| &agent.id != id);
        Ok(())
    }
}
