//! End-to-end specifications for the catalog: fetch, derive stats, run
//! lifecycle transitions through the remote store seam, and render the
//! table projections, all through the public facade.

mod common {
    use std::sync::Mutex;

    use estate_console::catalog::{Agent, AgentId, AgentPatch, Listing, ListingId};
    use estate_console::remote::{Envelope, ListingUpdate, RemoteStore, RemoteStoreError};

    pub struct InMemoryStore {
        state: Mutex<State>,
    }

    struct State {
        listings: Vec<Listing>,
        agents: Vec<Agent>,
        next_id: u64,
    }

    impl InMemoryStore {
        pub fn seeded(listings: Vec<Listing>, agents: Vec<Agent>) -> Self {
            Self {
                state: Mutex::new(State {
                    listings,
                    agents,
                    next_id: 100,
                }),
            }
        }
    }

    impl RemoteStore for InMemoryStore {
        fn fetch_listings(&self) -> Result<Envelope<Vec<Listing>>, RemoteStoreError> {
            let state = self.state.lock().expect("store mutex poisoned");
            Ok(Envelope::ok("listings fetched", state.listings.clone()))
        }

        fn insert_listing(&self, listing: &Listing) -> Result<Listing, RemoteStoreError> {
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
            let mut state = self.state.lock().expect("store mutex poisoned");
            state.listings.retain(|listing| &listing.id != id);
            Ok(())
        }

        fn fetch_agents(&self) -> Result<Envelope<Vec<Agent>>, RemoteStoreError> {
            let state = self.state.lock().expect("store mutex poisoned");
            Ok(Envelope::ok("agents fetched", state.agents.clone()))
        }

        fn insert_agent(&self, agent: &Agent) -> Result<Agent, RemoteStoreError> {
            let mut state = self.state.lock().expect("store mutex poisoned");
            let mut stored = agent.clone();
            stored.id = AgentId(format!("a{}", state.next_id));
            state.next_id += 1;
            state.agents.push(stored.clone());
            Ok(stored)
        }

        fn update_agent(
            &self,
            id: &AgentId,
            patch: &AgentPatch,
        ) -> Result<Agent, RemoteStoreError> {
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
            let mut state = self.state.lock().expect("store mutex poisoned");
            state.agents.retain(|agent| &agent.id != id);
            Ok(())
        }
    }

    pub fn seed_listings() -> Vec<Listing> {
        vec![
            Listing {
                id: ListingId("1".to_string()),
                title: "Cozy Apartment".to_string(),
                description: "Two bedrooms near the waterfront".to_string(),
                price: 2_000_000.0,
                is_active: true,
                main_image: "https://img.example/cozy.jpg".to_string(),
                additional_images: Vec::new(),
                categories: vec!["apartments".to_string()],
            },
            Listing {
                id: ListingId("2".to_string()),
                title: "Modern Villa".to_string(),
                description: "Hillside villa with a pool".to_string(),
                price: 5_000_000.0,
                is_active: false,
                main_image: "https://img.example/villa.jpg".to_string(),
                additional_images: Vec::new(),
                categories: vec!["villas".to_string()],
            },
        ]
    }

    pub fn seed_agents() -> Vec<Agent> {
        vec![
            Agent {
                id: AgentId("a1".to_string()),
                first_name: "Agent".to_string(),
                surname: "Smith".to_string(),
                email: "mr.anderson@gmail.com".to_string(),
                image: Some("https://img.example/smith.jpg".to_string()),
            },
            Agent {
                id: AgentId("a2".to_string()),
                first_name: "James".to_string(),
                surname: "Bond".to_string(),
                email: "mr.moneypenny@gmail.com".to_string(),
                image: None,
            },
        ]
    }
}

use std::sync::Arc;

use common::{seed_agents, seed_listings, InMemoryStore};
use estate_console::catalog::{
    find_agent_by_email, CatalogService, ListingDraft, ListingId, ListingPatch,
};
use estate_console::chat::ChatSession;
use estate_console::config::Capabilities;

fn console() -> CatalogService<InMemoryStore> {
    let store = Arc::new(InMemoryStore::seeded(seed_listings(), seed_agents()));
    let mut service = CatalogService::new(store, Capabilities::permissive());
    service.refresh().expect("seeded store fetches");
    service
}

#[test]
fn dashboard_cycle_fetches_derives_and_projects() {
    let service = console();

    let stats = service.stats();
    assert_eq!(stats.total_count, 2);
    assert_eq!(stats.active_value_sum, 2_000_000.0);
    assert_eq!(stats.inactive_value_sum, 5_000_000.0);

    let active: Vec<_> = service
        .active_listings()
        .into_iter()
        .map(|listing| listing.title.clone())
        .collect();
    assert_eq!(active, vec!["Cozy Apartment".to_string()]);
}

#[test]
fn delist_moves_value_between_the_tables() {
    let mut service = console();
    service
        .delist(&ListingId("1".to_string()))
        .expect("delist succeeds");

    let stats = service.stats();
    assert_eq!(stats.active_count, 0);
    assert_eq!(stats.inactive_count, 2);
    assert_eq!(stats.inactive_value_sum, 7_000_000.0);
    assert_eq!(service.inactive_listings().len(), 2);
}

#[test]
fn full_listing_lifecycle_create_edit_delist_delete() {
    let mut service = console();

    let created = service
        .create_listing(ListingDraft {
            title: "Harbour Loft".to_string(),
            description: "Converted warehouse loft".to_string(),
            price: "950000".to_string(),
            main_image: "https://img.example/loft.jpg".to_string(),
            additional_images: Vec::new(),
            categories: vec!["apartments".to_string()],
        })
        .expect("valid draft");
    assert!(created.is_active);
    assert_eq!(service.stats().total_count, 3);

    service
        .edit_listing(
            &created.id,
            ListingPatch {
                title: None,
                description: None,
                price: Some(975_000.0),
            },
        )
        .expect("valid patch");
    assert_eq!(service.stats().active_value_sum, 2_975_000.0);

    service.delist(&created.id).expect("delist succeeds");
    service.delete_listing(&created.id).expect("delete allowed");
    assert_eq!(service.stats().total_count, 2);
}

#[test]
fn chat_partner_resolves_against_the_fetched_agents() {
    let service = console();
    let session = ChatSession::scripted("Ada", "ada@example.com", "MR.ANDERSON@GMAIL.COM");
    let partner = session.partner(service.agents()).expect("match");
    assert_eq!(partner.surname, "Smith");
    assert_eq!(
        find_agent_by_email(service.agents(), "mr.moneypenny@gmail.com")
            .expect("second agent")
            .first_name,
        "James"
    );
}
