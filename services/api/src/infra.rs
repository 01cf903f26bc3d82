use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use estate_console::catalog::{Agent, AgentId, AgentPatch, Listing, ListingId};
use estate_console::remote::{
    AuthError, AuthProvider, Envelope, ListingUpdate, MediaError, MediaStore, RemoteStore,
    RemoteStoreError, UserAccount, UserProfile,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Remote store backed by process memory; ids are assigned sequentially the
/// way the real backend assigns row ids.
#[derive(Default)]
pub(crate) struct InMemoryRemoteStore {
    state: Mutex<StoreState>,
}

#[derive(Default)]
struct StoreState {
    listings: Vec<Listing>,
    agents: Vec<Agent>,
    next_id: u64,
}

impl InMemoryRemoteStore {
    pub(crate) fn seeded(listings: Vec<Listing>, agents: Vec<Agent>) -> Self {
        Self {
            state: Mutex::new(StoreState {
                listings,
                agents,
                next_id: 100,
            }),
        }
    }
}

impl RemoteStore for InMemoryRemoteStore {
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
            .ok_or_else(|| RemoteStoreError::Rejected(format!("no listing row with id {id}")))?;
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

    fn update_agent(&self, id: &AgentId, patch: &AgentPatch) -> Result<Agent, RemoteStoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        let agent = state
            .agents
            .iter_mut()
            .find(|agent| &agent.id == id)
            .ok_or_else(|| RemoteStoreError::Rejected(format!("no agent row with id {id}")))?;
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

/// Object storage double: keeps blobs in memory and serves stable URLs under
/// a fixed base.
pub(crate) struct InMemoryMediaStore {
    base_url: String,
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl Default for InMemoryMediaStore {
    fn default() -> Self {
        Self {
            base_url: "https://media.estate-console.local".to_string(),
            objects: Mutex::new(HashMap::new()),
        }
    }
}

impl MediaStore for InMemoryMediaStore {
    fn upload(&self, path: &str, bytes: &[u8]) -> Result<String, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::Rejected("empty upload".to_string()));
        }
        let mut objects = self.objects.lock().expect("media mutex poisoned");
        objects.insert(path.to_string(), bytes.to_vec());
        Ok(self.public_url(path))
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Auth double with a single registered demo account.
pub(crate) struct InMemoryAuthProvider {
    state: Mutex<AuthState>,
}

struct AuthState {
    accounts: HashMap<String, RegisteredAccount>,
    profiles: HashMap<String, UserProfile>,
    current: Option<UserAccount>,
    next_id: u64,
}

struct RegisteredAccount {
    password: String,
    account: UserAccount,
}

impl Default for InMemoryAuthProvider {
    fn default() -> Self {
        let provider = Self {
            state: Mutex::new(AuthState {
                accounts: HashMap::new(),
                profiles: HashMap::new(),
                current: None,
                next_id: 1,
            }),
        };
        provider
            .sign_up(
                "admin@estate-console.local",
                "change-me",
                UserProfile {
                    first_name: "Demo".to_string(),
                    surname: "Admin".to_string(),
                    image: None,
                },
            )
            .expect("demo account registers");
        provider
    }
}

impl AuthProvider for InMemoryAuthProvider {
    fn current_user(&self) -> Result<Option<UserAccount>, AuthError> {
        let state = self.state.lock().expect("auth mutex poisoned");
        Ok(state.current.clone())
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<UserAccount, AuthError> {
        let mut state = self.state.lock().expect("auth mutex poisoned");
        let registered = state
            .accounts
            .get(&email.to_ascii_lowercase())
            .ok_or(AuthError::InvalidCredentials)?;
        if registered.password != password {
            return Err(AuthError::InvalidCredentials);
        }
        let account = registered.account.clone();
        state.current = Some(account.clone());
        Ok(account)
    }

    fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: UserProfile,
    ) -> Result<UserAccount, AuthError> {
        let mut state = self.state.lock().expect("auth mutex poisoned");
        let key = email.to_ascii_lowercase();
        if state.accounts.contains_key(&key) {
            return Err(AuthError::AlreadyRegistered(email.to_string()));
        }
        let account = UserAccount {
            id: format!("u{}", state.next_id),
            email: email.to_string(),
        };
        state.next_id += 1;
        state.accounts.insert(
            key,
            RegisteredAccount {
                password: password.to_string(),
                account: account.clone(),
            },
        );
        state.profiles.insert(account.id.clone(), profile);
        state.current = Some(account.clone());
        Ok(account)
    }

    fn profile(&self, user_id: &str) -> Result<Option<UserProfile>, AuthError> {
        let state = self.state.lock().expect("auth mutex poisoned");
        Ok(state.profiles.get(user_id).cloned())
    }
}

pub(crate) fn demo_listings() -> Vec<Listing> {
    vec![
        Listing {
            id: ListingId("1".to_string()),
            title: "Cozy Apartment".to_string(),
            description: "Two bedrooms near the waterfront".to_string(),
            price: 2_000_000.0,
            is_active: true,
            main_image: "https://media.estate-console.local/seed_cozy.jpg".to_string(),
            additional_images: Vec::new(),
            categories: vec!["apartments".to_string()],
        },
        Listing {
            id: ListingId("2".to_string()),
            title: "Modern Villa".to_string(),
            description: "Hillside villa with a pool".to_string(),
            price: 5_000_000.0,
            is_active: false,
            main_image: "https://media.estate-console.local/seed_villa.jpg".to_string(),
            additional_images: Vec::new(),
            categories: vec!["villas".to_string(), "spain".to_string()],
        },
    ]
}

pub(crate) fn demo_agents() -> Vec<Agent> {
    vec![
        Agent {
            id: AgentId("a1".to_string()),
            first_name: "James".to_string(),
            surname: "Lillard".to_string(),
            email: "james@lillardco.com".to_string(),
            image: Some("https://media.estate-console.local/seed_james.jpg".to_string()),
        },
        Agent {
            id: AgentId("a2".to_string()),
            first_name: "Amelia".to_string(),
            surname: "Wright".to_string(),
            email: "amelia.wright@estate-console.local".to_string(),
            image: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_assigns_sequential_ids() {
        let store = InMemoryRemoteStore::seeded(demo_listings(), demo_agents());
        let mut pending = demo_listings().remove(0);
        pending.id = ListingId::pending();
        let first = store.insert_listing(&pending).expect("insert");
        let second = store.insert_listing(&pending).expect("insert");
        assert_eq!(first.id, ListingId("100".to_string()));
        assert_eq!(second.id, ListingId("101".to_string()));
    }

    #[test]
    fn media_store_serves_stable_urls() {
        let media = InMemoryMediaStore::default();
        let url = media.upload("42_villa.jpg", b"bytes").expect("upload");
        assert_eq!(url, media.public_url("42_villa.jpg"));
        assert!(media.upload("x", b"").is_err());
    }

    #[test]
    fn sign_in_round_trips_the_demo_account() {
        let auth = InMemoryAuthProvider::default();
        let user = auth
            .sign_in("ADMIN@estate-console.local", "change-me")
            .expect("demo credentials");
        let profile = auth.profile(&user.id).expect("lookup").expect("profile");
        assert_eq!(profile.first_name, "Demo");
        assert!(auth.sign_in("admin@estate-console.local", "wrong").is_err());
    }
}
