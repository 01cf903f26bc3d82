//! Interfaces to the external collaborators: the backend CRUD API, object
//! storage, and authentication. The domain core only ever sees these traits.

pub mod auth;
pub mod media;
pub mod store;

pub use auth::{AuthError, AuthProvider, UserAccount, UserProfile};
pub use media::{object_path, MediaError, MediaStore};
pub use store::{Envelope, ListingUpdate, RemoteStore, RemoteStoreError};
