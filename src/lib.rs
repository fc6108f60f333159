//! UDATA facilities registry.
//!
//! The [`client`] module is the session gateway used by the admin console:
//! a credential slot, a bearer-token transport, the typed registry API and
//! the session state machine. The remaining modules make up the in-memory
//! registry service that speaks the same REST contract.

pub mod access;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;

pub mod client {
    pub mod error;
    pub mod login;
    pub mod resources;
    pub mod session;
    pub mod store;
    pub(crate) mod transport;

    pub use error::{ClientError, Result};
    pub use login::LoginResponse;
    pub use resources::RegistryClient;
    pub use session::{Session, SessionPhase, SessionState};
    pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore, TOKEN_KEY};
}

pub mod crypto {
    pub mod token;
}

pub mod models {
    pub mod building;
    pub mod campus;
    pub mod room;
    pub mod session;
    pub mod user;
}

pub mod repositories {
    pub mod assets;
    pub mod user;
}

pub mod services {
    pub mod assets;
    pub mod auth;
}

pub mod handlers {
    pub mod auth;
    pub mod buildings;
    pub mod campuses;
    pub mod rooms;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod assets;
    pub mod auth;
}
