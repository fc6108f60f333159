use reqwest::Method;
use serde::Serialize;

use super::error::Result;
use super::login::LoginResponse;
use super::transport::Transport;
use crate::models::{
    building::{Building, BuildingInput},
    campus::{Campus, CampusInput},
    room::{Room, RoomInput},
    user::{User, UserInput},
};

/// Typed access to the registry API, grouped by resource.
///
/// Only reachable through [`Session::request`](super::Session::request), so
/// every rejected token is observed by the session.
pub struct RegistryClient {
    transport: Transport,
}

impl RegistryClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi {
            transport: &self.transport,
        }
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi {
            transport: &self.transport,
        }
    }

    pub fn campuses(&self) -> CampusesApi<'_> {
        CampusesApi {
            transport: &self.transport,
        }
    }

    pub fn buildings(&self) -> BuildingsApi<'_> {
        BuildingsApi {
            transport: &self.transport,
        }
    }

    pub fn rooms(&self) -> RoomsApi<'_> {
        RoomsApi {
            transport: &self.transport,
        }
    }
}

const NO_BODY: Option<&()> = None;

async fn remove(transport: &Transport, path: &str) -> Result<()> {
    transport.send(Method::DELETE, path, NO_BODY).await?;
    Ok(())
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// `/auth/login` and `/auth/me`.
#[derive(Clone, Copy)]
pub struct AuthApi<'a> {
    transport: &'a Transport,
}

impl AuthApi<'_> {
    /// Exchanges credentials for a token. Never sends the stored token.
    pub async fn login(self, username: &str, password: &str) -> Result<LoginResponse> {
        let body = Credentials { username, password };
        let bytes = self
            .transport
            .send_anonymous(Method::POST, "/auth/login", Some(&body))
            .await?;
        Ok(LoginResponse::from_body(&bytes))
    }

    /// Fetches the profile of the token's owner.
    pub async fn me(self) -> Result<User> {
        self.transport.json(Method::GET, "/auth/me", NO_BODY).await
    }
}

/// User account administration.
#[derive(Clone, Copy)]
pub struct UsersApi<'a> {
    transport: &'a Transport,
}

impl UsersApi<'_> {
    pub async fn list(self) -> Result<Vec<User>> {
        self.transport.json(Method::GET, "/auth/users", NO_BODY).await
    }

    pub async fn create(self, input: &UserInput) -> Result<User> {
        self.transport
            .json(Method::POST, "/auth/register", Some(input))
            .await
    }

    pub async fn update(self, id: &str, input: &UserInput) -> Result<User> {
        self.transport
            .json(Method::PUT, &format!("/auth/user/{}", id), Some(input))
            .await
    }

    pub async fn delete(self, id: &str) -> Result<()> {
        remove(self.transport, &format!("/users/{}", id)).await
    }
}

#[derive(Clone, Copy)]
pub struct CampusesApi<'a> {
    transport: &'a Transport,
}

impl CampusesApi<'_> {
    pub async fn list(self) -> Result<Vec<Campus>> {
        self.transport.json(Method::GET, "/campuses", NO_BODY).await
    }

    pub async fn create(self, input: &CampusInput) -> Result<Campus> {
        self.transport
            .json(Method::POST, "/campuses", Some(input))
            .await
    }

    pub async fn update(self, id: &str, input: &CampusInput) -> Result<Campus> {
        self.transport
            .json(Method::PUT, &format!("/campuses/{}", id), Some(input))
            .await
    }

    /// Deletes a campus together with its buildings and their rooms.
    pub async fn delete(self, id: &str) -> Result<()> {
        remove(self.transport, &format!("/campuses/{}", id)).await
    }
}

#[derive(Clone, Copy)]
pub struct BuildingsApi<'a> {
    transport: &'a Transport,
}

impl BuildingsApi<'_> {
    pub async fn list_by_campus(self, campus_id: &str) -> Result<Vec<Building>> {
        self.transport
            .json(Method::GET, &format!("/buildings/campus/{}", campus_id), NO_BODY)
            .await
    }

    pub async fn create(self, input: &BuildingInput) -> Result<Building> {
        self.transport
            .json(Method::POST, "/buildings", Some(input))
            .await
    }

    pub async fn update(self, id: &str, input: &BuildingInput) -> Result<Building> {
        self.transport
            .json(Method::PUT, &format!("/buildings/{}", id), Some(input))
            .await
    }

    /// Deletes a building together with its rooms.
    pub async fn delete(self, id: &str) -> Result<()> {
        remove(self.transport, &format!("/buildings/{}", id)).await
    }
}

#[derive(Clone, Copy)]
pub struct RoomsApi<'a> {
    transport: &'a Transport,
}

impl RoomsApi<'_> {
    pub async fn list_by_building(self, building_id: &str) -> Result<Vec<Room>> {
        self.transport
            .json(Method::GET, &format!("/rooms/building/{}", building_id), NO_BODY)
            .await
    }

    pub async fn create(self, input: &RoomInput) -> Result<Room> {
        self.transport.json(Method::POST, "/rooms", Some(input)).await
    }

    pub async fn update(self, id: &str, input: &RoomInput) -> Result<Room> {
        self.transport
            .json(Method::PUT, &format!("/rooms/{}", id), Some(input))
            .await
    }

    pub async fn delete(self, id: &str) -> Result<()> {
        remove(self.transport, &format!("/rooms/{}", id)).await
    }
}
