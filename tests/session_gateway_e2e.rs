use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use once_cell::sync::Lazy;
use tokio::sync::Notify;
use serde_json::{json, Value};
use zeroize::Zeroizing;

use udata::{
    access::{Action, Resource, RouteAccess},
    client::{ClientError, CredentialStore, MemoryCredentialStore, Session, SessionPhase},
    config::Config,
    routes,
    state::AppState,
};

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with_test_writer()
        .try_init();
});

/// Records what a stub backend saw.
#[derive(Clone, Default)]
struct Stub {
    calls: Arc<AtomicUsize>,
    login_calls: Arc<AtomicUsize>,
    gate: Arc<Notify>,
    seen: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl Stub {
    fn record(&self, path: &str, headers: &HeaderMap) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.seen.lock().unwrap().push((path.to_string(), auth));
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn auth_for(&self, path: &str) -> Vec<Option<String>> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, auth)| auth.clone())
            .collect()
    }
}

fn admin() -> Value {
    json!({
        "id": "1",
        "full_name": "Ada Admin",
        "username": "admin",
        "email": "admin@udata.edu",
        "status": "ACTIVE",
        "role": "ADMIN"
    })
}

async fn profile_ok(State(stub): State<Stub>, headers: HeaderMap) -> Json<Value> {
    stub.record("/auth/me", &headers);
    Json(admin())
}

async fn profile_unauthorized(State(stub): State<Stub>, headers: HeaderMap) -> StatusCode {
    stub.record("/auth/me", &headers);
    StatusCode::UNAUTHORIZED
}

async fn profile_broken(State(stub): State<Stub>, headers: HeaderMap) -> (StatusCode, &'static str) {
    stub.record("/auth/me", &headers);
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn login_abc(State(stub): State<Stub>, headers: HeaderMap) -> Json<Value> {
    stub.record("/auth/login", &headers);
    Json(json!({ "access_token": "abc" }))
}

async fn login_empty(State(stub): State<Stub>, headers: HeaderMap) -> Json<Value> {
    stub.record("/auth/login", &headers);
    Json(json!({}))
}

/// Issues `abc` once, then answers with an empty object.
async fn login_once(State(stub): State<Stub>, headers: HeaderMap) -> Json<Value> {
    stub.record("/auth/login", &headers);
    if stub.login_calls.fetch_add(1, Ordering::SeqCst) == 0 {
        Json(json!({ "access_token": "abc" }))
    } else {
        Json(json!({}))
    }
}

/// Holds the login response until the test opens the gate.
async fn login_gated(State(stub): State<Stub>, headers: HeaderMap) -> Json<Value> {
    stub.record("/auth/login", &headers);
    stub.gate.notified().await;
    Json(json!({ "access_token": "abc" }))
}

async fn login_rejected(State(stub): State<Stub>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    stub.record("/auth/login", &headers);
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Invalid username or password" })),
    )
}

async fn campuses_ok(State(stub): State<Stub>, headers: HeaderMap) -> Json<Value> {
    stub.record("/campuses", &headers);
    Json(json!([{ "id": "c1", "code": "MAIN", "name": "Main Campus", "address": "", "status": "ACTIVE" }]))
}

async fn campuses_unauthorized(State(stub): State<Stub>, headers: HeaderMap) -> StatusCode {
    stub.record("/campuses", &headers);
    StatusCode::UNAUTHORIZED
}

async fn campus_missing(State(stub): State<Stub>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    stub.record("/campuses/{id}", &headers);
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

async fn reject_all(State(stub): State<Stub>, headers: HeaderMap) -> StatusCode {
    stub.record("*", &headers);
    StatusCode::UNAUTHORIZED
}

async fn serve(router: Router) -> String {
    Lazy::force(&TRACING);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn serve_registry() -> String {
    let config = Config {
        api_base_url: "http://127.0.0.1:0".to_string(),
        data_dir: PathBuf::from(".udata-test"),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        session_duration_days: 7,
        seed_password: Zeroizing::new("password".to_string()),
    };
    let state = AppState::new(&config).await.unwrap();
    serve(routes::router(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_restore_with_empty_store_makes_no_calls() {
        let stub = Stub::default();
        let base = serve(Router::new().route("/auth/me", get(profile_ok)).with_state(stub.clone())).await;
        let session = Session::new(base, Arc::new(MemoryCredentialStore::new())).unwrap();

        let state = session.restore().await;

        assert!(!state.is_authenticated());
        assert!(!state.is_loading());
        assert!(state.user.is_none());
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_restore_with_valid_token() {
        let stub = Stub::default();
        let base = serve(Router::new().route("/auth/me", get(profile_ok)).with_state(stub.clone())).await;
        let session = Session::new(base, Arc::new(MemoryCredentialStore::with_token("tok-1"))).unwrap();
        assert!(session.state().is_loading());

        let state = session.restore().await;

        assert!(state.is_authenticated());
        assert_eq!(state.user.as_ref().unwrap().id, "1");
        assert_eq!(state.token.as_deref(), Some("tok-1"));
        assert_eq!(stub.auth_for("/auth/me"), vec![Some("Bearer tok-1".to_string())]);
        assert_eq!(session.route_access(Some((Resource::UserAccount, Action::View))), RouteAccess::Granted);
    }

    #[tokio::test]
    async fn test_restore_with_rejected_token_clears_store() {
        let stub = Stub::default();
        let base = serve(
            Router::new()
                .route("/auth/me", get(profile_unauthorized))
                .with_state(stub.clone()),
        )
        .await;
        let store = Arc::new(MemoryCredentialStore::with_token("tok-1"));
        let session = Session::new(base, store.clone()).unwrap();

        let state = session.restore().await;

        assert_eq!(state.phase, SessionPhase::Unauthenticated);
        assert_eq!(store.get(), None);
        assert_eq!(session.route_access(None), RouteAccess::RedirectToLogin);
    }

    #[tokio::test]
    async fn test_login_persists_token_before_profile_fetch() {
        let stub = Stub::default();
        let base = serve(
            Router::new()
                .route("/auth/login", post(login_abc))
                .route("/auth/me", get(profile_ok))
                .with_state(stub.clone()),
        )
        .await;
        let store = Arc::new(MemoryCredentialStore::new());
        let session = Session::new(base, store.clone()).unwrap();
        let mut updates = session.subscribe();

        let user = session.login("admin", "password").await.unwrap();

        assert_eq!(user.username, "admin");
        assert_eq!(store.get().as_deref(), Some("abc"));
        assert!(session.state().is_authenticated());
        assert_eq!(stub.auth_for("/auth/login"), vec![None]);
        assert_eq!(stub.auth_for("/auth/me"), vec![Some("Bearer abc".to_string())]);

        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().phase, SessionPhase::Authenticated);
    }

    #[tokio::test]
    async fn test_login_is_loading_while_in_flight() {
        let stub = Stub::default();
        let base = serve(
            Router::new()
                .route("/auth/login", post(login_gated))
                .route("/auth/me", get(profile_ok))
                .with_state(stub.clone()),
        )
        .await;
        let session = Arc::new(Session::new(base, Arc::new(MemoryCredentialStore::new())).unwrap());
        let mut updates = session.subscribe();

        let pending = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.login("admin", "password").await })
        };

        // Step 1: The login request is held by the server
        let in_flight = updates
            .wait_for(|state| state.phase == SessionPhase::LoggingIn)
            .await
            .unwrap()
            .clone();
        assert!(in_flight.is_loading());
        assert!(!in_flight.is_authenticated());
        assert_eq!(session.route_access(None), RouteAccess::Pending);
        assert_eq!(
            session.route_access(Some((Resource::Campus, Action::Delete))),
            RouteAccess::Pending
        );

        // Step 2: Release it and let the profile fetch finish
        stub.gate.notify_one();
        let user = pending.await.unwrap().unwrap();
        assert_eq!(user.id, "1");

        let settled = updates.borrow_and_update().clone();
        assert_eq!(settled.phase, SessionPhase::Authenticated);
        assert!(!settled.is_loading());
        assert_eq!(session.route_access(None), RouteAccess::Granted);
    }

    #[tokio::test]
    async fn test_login_never_sends_the_stored_token() {
        let stub = Stub::default();
        let base = serve(
            Router::new()
                .route("/auth/login", post(login_abc))
                .route("/auth/me", get(profile_ok))
                .with_state(stub.clone()),
        )
        .await;
        let store = Arc::new(MemoryCredentialStore::with_token("stale"));
        let session = Session::new(base, store.clone()).unwrap();

        session.login("admin", "password").await.unwrap();

        assert_eq!(stub.auth_for("/auth/login"), vec![None]);
        assert_eq!(store.get().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_login_without_token_leaves_store_unchanged() {
        let stub = Stub::default();
        let base = serve(
            Router::new()
                .route("/auth/login", post(login_empty))
                .route("/auth/me", get(profile_ok))
                .with_state(stub.clone()),
        )
        .await;
        let store = Arc::new(MemoryCredentialStore::new());
        let session = Session::new(base, store.clone()).unwrap();

        let err = session.login("admin", "password").await.unwrap_err();

        assert!(matches!(err, ClientError::MissingToken));
        assert_eq!(store.get(), None);
        assert_eq!(session.state().phase, SessionPhase::Unauthenticated);
        assert!(stub.auth_for("/auth/me").is_empty());
    }

    #[tokio::test]
    async fn test_failed_relogin_keeps_the_existing_session() {
        let stub = Stub::default();
        let base = serve(
            Router::new()
                .route("/auth/login", post(login_once))
                .route("/auth/me", get(profile_ok))
                .with_state(stub.clone()),
        )
        .await;
        let store = Arc::new(MemoryCredentialStore::new());
        let session = Session::new(base, store.clone()).unwrap();
        session.login("admin", "password").await.unwrap();

        let err = session.login("admin", "password").await.unwrap_err();

        assert!(matches!(err, ClientError::MissingToken));
        assert_eq!(store.get().as_deref(), Some("abc"));
        assert!(session.state().is_authenticated());
    }

    #[tokio::test]
    async fn test_rejected_login_surfaces_unauthorized() {
        let stub = Stub::default();
        let base = serve(
            Router::new()
                .route("/auth/login", post(login_rejected))
                .with_state(stub.clone()),
        )
        .await;
        let store = Arc::new(MemoryCredentialStore::new());
        let session = Session::new(base, store.clone()).unwrap();

        let err = session.login("admin", "wrong").await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(session.state().phase, SessionPhase::Unauthenticated);
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn test_profile_failure_after_login_signs_out() {
        let stub = Stub::default();
        let base = serve(
            Router::new()
                .route("/auth/login", post(login_abc))
                .route("/auth/me", get(profile_broken))
                .with_state(stub.clone()),
        )
        .await;
        let store = Arc::new(MemoryCredentialStore::new());
        let session = Session::new(base, store.clone()).unwrap();

        let err = session.login("admin", "password").await.unwrap_err();

        match err {
            ClientError::RequestFailed { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.get(), None);
        assert_eq!(session.state().phase, SessionPhase::Unauthenticated);
        assert_eq!(stub.auth_for("/auth/me"), vec![Some("Bearer abc".to_string())]);
    }

    #[tokio::test]
    async fn test_unauthorized_request_signs_out() {
        let stub = Stub::default();
        let base = serve(
            Router::new()
                .route("/auth/me", get(profile_ok))
                .route("/campuses", get(campuses_unauthorized))
                .with_state(stub.clone()),
        )
        .await;
        let store = Arc::new(MemoryCredentialStore::with_token("tok-1"));
        let session = Session::new(base, store.clone()).unwrap();
        assert!(session.restore().await.is_authenticated());

        let err = session.request(|api| api.campuses().list()).await.unwrap_err();

        assert!(matches!(err, ClientError::Unauthorized));
        assert_eq!(store.get(), None);
        assert!(!session.state().is_authenticated());
        assert_eq!(session.current_user(), None);
    }

    #[tokio::test]
    async fn test_unauthorized_on_any_resource_route_signs_out() {
        let stub = Stub::default();
        let base = serve(
            Router::new()
                .route("/auth/me", get(profile_ok))
                .fallback(reject_all)
                .with_state(stub.clone()),
        )
        .await;
        let store = Arc::new(MemoryCredentialStore::new());
        let session = Session::new(base, store.clone()).unwrap();

        macro_rules! assert_signs_out {
            ($call:expr) => {{
                store.set("tok-1");
                assert!(session.restore().await.is_authenticated());

                let err = session.request($call).await.unwrap_err();

                assert!(err.is_unauthorized());
                assert_eq!(store.get(), None);
                assert_eq!(session.state().phase, SessionPhase::Unauthenticated);
            }};
        }

        let user = udata::models::user::UserInput::default();
        let campus = udata::models::campus::CampusInput::default();
        let building = udata::models::building::BuildingInput::default();
        let room = udata::models::room::RoomInput::default();

        assert_signs_out!(|api| api.users().list());
        assert_signs_out!(|api| api.users().create(&user));
        assert_signs_out!(|api| api.users().update("1", &user));
        assert_signs_out!(|api| api.users().delete("1"));
        assert_signs_out!(|api| api.campuses().list());
        assert_signs_out!(|api| api.campuses().create(&campus));
        assert_signs_out!(|api| api.campuses().update("c1", &campus));
        assert_signs_out!(|api| api.campuses().delete("c1"));
        assert_signs_out!(|api| api.buildings().list_by_campus("c1"));
        assert_signs_out!(|api| api.buildings().create(&building));
        assert_signs_out!(|api| api.buildings().update("b1", &building));
        assert_signs_out!(|api| api.buildings().delete("b1"));
        assert_signs_out!(|api| api.rooms().list_by_building("b1"));
        assert_signs_out!(|api| api.rooms().create(&room));
        assert_signs_out!(|api| api.rooms().update("r1", &room));
        assert_signs_out!(|api| api.rooms().delete("r1"));

        assert_eq!(stub.auth_for("*").len(), 16);
        assert!(stub.auth_for("*").iter().all(|auth| auth.as_deref() == Some("Bearer tok-1")));
    }

    #[tokio::test]
    async fn test_other_failures_keep_the_session() {
        let stub = Stub::default();
        let base = serve(
            Router::new()
                .route("/auth/me", get(profile_ok))
                .route("/campuses/{id}", put(campus_missing))
                .with_state(stub.clone()),
        )
        .await;
        let store = Arc::new(MemoryCredentialStore::with_token("tok-1"));
        let session = Session::new(base, store.clone()).unwrap();
        session.restore().await;

        let input = udata::models::campus::CampusInput {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let err = session
            .request(|api| api.campuses().update("nope", &input))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(store.get().as_deref(), Some("tok-1"));
        assert!(session.state().is_authenticated());
    }

    #[tokio::test]
    async fn test_requests_carry_the_token_current_at_dispatch() {
        let stub = Stub::default();
        let base = serve(
            Router::new()
                .route("/campuses", get(campuses_ok))
                .with_state(stub.clone()),
        )
        .await;
        let store = Arc::new(MemoryCredentialStore::with_token("t1"));
        let session = Session::new(base, store.clone()).unwrap();

        let campuses = session.request(|api| api.campuses().list()).await.unwrap();
        assert_eq!(campuses[0].code, "MAIN");

        store.set("t2");
        session.request(|api| api.campuses().list()).await.unwrap();

        store.clear();
        session.request(|api| api.campuses().list()).await.unwrap();

        assert_eq!(
            stub.auth_for("/campuses"),
            vec![
                Some("Bearer t1".to_string()),
                Some("Bearer t2".to_string()),
                None
            ]
        );
    }

    #[tokio::test]
    async fn test_manager_session_against_registry() {
        let base = serve_registry().await;
        let store = Arc::new(MemoryCredentialStore::new());
        let session = Session::new(base, store.clone()).unwrap();
        assert_eq!(session.route_access(None), RouteAccess::RedirectToLogin);

        // Step 1: Sign in
        let user = session.login("manager", "password").await.unwrap();
        assert_eq!(user.id, "2");
        assert!(session.can(Resource::Building, Action::Edit));
        assert!(!session.can(Resource::Campus, Action::Create));
        assert_eq!(
            session.route_access(Some((Resource::UserAccount, Action::View))),
            RouteAccess::Forbidden
        );

        // Step 2: Walk the asset tree
        let campuses = session.request(|api| api.campuses().list()).await.unwrap();
        assert_eq!(campuses.len(), 2);
        let buildings = session
            .request(|api| api.buildings().list_by_campus("c1"))
            .await
            .unwrap();
        assert_eq!(buildings.len(), 2);
        let rooms = session
            .request(|api| api.rooms().list_by_building("b1"))
            .await
            .unwrap();
        assert_eq!(rooms.len(), 2);

        // Step 3: Create a room, then fail to delete it
        let input = udata::models::room::RoomInput {
            building_id: Some("b2".to_string()),
            room_no: Some("7".to_string()),
            capacity: Some(12),
            floor: Some(1),
            room_type: Some(udata::models::room::RoomType::Office),
            ..Default::default()
        };
        let room = session.request(|api| api.rooms().create(&input)).await.unwrap();
        assert_eq!(room.prefix, "R");

        let err = session
            .request(|api| api.rooms().delete(&room.id))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::RequestFailed { status: 403, .. }));
        assert!(session.state().is_authenticated());

        // Step 4: Sign out
        session.logout();
        assert_eq!(store.get(), None);
        let err = session.request(|api| api.campuses().list()).await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_admin_manages_users_against_registry() {
        let base = serve_registry().await;
        let session = Session::new(base, Arc::new(MemoryCredentialStore::new())).unwrap();
        session.login("admin", "password").await.unwrap();

        let input = udata::models::user::UserInput {
            full_name: Some("Grace Ops".to_string()),
            username: Some("grace".to_string()),
            email: Some("grace@udata.edu".to_string()),
            password: Some("LongEnough1".to_string()),
            ..Default::default()
        };
        let created = session.request(|api| api.users().create(&input)).await.unwrap();
        assert_eq!(created.role, udata::models::user::Role::Viewer);

        let promote = udata::models::user::UserInput {
            role: Some(udata::models::user::Role::DataManager),
            ..Default::default()
        };
        let updated = session
            .request(|api| api.users().update(&created.id, &promote))
            .await
            .unwrap();
        assert_eq!(updated.role, udata::models::user::Role::DataManager);

        session.request(|api| api.users().delete(&created.id)).await.unwrap();
        let users = session.request(|api| api.users().list()).await.unwrap();
        assert_eq!(users.len(), 3);
    }
}
