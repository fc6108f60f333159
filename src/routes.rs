use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use http::{header, Method};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{handlers, middleware_layer, state::AppState};

/// Builds the registry API router.
///
/// `POST /auth/login` is public; every other route sits behind
/// [`middleware_layer::auth::require_auth`] and checks the caller's role.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(86400));

    let login_routes = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/users", get(handlers::auth::list_users))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/user/{id}", put(handlers::auth::update_user))
        .route("/users/{id}", delete(handlers::auth::delete_user))
        .route(
            "/campuses",
            get(handlers::campuses::list_campuses).post(handlers::campuses::create_campus),
        )
        .route(
            "/campuses/{id}",
            put(handlers::campuses::update_campus).delete(handlers::campuses::delete_campus),
        )
        .route(
            "/buildings/campus/{campus_id}",
            get(handlers::buildings::list_by_campus),
        )
        .route("/buildings", post(handlers::buildings::create_building))
        .route(
            "/buildings/{id}",
            put(handlers::buildings::update_building).delete(handlers::buildings::delete_building),
        )
        .route(
            "/rooms/building/{building_id}",
            get(handlers::rooms::list_by_building),
        )
        .route("/rooms", post(handlers::rooms::create_room))
        .route(
            "/rooms/{id}",
            put(handlers::rooms::update_room).delete(handlers::rooms::delete_room),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state);

    Router::new()
        .merge(login_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::default())
                        .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                        .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
                )
                .layer(cors),
        )
}
