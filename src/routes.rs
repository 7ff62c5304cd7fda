use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{elevated, protected, public};
use crate::middleware::{jwt_auth_middleware, require_admin, require_sales_manager};
use crate::policy::PolicyType;
use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .route("/auth/login", post(public::auth::login_post))
        // Protected
        .merge(session_routes(&state))
        .merge(sales_manager_routes(&state));

    for policy_type in PolicyType::ALL {
        router = router.merge(policy_routes(&state, policy_type));
    }

    router = router
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes))
        .layer(cors_layer(&state.config.security.cors_origins));

    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn session_routes(state: &AppState) -> Router<AppState> {
    let change_password = Router::new()
        .route("/auth/change-password", post(protected::auth::change_password_post))
        .route_layer(from_fn(require_sales_manager));

    Router::new()
        .route("/auth/me", get(protected::auth::me_get))
        .merge(change_password)
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn sales_manager_routes(state: &AppState) -> Router<AppState> {
    use elevated::sales_managers;

    Router::new()
        .route(
            "/users/sales-managers",
            get(sales_managers::list_get).post(sales_managers::create_post),
        )
        .route(
            "/users/sales-managers/:id/reset-password",
            put(sales_managers::reset_password_put),
        )
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

/// CRUD routes for one policy type, e.g. `/life-insurance` and `/life-insurance/:id`
fn policy_routes(state: &AppState, policy_type: PolicyType) -> Router<AppState> {
    use protected::policy;

    let root = policy_type.route();
    Router::new()
        .route(root, get(policy::collection_get).post(policy::collection_post))
        .route(
            &format!("{}/:id", root),
            put(policy::record_put).delete(policy::record_delete),
        )
        .route_layer(from_fn(require_sales_manager))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
        .layer(Extension(policy_type))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
