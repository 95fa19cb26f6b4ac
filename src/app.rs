use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::BookStore;
use crate::handlers::{admin_book, book, system};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn BookStore>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Build the application router with all routes
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let router = Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(book_routes())
        // Admin (JWT with admin role)
        .merge(admin_routes(state.clone()))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    let router = if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    if config.security.enable_cors {
        router.layer(cors_layer(&config.security.cors_origins))
    } else {
        router
    }
}

fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/book/getAll", get(book::get_all))
        .route("/book/author", get(book::by_author))
        .route("/book/title", get(book::by_title))
        .route("/book/year", get(book::by_year))
        .route("/book/isbn", get(book::by_isbn))
        .route("/book/singlerating", get(book::by_single_rating))
        .route("/book/ratings", get(book::by_rating_range))
        .route("/book/authortitle", get(book::by_author_title))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/adminBook/addBook", post(admin_book::add_book))
        // Older clients post new books under /book
        .route("/book/addBook", post(admin_book::add_book))
        .route("/adminBook/author", delete(admin_book::delete_by_author))
        .route("/adminBook/isbn/:isbn", delete(admin_book::delete_by_isbn))
        .route("/adminBook/changeValues", put(admin_book::change_values))
        .route("/adminBook/addRating", put(admin_book::add_rating))
        .route_layer(middleware::from_fn_with_state(state, crate::middleware::require_admin))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
