use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::DatabaseManager;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::{AuthService, ListItemService, ListService, UserListService};
use crate::stores::{
    InMemoryItemStore, InMemoryListStore, InMemoryMembershipStore, InMemoryUserStore, ItemStore,
    ListStore, MembershipStore, PgItemStore, PgListStore, PgMembershipStore, PgUserStore,
    UserStore,
};

/// Everything a handler needs, assembled once at startup.
#[derive(Clone)]
pub struct AppState {
    pub lists: ListService,
    pub user_lists: UserListService,
    pub list_items: ListItemService,
    pub auth: AuthService,
    pub security: SecurityConfig,
    /// None when running on in-memory stores
    pub database: Option<DatabaseManager>,
}

impl AppState {
    pub fn postgres(database: DatabaseManager, security: SecurityConfig) -> Self {
        let pool = database.pool();
        Self::from_stores(
            Arc::new(PgListStore::new(pool.clone())),
            Arc::new(PgMembershipStore::new(pool.clone())),
            Arc::new(PgItemStore::new(pool.clone())),
            Arc::new(PgUserStore::new(pool)),
            security,
            Some(database),
        )
    }

    pub fn in_memory(security: SecurityConfig) -> Self {
        Self::from_stores(
            Arc::new(InMemoryListStore::new()),
            Arc::new(InMemoryMembershipStore::new()),
            Arc::new(InMemoryItemStore::new()),
            Arc::new(InMemoryUserStore::new()),
            security,
            None,
        )
    }

    pub fn from_stores(
        lists: Arc<dyn ListStore>,
        memberships: Arc<dyn MembershipStore>,
        items: Arc<dyn ItemStore>,
        users: Arc<dyn UserStore>,
        security: SecurityConfig,
        database: Option<DatabaseManager>,
    ) -> Self {
        Self {
            lists: ListService::new(lists.clone(), memberships.clone(), items.clone()),
            user_lists: UserListService::new(memberships),
            list_items: ListItemService::new(lists, items),
            auth: AuthService::new(users, security.clone()),
            security,
            database,
        }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/ping", get(public::ping))
        .route("/health", get(public::health))
        .merge(auth_routes())
        // Protected
        .merge(protected_routes(state.clone()))
        .with_state(state);

    if config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/signup", post(public::auth::sign_up))
        .route("/v1/auth/login", post(public::auth::login))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{list_items, lists, user_lists};

    Router::new()
        // Lists
        .route("/v1/lists", post(lists::create).get(lists::get_lists))
        .route("/v1/lists/join", post(lists::join_by_invite_code))
        .route(
            "/v1/lists/:id",
            get(lists::get).put(lists::update).delete(lists::delete),
        )
        .route("/v1/lists/:id/join", post(lists::join))
        // Items
        .route(
            "/v1/lists/:id/items",
            post(list_items::create).get(list_items::get_by_list),
        )
        .route("/v1/items/bulk-delete", post(list_items::bulk_delete))
        .route("/v1/items/complete", post(list_items::mark_completed))
        .route("/v1/items/pending", post(list_items::mark_pending))
        .route(
            "/v1/items/:id",
            get(list_items::get)
                .put(list_items::update)
                .delete(list_items::delete),
        )
        // Memberships
        .route(
            "/v1/userLists",
            post(user_lists::create).get(user_lists::get_by_user),
        )
        .route(
            "/v1/userLists/:id",
            get(user_lists::get).delete(user_lists::delete),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}
