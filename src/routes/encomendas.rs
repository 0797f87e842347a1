use axum::{
    routing::{get, post},
    Router, middleware,
};
use crate::state::AppState;
use crate::handlers::encomenda::{
    list_encomendas, get_encomenda, create_encomenda, replace_encomenda, update_encomenda, delete_encomenda,
};
use crate::middleware::auth::require_auth;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/encomendas", get(list_encomendas))
        .route("/encomendas/post", post(create_encomenda))
        .route(
            "/encomendas/{id}",
            get(get_encomenda).put(replace_encomenda).patch(update_encomenda).delete(delete_encomenda),
        )
        .layer(middleware::from_fn_with_state(state, require_auth))
}
