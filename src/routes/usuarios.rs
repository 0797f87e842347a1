use axum::{Router, routing::{post, get}, middleware};
use crate::state::AppState;
use crate::handlers::usuario::{
    register_usuario, login_usuario, get_me, list_usuarios, get_usuario, delete_usuario,
};
use crate::middleware::auth::require_auth;

pub fn routes(state: AppState) -> Router<AppState> {
    let open = Router::new()
        .route("/usuarios", post(register_usuario))
        .route("/usuarios/login", post(login_usuario));

    let protected = Router::new()
        .route("/usuarios", get(list_usuarios))
        .route("/usuarios/me", get(get_me))
        .route("/usuarios/{id}", get(get_usuario).delete(delete_usuario))
        .layer(middleware::from_fn_with_state(state, require_auth));

    open.merge(protected)
}
