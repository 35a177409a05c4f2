use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{create_user, get_me, get_user, index_users, update_me, update_user};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).put(update_me))
        .route("/", post(create_user).get(index_users))
        // Account deletion is intentionally not exposed:
        // .route("/{id}", ... .delete(delete_user))
        .route("/{id}", get(get_user).put(update_user))
}
