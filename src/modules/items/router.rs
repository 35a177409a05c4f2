use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{create_item, delete_item, get_item, index_items, update_item};

pub fn init_items_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_item).get(index_items))
        .route("/{id}", get(get_item).put(update_item).delete(delete_item))
}
