use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_restaurant, delete_restaurant, get_restaurant, index_restaurants, update_restaurant,
};

pub fn init_restaurants_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_restaurant).get(index_restaurants))
        .route(
            "/{id}",
            get(get_restaurant)
                .put(update_restaurant)
                .delete(delete_restaurant),
        )
}
