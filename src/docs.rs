use utoipa::OpenApi;

use crate::modules::items::model::{CreateItemDto, Item, UpdateItemDto};
use crate::modules::orders::model::OrderItem;
use crate::modules::restaurants::model::{
    CreateRestaurantDto, Restaurant, UpdateRestaurantDto,
};
use crate::modules::users::model::{CreateUserDto, UpdateUserDto, User};
use crate::utils::pagination::PaginationParams;
use crate::utils::response::Envelope;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::restaurants::controller::create_restaurant,
        crate::modules::restaurants::controller::index_restaurants,
        crate::modules::restaurants::controller::get_restaurant,
        crate::modules::restaurants::controller::update_restaurant,
        crate::modules::restaurants::controller::delete_restaurant,
        crate::modules::items::controller::create_item,
        crate::modules::items::controller::index_items,
        crate::modules::items::controller::get_item,
        crate::modules::items::controller::update_item,
        crate::modules::items::controller::delete_item,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::index_users,
        crate::modules::users::controller::get_me,
        crate::modules::users::controller::update_me,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
    ),
    components(
        schemas(
            Restaurant,
            CreateRestaurantDto,
            UpdateRestaurantDto,
            Item,
            CreateItemDto,
            UpdateItemDto,
            User,
            CreateUserDto,
            UpdateUserDto,
            OrderItem,
            PaginationParams,
            Envelope<Restaurant>,
            Envelope<Item>,
            Envelope<User>,
            Envelope<Vec<Restaurant>>,
            Envelope<Vec<Item>>,
            Envelope<Vec<User>>,
        )
    ),
    tags(
        (name = "Restaurants", description = "Restaurant management endpoints"),
        (name = "Items", description = "Menu item management endpoints"),
        (name = "Accounts", description = "User account endpoints")
    ),
    info(
        title = "Dinehub API",
        version = "0.1.0",
        description = "REST API for restaurants, menu items and user accounts, built with Axum and PostgreSQL.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;
