//! CRUD routes for every catalog entity, mounted under `/api/v1`.

use crate::handlers::{attribute, product, product_type, product_variant};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn catalog_routes(state: AppState) -> Router {
    Router::new()
        .route("/attributes", get(attribute::list).post(attribute::create))
        .route(
            "/attributes/:id",
            get(attribute::get).put(attribute::update).delete(attribute::delete),
        )
        .route("/product-types", get(product_type::list).post(product_type::create))
        .route(
            "/product-types/:id",
            get(product_type::get)
                .put(product_type::update)
                .delete(product_type::delete),
        )
        .route("/products", get(product::list).post(product::create))
        .route(
            "/products/:id",
            get(product::get).put(product::update).delete(product::delete),
        )
        .route(
            "/product-variants",
            get(product_variant::list).post(product_variant::create),
        )
        .route(
            "/product-variants/:id",
            get(product_variant::get)
                .put(product_variant::update)
                .delete(product_variant::delete),
        )
        .with_state(state)
}
