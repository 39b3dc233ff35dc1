use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::statistics_page))
        .route("/refresh", post(handlers::statistics_refresh))
        .route("/compras", get(handlers::purchases_page))
        .route("/compras/refresh", post(handlers::purchases_refresh))
        .route("/productos/:id", get(handlers::product_page))
        .route("/productos/:id/refresh", post(handlers::product_refresh))
        .route("/api/panels/estadisticas", get(handlers::statistics_panel))
        .route("/api/panels/compras", get(handlers::purchases_panel))
        .route(
            "/api/panels/productos/:id",
            get(handlers::product_panel).delete(handlers::product_unmount),
        )
        .with_state(state)
}
