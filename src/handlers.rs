use crate::errors::AppError;
use crate::panels::{DataSource, FetchState};
use crate::state::AppState;
use crate::ui::{page_path, render_product_sales, render_purchases, render_statistics};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Redirect},
    Json,
};
use chrono::Local;

const MAX_PRODUCT_ID_LEN: usize = 128;

pub async fn statistics_page(State(state): State<AppState>) -> Html<String> {
    let current = state.mount(&DataSource::Statistics).await;
    Html(render_statistics(
        &current,
        &state.formatter,
        Local::now().date_naive(),
    ))
}

pub async fn purchases_page(State(state): State<AppState>) -> Html<String> {
    let current = state.mount(&DataSource::Purchases).await;
    Html(render_purchases(&current))
}

pub async fn product_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let source = product_source(&id)?;
    let current = state.mount(&source).await;
    Ok(Html(render_product_sales(&current, id.trim())))
}

pub async fn statistics_refresh(State(state): State<AppState>) -> Redirect {
    refresh(&state, DataSource::Statistics).await
}

pub async fn purchases_refresh(State(state): State<AppState>) -> Redirect {
    refresh(&state, DataSource::Purchases).await
}

pub async fn product_refresh(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let source = product_source(&id)?;
    Ok(refresh(&state, source).await)
}

pub async fn statistics_panel(State(state): State<AppState>) -> Json<FetchState> {
    Json(state.mount(&DataSource::Statistics).await)
}

pub async fn purchases_panel(State(state): State<AppState>) -> Json<FetchState> {
    Json(state.mount(&DataSource::Purchases).await)
}

pub async fn product_panel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FetchState>, AppError> {
    let source = product_source(&id)?;
    Ok(Json(state.mount(&source).await))
}

pub async fn product_unmount(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let source = product_source(&id)?;
    if state.unmount(&source).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("no panel open for product {}", id.trim())))
    }
}

async fn refresh(state: &AppState, source: DataSource) -> Redirect {
    state.refresh(&source).await;
    Redirect::to(&page_path(&source))
}

fn product_source(id: &str) -> Result<DataSource, AppError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::bad_request("product id must not be blank"));
    }
    if id.len() > MAX_PRODUCT_ID_LEN {
        return Err(AppError::bad_request("product id is too long"));
    }
    Ok(DataSource::ProductSales(id.to_string()))
}
