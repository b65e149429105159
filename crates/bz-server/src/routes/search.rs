//! Keyword search over item names.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::blocking;
use crate::routes::items::ItemsResponse;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub keyword: Option<String>,
}

/// GET /search?keyword=...
pub async fn search_items(
    State(ctx): State<AppContext>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ItemsResponse>, AppError> {
    let keyword = match params.keyword {
        Some(k) if !k.is_empty() => k,
        _ => return Err(bz_core::Error::Validation("keyword is required".into()).into()),
    };

    let repo = ctx.items.clone();
    let items = blocking(move || repo.search_items(&keyword)).await?;

    tracing::debug!(hits = items.len(), "Search completed");
    Ok(Json(ItemsResponse { items }))
}
