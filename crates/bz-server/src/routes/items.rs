//! Item route handlers.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use bz_core::{Error, Item, NewItem};
use serde::Serialize;

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::blocking;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<Item>,
}

/// Fields collected from the `POST /items` multipart form.
#[derive(Debug, Default)]
struct ItemForm {
    name: Option<String>,
    category: Option<String>,
    image: Option<Vec<u8>>,
}

impl ItemForm {
    async fn read(mut multipart: Multipart) -> Result<Self, Error> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(form_error)? {
            let field_name = field.name().map(str::to_owned);
            match field_name.as_deref() {
                Some("name") => form.name = Some(field.text().await.map_err(form_error)?),
                Some("category") => {
                    form.category = Some(field.text().await.map_err(form_error)?)
                }
                Some("image") => {
                    form.image = Some(field.bytes().await.map_err(form_error)?.to_vec())
                }
                other => tracing::debug!(field = ?other, "Ignoring unknown form field"),
            }
        }
        Ok(form)
    }

    /// Split into the text fields and the image bytes, rejecting anything
    /// missing or empty.
    fn into_parts(self) -> Result<(String, String, Vec<u8>), Error> {
        let name = required(self.name, "name")?;
        let category = required(self.category, "category")?;
        let image = self
            .image
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| Error::Validation("image is required".into()))?;
        Ok((name, category, image))
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, Error> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Validation(format!("{field} is required")))
}

fn form_error(e: axum::extract::multipart::MultipartError) -> Error {
    Error::Validation(format!("failed to parse multipart form: {e}"))
}

/// POST /items
pub async fn add_item(
    State(ctx): State<AppContext>,
    multipart: Multipart,
) -> Result<Json<MessageResponse>, AppError> {
    let (name, category, image) = ItemForm::read(multipart).await?.into_parts()?;

    let images = ctx.images.clone();
    let repo = ctx.items.clone();
    let item = blocking(move || {
        let filename = images.put(&image)?;
        repo.insert(&NewItem::new(name, category, filename))
    })
    .await?;

    tracing::info!(
        id = %item.id,
        name = %item.name,
        category = %item.category,
        image = %item.image,
        "Item received"
    );

    Ok(Json(MessageResponse {
        message: format!(
            "item received: name: {},category: {}",
            item.name, item.category
        ),
    }))
}

/// GET /items
pub async fn list_items(State(ctx): State<AppContext>) -> Result<Json<ItemsResponse>, AppError> {
    let repo = ctx.items.clone();
    let items = blocking(move || repo.list_items()).await?;
    Ok(Json(ItemsResponse { items }))
}

/// GET /items/{item_id}
pub async fn get_item(
    State(ctx): State<AppContext>,
    Path(item_id): Path<String>,
) -> Result<Json<ItemsResponse>, AppError> {
    let repo = ctx.items.clone();
    let item = blocking(move || repo.get_item(&item_id)).await?;
    Ok(Json(ItemsResponse { items: vec![item] }))
}
