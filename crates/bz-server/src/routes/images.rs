//! Image serving route handler.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use bz_core::Error;
use bz_store::ImageLookup;

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::blocking;

/// GET /images/{filename}
///
/// Valid names with no stored blob are answered with the default image.
pub async fn get_image(
    State(ctx): State<AppContext>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let store = ctx.images.clone();
    let data = blocking(move || {
        let path = match store.resolve(&filename)? {
            ImageLookup::Found(path) => path,
            ImageLookup::Missing(_) => {
                tracing::debug!(filename = %filename, "Image not found; serving default");
                store.default_image_path()
            }
        };

        match std::fs::read(&path) {
            Ok(data) => {
                tracing::info!(path = %path.display(), "Returned image");
                Ok(data)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::not_found("image", filename))
            }
            Err(e) => Err(e.into()),
        }
    })
    .await?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "image/jpeg")], data))
}
