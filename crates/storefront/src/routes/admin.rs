//! Admin catalog mutations.
//!
//! The admin form is posted as `multipart/form-data` so an image can ride
//! along with the text fields. An uploaded `image` replaces the `img` field.
//! Stored images are deleted once no product points at them.

use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::instrument;

use izeshop_core::{Product, ProductInput};

use super::products::{PRODUCT_NOT_FOUND, parse_product_id};
use crate::db::{ProductRepository, RepositoryError};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAdmin;
use crate::services::uploads::UploadStore;
use crate::state::AppState;

/// Image file carried by the form.
struct ImagePart {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        Self::BadRequest(err.body_text())
    }
}

/// Split the multipart form into text fields and an optional image.
async fn read_form(mut multipart: Multipart) -> Result<(ProductInput, Option<ImagePart>)> {
    let mut input = ProductInput::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "image" {
            let file_name = field.file_name().map(str::to_owned);
            let content_type = field.content_type().map(str::to_owned);
            let bytes = field.bytes().await?;
            // Browsers send an empty part when no file was picked
            if !bytes.is_empty() {
                image = Some(ImagePart {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field.text().await?;
        match name.as_str() {
            "name" => input.name = value,
            "price" => input.price = value,
            "category" => input.category = value,
            "img" => input.img = value,
            "description" => input.description = value,
            "tag" => input.tag = value,
            "oldPrice" | "old_price" => input.old_price = value,
            other => tracing::debug!(field = other, "Ignoring unknown product form field"),
        }
    }

    Ok((input, image))
}

/// Store the uploaded image, if any, returning its public path.
async fn store_image(uploads: &UploadStore, image: Option<ImagePart>) -> Result<Option<String>> {
    let Some(image) = image else {
        return Ok(None);
    };
    let path = uploads
        .save(
            image.file_name.as_deref(),
            image.content_type.as_deref(),
            &image.bytes,
        )
        .await?;
    Ok(Some(path))
}

/// Remove a freshly stored image when the write it belonged to failed.
async fn discard_on_error<T>(
    uploads: &UploadStore,
    uploaded: Option<&str>,
    result: Result<T>,
) -> Result<T> {
    if let (Err(_), Some(path)) = (&result, uploaded) {
        uploads.remove(path).await;
    }
    result
}

/// Delete a stored image once no product points at it.
async fn release_image(state: &AppState, img: &str) -> Result<()> {
    if !ProductRepository::new(state.db()).image_in_use(img).await? {
        state.uploads().remove(img).await;
    }
    Ok(())
}

/// Create a product.
#[instrument(skip(state, _admin, multipart))]
pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Product>)> {
    let (input, image) = read_form(multipart).await?;
    // Validate before touching the disk
    let mut draft = input.normalize()?;
    let uploaded = store_image(state.uploads(), image).await?;
    if let Some(path) = &uploaded {
        draft.img.clone_from(path);
    }

    let created = ProductRepository::new(state.db())
        .create(&draft)
        .await
        .map_err(AppError::from);
    let product = discard_on_error(state.uploads(), uploaded.as_deref(), created).await?;

    let product_id = product.id.to_string();
    add_breadcrumb(
        "admin",
        "Created product",
        Some(&[("product_id", product_id.as_str())]),
    );
    tracing::info!(product_id = %product.id, name = %product.name, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product.
///
/// A newly uploaded image replaces the stored one, which is then deleted.
#[instrument(skip(state, _admin, multipart))]
pub async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Product>> {
    let id = parse_product_id(&id)?;
    let (input, image) = read_form(multipart).await?;
    let mut draft = input.normalize()?;

    let repo = ProductRepository::new(state.db());
    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))?;

    let uploaded = store_image(state.uploads(), image).await?;
    if let Some(path) = &uploaded {
        draft.img.clone_from(path);
    }

    let updated = repo.update(id, &draft).await.map_err(not_found_as_product);
    let product = discard_on_error(state.uploads(), uploaded.as_deref(), updated).await?;

    if existing.img != product.img {
        release_image(&state, &existing.img).await?;
    }

    tracing::info!(product_id = %product.id, "Product updated");
    Ok(Json(product))
}

/// Delete a product and its uploaded image.
#[instrument(skip(state, _admin))]
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_product_id(&id)?;

    let repo = ProductRepository::new(state.db());
    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))?;
    repo.delete(id).await.map_err(not_found_as_product)?;
    release_image(&state, &existing.img).await?;

    let product_id = id.to_string();
    add_breadcrumb(
        "admin",
        "Deleted product",
        Some(&[("product_id", product_id.as_str())]),
    );
    tracing::info!(product_id = %id, "Product deleted");

    Ok(Json(json!({ "message": "Product deleted" })))
}

fn not_found_as_product(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound(PRODUCT_NOT_FOUND.to_string()),
        other => AppError::Database(other),
    }
}
