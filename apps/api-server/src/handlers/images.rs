//! Standalone image upload used by GraphQL clients.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};

use agora_shared::dto::{ImageUploadResponse, MessageResponse};

use crate::middleware::{AppResult, Identity};
use crate::state::AppState;
use crate::uploads::UploadForm;

/// PUT /post-image - multipart `image`, optional `oldPath`
///
/// The returned `filePath` is what `createPost`/`updatePost` expect as `imageUrl`.
/// `oldPath` is only deleted while no post references it.
pub async fn upload_image(
    state: web::Data<AppState>,
    _identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = UploadForm::read(payload).await?;

    let Some(file_path) = form.store_image(state.images.as_ref()).await? else {
        return Ok(HttpResponse::Ok().json(MessageResponse::new("No file provided!")));
    };

    if let Some(old_path) = form.text("oldPath") {
        if let Err(e) = state.feed.release_image(old_path).await {
            tracing::warn!(image_url = %old_path, error = %e, "Failed to remove replaced image");
        }
    }

    Ok(HttpResponse::Created().json(ImageUploadResponse {
        message: "File stored.".to_string(),
        file_path,
    }))
}
