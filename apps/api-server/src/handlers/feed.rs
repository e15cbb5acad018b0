//! Feed handlers.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use agora_core::services::PostInput;
use agora_shared::dto::{
    CreatePostResponse, CreatorView, MessageResponse, PageQuery, PostResponse, PostsResponse,
};

use crate::handlers::views::{creator_view, post_view};
use crate::middleware::{AppError, AppResult, Identity};
use crate::state::AppState;
use crate::uploads::{IMAGE_FIELD, UploadForm, discard_upload};

/// Malformed ids cannot name an existing post.
fn parse_post_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Could not find post.".to_string()))
}

/// GET /feed/posts?page=N
pub async fn get_posts(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.feed.list_posts(query.page).await?;

    Ok(HttpResponse::Ok().json(PostsResponse {
        message: "Fetched posts successfully.".to_string(),
        posts: page.items.iter().map(post_view).collect(),
        total_items: page.total_items,
    }))
}

/// POST /feed/post - multipart `title`, `content`, `image`
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = UploadForm::read(payload).await?;
    let image_url = form.store_image(state.images.as_ref()).await?;

    let input = PostInput {
        title: form.text_or_empty("title"),
        content: form.text_or_empty("content"),
        image_url: image_url.clone(),
    };

    let details = match state.feed.create_post(identity.user_id, input).await {
        Ok(details) => details,
        Err(e) => {
            discard_upload(state.images.as_ref(), image_url.as_deref()).await;
            return Err(e.into());
        }
    };

    let creator = details
        .creator
        .as_ref()
        .map(creator_view)
        .unwrap_or_else(|| CreatorView {
            id: identity.user_id.to_string(),
            name: String::new(),
        });

    Ok(HttpResponse::Created().json(CreatePostResponse {
        message: "Post created successfully!".to_string(),
        post: post_view(&details),
        creator,
    }))
}

/// GET /feed/post/{post_id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    let details = state.feed.get_post(post_id).await?;

    Ok(HttpResponse::Ok().json(PostResponse {
        message: "Post fetched.".to_string(),
        post: post_view(&details),
    }))
}

/// PUT /feed/post/{post_id} - multipart `title`, `content`, and either a new
/// `image` file or the stored image path as a text field
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    let form = UploadForm::read(payload).await?;
    let uploaded = form.store_image(state.images.as_ref()).await?;

    let image_url = uploaded.clone().or_else(|| {
        form.text(IMAGE_FIELD)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    });

    let input = PostInput {
        title: form.text_or_empty("title"),
        content: form.text_or_empty("content"),
        image_url,
    };

    let details = match state.feed.update_post(identity.user_id, post_id, input).await {
        Ok(details) => details,
        Err(e) => {
            discard_upload(state.images.as_ref(), uploaded.as_deref()).await;
            return Err(e.into());
        }
    };

    Ok(HttpResponse::Ok().json(PostResponse {
        message: "Post updated!".to_string(),
        post: post_view(&details),
    }))
}

/// DELETE /feed/post/{post_id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    state.feed.delete_post(identity.user_id, post_id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Deleted post.")))
}
