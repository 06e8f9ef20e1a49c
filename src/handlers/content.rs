use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::{self, GalleryInput, ImageBucket, ServiceInput};
use crate::entities::{gallery, service};
use crate::error::{AppError, AppResult};
use crate::handlers::admin::ConfirmQuery;
use crate::utils::upload::read_file_field;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

// ============ Services ============

pub async fn list_services(State(state): State<AppState>) -> AppResult<Json<Vec<service::Model>>> {
    Ok(Json(content::list_services(state.db.as_ref()).await?))
}

pub async fn create_service(
    State(state): State<AppState>,
    Json(payload): Json<ServiceInput>,
) -> AppResult<Json<Vec<service::Model>>> {
    content::create_service(state.db.as_ref(), payload).await?;
    Ok(Json(content::list_services(state.db.as_ref()).await?))
}

pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ServiceInput>,
) -> AppResult<Json<Vec<service::Model>>> {
    content::update_service(state.db.as_ref(), id, payload).await?;
    Ok(Json(content::list_services(state.db.as_ref()).await?))
}

pub async fn set_service_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActiveRequest>,
) -> AppResult<Json<Vec<service::Model>>> {
    content::set_service_active(state.db.as_ref(), id, payload.is_active).await?;
    Ok(Json(content::list_services(state.db.as_ref()).await?))
}

pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ConfirmQuery>,
) -> AppResult<Json<Vec<service::Model>>> {
    content::delete_service(state.db.as_ref(), id, query.confirm).await?;
    Ok(Json(content::list_services(state.db.as_ref()).await?))
}

// ============ Gallery ============

pub async fn list_gallery(State(state): State<AppState>) -> AppResult<Json<Vec<gallery::Model>>> {
    Ok(Json(content::list_gallery(state.db.as_ref()).await?))
}

pub async fn create_gallery_item(
    State(state): State<AppState>,
    Json(payload): Json<GalleryInput>,
) -> AppResult<Json<Vec<gallery::Model>>> {
    content::create_gallery_item(state.db.as_ref(), payload).await?;
    Ok(Json(content::list_gallery(state.db.as_ref()).await?))
}

pub async fn update_gallery_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GalleryInput>,
) -> AppResult<Json<Vec<gallery::Model>>> {
    content::update_gallery_item(state.db.as_ref(), id, payload).await?;
    Ok(Json(content::list_gallery(state.db.as_ref()).await?))
}

pub async fn set_gallery_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActiveRequest>,
) -> AppResult<Json<Vec<gallery::Model>>> {
    content::set_gallery_active(state.db.as_ref(), id, payload.is_active).await?;
    Ok(Json(content::list_gallery(state.db.as_ref()).await?))
}

pub async fn delete_gallery_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ConfirmQuery>,
) -> AppResult<Json<Vec<gallery::Model>>> {
    content::delete_gallery_item(state.db.as_ref(), id, query.confirm).await?;
    Ok(Json(content::list_gallery(state.db.as_ref()).await?))
}

// ============ Uploads ============

/// Upload one image (multipart `file` part) into the `services` or `gallery` bucket
pub async fn upload_image(
    State(state): State<AppState>,
    Path(bucket): Path<ImageBucket>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let file = read_file_field(field).await?;
            let url = content::upload_image(state.storage.as_ref(), bucket, &file).await?;
            return Ok(Json(UploadResponse { url }));
        }
    }

    Err(AppError::BadRequest("Missing file".to_string()))
}
