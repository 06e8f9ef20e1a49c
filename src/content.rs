//! Back-office management of the services catalog and the gallery.
//!
//! Admin lists include inactive rows and are ordered by `sort_order`. New
//! rows are appended with `sort_order` equal to the current row count; the
//! value is never reassigned afterwards, so gaps left by deletes stay.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::{gallery, service};
use crate::error::{AppError, AppResult};
use crate::storage::{unique_key, FileStorage, UploadedFile};
use crate::utils::upload::non_empty;

const DEFAULT_ICON: &str = "Briefcase";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceInput {
    pub title: String,
    pub title_ar: Option<String>,
    pub description: String,
    pub description_ar: Option<String>,
    pub icon: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub is_active: Option<bool>,
}

impl ServiceInput {
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Title and description are required".to_string(),
            ));
        }
        Ok(())
    }

    fn apply(self, model: &mut service::ActiveModel) {
        model.title = Set(self.title.trim().to_string());
        model.title_ar = Set(non_empty(self.title_ar));
        model.description = Set(self.description.trim().to_string());
        model.description_ar = Set(non_empty(self.description_ar));
        model.icon = Set(non_empty(self.icon).unwrap_or_else(|| DEFAULT_ICON.to_string()));
        model.image_url = Set(non_empty(self.image_url));
        model.price = Set(self.price);
        if let Some(active) = self.is_active {
            model.is_active = Set(active);
        }
        model.updated_at = Set(Utc::now().into());
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GalleryInput {
    pub title: String,
    pub title_ar: Option<String>,
    pub description: Option<String>,
    pub description_ar: Option<String>,
    pub image_url: String,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

impl GalleryInput {
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() || self.image_url.trim().is_empty() {
            return Err(AppError::BadRequest("Title and image are required".to_string()));
        }
        Ok(())
    }

    fn apply(self, model: &mut gallery::ActiveModel) {
        model.title = Set(self.title.trim().to_string());
        model.title_ar = Set(non_empty(self.title_ar));
        model.description = Set(non_empty(self.description));
        model.description_ar = Set(non_empty(self.description_ar));
        model.image_url = Set(self.image_url.trim().to_string());
        model.category = Set(non_empty(self.category));
        if let Some(active) = self.is_active {
            model.is_active = Set(active);
        }
        model.updated_at = Set(Utc::now().into());
    }
}

fn require_confirmation(confirmed: bool, what: &str) -> AppResult<()> {
    if !confirmed {
        return Err(AppError::BadRequest(format!(
            "Deleting a {} is permanent; repeat the request with confirm=true",
            what
        )));
    }
    Ok(())
}

// ============ Services ============

/// Every service, active or not.
pub async fn list_services<C: ConnectionTrait>(db: &C) -> AppResult<Vec<service::Model>> {
    Ok(service::Entity::find()
        .order_by_asc(service::Column::SortOrder)
        .all(db)
        .await?)
}

pub async fn create_service<C: ConnectionTrait>(
    db: &C,
    input: ServiceInput,
) -> AppResult<service::Model> {
    input.validate()?;
    let sort_order = list_services(db).await?.len() as i32;

    let now = Utc::now();
    let mut model = service::ActiveModel {
        id: Set(Uuid::new_v4()),
        is_active: Set(true),
        sort_order: Set(sort_order),
        created_at: Set(now.into()),
        ..Default::default()
    };
    input.apply(&mut model);

    let created = model.insert(db).await?;
    tracing::info!(service_id = %created.id, sort_order, "Service created");
    Ok(created)
}

pub async fn update_service<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    input: ServiceInput,
) -> AppResult<service::Model> {
    input.validate()?;
    let existing = service::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;

    let mut model: service::ActiveModel = existing.into();
    input.apply(&mut model);
    Ok(model.update(db).await?)
}

pub async fn set_service_active<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    active: bool,
) -> AppResult<()> {
    let result = service::Entity::update_many()
        .col_expr(service::Column::IsActive, Expr::value(active))
        .col_expr(service::Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(service::Column::Id.eq(id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Service not found".to_string()));
    }
    Ok(())
}

pub async fn delete_service<C: ConnectionTrait>(db: &C, id: Uuid, confirmed: bool) -> AppResult<()> {
    require_confirmation(confirmed, "service")?;
    let result = service::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Service not found".to_string()));
    }
    tracing::info!(service_id = %id, "Service deleted");
    Ok(())
}

// ============ Gallery ============

pub async fn list_gallery<C: ConnectionTrait>(db: &C) -> AppResult<Vec<gallery::Model>> {
    Ok(gallery::Entity::find()
        .order_by_asc(gallery::Column::SortOrder)
        .all(db)
        .await?)
}

pub async fn create_gallery_item<C: ConnectionTrait>(
    db: &C,
    input: GalleryInput,
) -> AppResult<gallery::Model> {
    input.validate()?;
    let sort_order = list_gallery(db).await?.len() as i32;

    let now = Utc::now();
    let mut model = gallery::ActiveModel {
        id: Set(Uuid::new_v4()),
        is_active: Set(true),
        sort_order: Set(sort_order),
        created_at: Set(now.into()),
        ..Default::default()
    };
    input.apply(&mut model);

    let created = model.insert(db).await?;
    tracing::info!(item_id = %created.id, sort_order, "Gallery item created");
    Ok(created)
}

pub async fn update_gallery_item<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    input: GalleryInput,
) -> AppResult<gallery::Model> {
    input.validate()?;
    let existing = gallery::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Gallery item not found".to_string()))?;

    let mut model: gallery::ActiveModel = existing.into();
    input.apply(&mut model);
    Ok(model.update(db).await?)
}

pub async fn set_gallery_active<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    active: bool,
) -> AppResult<()> {
    let result = gallery::Entity::update_many()
        .col_expr(gallery::Column::IsActive, Expr::value(active))
        .col_expr(gallery::Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(gallery::Column::Id.eq(id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Gallery item not found".to_string()));
    }
    Ok(())
}

pub async fn delete_gallery_item<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    confirmed: bool,
) -> AppResult<()> {
    require_confirmation(confirmed, "gallery item")?;
    let result = gallery::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Gallery item not found".to_string()));
    }
    tracing::info!(item_id = %id, "Gallery item deleted");
    Ok(())
}

// ============ Images ============

/// Buckets the back office may upload images into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageBucket {
    Services,
    Gallery,
}

impl ImageBucket {
    pub fn name(&self) -> &'static str {
        match self {
            ImageBucket::Services => "services",
            ImageBucket::Gallery => "gallery",
        }
    }

    fn key(&self, extension: &str) -> String {
        match self {
            ImageBucket::Services => format!("service-images/{}", unique_key(extension)),
            ImageBucket::Gallery => unique_key(extension),
        }
    }
}

/// Stores an admin-supplied image and returns its public URL.
pub async fn upload_image(
    storage: &dyn FileStorage,
    bucket: ImageBucket,
    file: &UploadedFile,
) -> AppResult<String> {
    if !file.content_type.starts_with("image/") {
        return Err(AppError::BadRequest("Please select an image file".to_string()));
    }

    let key = bucket.key(file.extension());
    storage
        .upload(bucket.name(), &key, &file.bytes, &file.content_type)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to upload image: {}", e)))?;

    tracing::info!(bucket = bucket.name(), key = %key, "Image uploaded");
    Ok(storage.public_url(bucket.name(), &key))
}
