use axum::{
    extract::{Query, State},
    Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use uuid::Uuid;

use crate::catalog::{CatalogState, CatalogView, ServiceIcon};
use crate::entities::{gallery, service};
use crate::error::AppResult;
use crate::locale::{localized, LangQuery, Locale};
use crate::AppState;

pub const NO_SERVICES_MESSAGE: &str = "No services available";

#[derive(Debug, Serialize)]
pub struct ServiceCard {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub icon: ServiceIcon,
    pub image_url: Option<String>,
    pub price: Option<f64>,
}

impl ServiceCard {
    fn localized(s: &service::Model, locale: Locale) -> Self {
        Self {
            id: s.id,
            title: localized(&s.title, s.title_ar.as_deref(), locale).to_string(),
            description: localized(&s.description, s.description_ar.as_deref(), locale)
                .to_string(),
            icon: ServiceIcon::from_key(&s.icon),
            image_url: s.image_url.clone(),
            price: s.price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub services: Vec<ServiceCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct GalleryCard {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentInfo {
    pub payment_number: String,
    pub methods: Vec<PaymentMethodInfo>,
}

#[derive(Debug, Serialize)]
pub struct PaymentMethodInfo {
    pub method: &'static str,
    pub label: &'static str,
}

/// Active services for the public site. A failed fetch degrades to the
/// empty catalog.
pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> AppResult<Json<CatalogResponse>> {
    let mut catalog = CatalogState::new();
    catalog.refresh(state.db.as_ref()).await;

    let response = match catalog.view() {
        CatalogView::Services(services) => CatalogResponse {
            services: services
                .iter()
                .map(|s| ServiceCard::localized(s, query.lang))
                .collect(),
            message: None,
        },
        CatalogView::Empty | CatalogView::Loading => CatalogResponse {
            services: Vec::new(),
            message: Some(NO_SERVICES_MESSAGE),
        },
    };

    Ok(Json(response))
}

/// Active gallery items in display order
pub async fn list_gallery(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> AppResult<Json<Vec<GalleryCard>>> {
    let items = gallery::Entity::find()
        .filter(gallery::Column::IsActive.eq(true))
        .order_by_asc(gallery::Column::SortOrder)
        .all(state.db.as_ref())
        .await?;

    let cards = items
        .into_iter()
        .map(|g| GalleryCard {
            id: g.id,
            title: localized(&g.title, g.title_ar.as_deref(), query.lang).to_string(),
            description: g.description.as_deref().map(|d| {
                localized(d, g.description_ar.as_deref(), query.lang).to_string()
            }),
            image_url: g.image_url,
            category: g.category,
        })
        .collect();

    Ok(Json(cards))
}

pub async fn payment_info(State(state): State<AppState>) -> Json<PaymentInfo> {
    use crate::booking::PaymentMethod;

    Json(PaymentInfo {
        payment_number: state.config.payment_number.clone(),
        methods: [PaymentMethod::Card, PaymentMethod::Number]
            .into_iter()
            .map(|m| PaymentMethodInfo {
                method: m.as_str(),
                label: m.label(),
            })
            .collect(),
    })
}
