//! Public service catalog: the active offerings shown on the site and
//! offered for selection in the booking wizard.

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::service;
use crate::locale::{localized, Locale};

/// Icons a service may be rendered with. Unknown keys map to `Briefcase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceIcon {
    Plane,
    Hotel,
    Moon,
    GraduationCap,
    Briefcase,
    Heart,
    Package,
}

impl ServiceIcon {
    pub fn from_key(key: &str) -> Self {
        match key {
            "Plane" => ServiceIcon::Plane,
            "Hotel" => ServiceIcon::Hotel,
            "Moon" | "MoonIcon" => ServiceIcon::Moon,
            "GraduationCap" => ServiceIcon::GraduationCap,
            "Heart" => ServiceIcon::Heart,
            "Package" => ServiceIcon::Package,
            _ => ServiceIcon::Briefcase,
        }
    }
}

/// Active services, ordered for display. Inactive rows are excluded by the
/// query itself.
pub async fn fetch_active_services<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<service::Model>, DbErr> {
    service::Entity::find()
        .filter(service::Column::IsActive.eq(true))
        .order_by_asc(service::Column::SortOrder)
        .all(db)
        .await
}

/// Handle for one catalog refresh. Only the most recently issued ticket may
/// commit its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

#[derive(Debug)]
pub enum CatalogView<'a> {
    Loading,
    Empty,
    Services(&'a [service::Model]),
}

/// Locally held copy of the active catalog.
#[derive(Debug, Default)]
pub struct CatalogState {
    generation: u64,
    loaded: bool,
    services: Vec<service::Model>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_services(services: Vec<service::Model>) -> Self {
        Self {
            generation: 0,
            loaded: true,
            services,
        }
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        RefreshTicket(self.generation)
    }

    /// Commits a fetch result. Returns `false` when the ticket is stale and
    /// the result was dropped. Fetch errors are logged and leave the catalog
    /// empty.
    pub fn apply(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<service::Model>, DbErr>,
    ) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(
                ticket = ticket.0,
                current = self.generation,
                "Dropping stale catalog response"
            );
            return false;
        }

        self.services = match result {
            Ok(services) => services,
            Err(e) => {
                tracing::warn!(error = %e, "Error fetching services");
                Vec::new()
            }
        };
        self.loaded = true;
        true
    }

    /// Fetches and commits in one go; a failed fetch leaves the catalog
    /// empty.
    pub async fn refresh<C: ConnectionTrait>(&mut self, db: &C) {
        let ticket = self.begin_refresh();
        let result = fetch_active_services(db).await;
        self.apply(ticket, result);
    }

    pub fn services(&self) -> &[service::Model] {
        &self.services
    }

    pub fn get(&self, id: Uuid) -> Option<&service::Model> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    /// Display title of a service for the given locale.
    pub fn label(&self, id: Uuid, locale: Locale) -> Option<String> {
        self.get(id)
            .map(|s| localized(&s.title, s.title_ar.as_deref(), locale).to_string())
    }

    pub fn view(&self) -> CatalogView<'_> {
        if !self.loaded {
            CatalogView::Loading
        } else if self.services.is_empty() {
            CatalogView::Empty
        } else {
            CatalogView::Services(&self.services)
        }
    }
}
