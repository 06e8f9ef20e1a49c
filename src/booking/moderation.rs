//! Admin review of submitted bookings.
//!
//! Status moves once, from `pending_confirmation` to `paid` or `rejected`.
//! The update is conditional on the row still being pending, so of two
//! moderators racing on the same booking only the first one wins.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;
use uuid::Uuid;

use crate::booking::status::{can_moderate, status_badge, Decision, PaymentStatus};
use crate::booking::submission::{decode_snapshots, service_type, ServiceSnapshot};
use crate::entities::booking;
use crate::error::{AppError, AppResult};

/// Read-only projection of a booking for the back office.
#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub passport: String,
    pub services: Vec<ServiceSnapshot>,
    pub service_type: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub payment_method: String,
    pub payment_status: String,
    pub status_label: String,
    pub can_moderate: bool,
    pub payment_proof_url: Option<String>,
    pub card_last_four: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<booking::Model> for BookingView {
    fn from(b: booking::Model) -> Self {
        let services = decode_snapshots(&b.services);
        Self {
            id: b.id,
            name: b.name,
            email: b.email,
            phone: b.phone,
            passport: b.passport,
            service_type: service_type(&services),
            services,
            destination: b.destination,
            start_date: b.start_date,
            end_date: b.end_date,
            notes: b.notes,
            payment_method: b.payment_method,
            status_label: status_badge(&b.payment_status),
            can_moderate: can_moderate(&b.payment_status),
            payment_status: b.payment_status,
            payment_proof_url: b.payment_proof_url,
            card_last_four: b.card_last_four,
            user_id: b.user_id,
            created_at: b.created_at.with_timezone(&Utc),
            updated_at: b.updated_at.with_timezone(&Utc),
        }
    }
}

/// What the proof overlay needs.
#[derive(Debug, Clone, Serialize)]
pub struct ProofView {
    pub booking_id: Uuid,
    pub payment_proof_url: Option<String>,
    pub payment_status: String,
    pub status_label: String,
    pub can_moderate: bool,
}

impl From<&booking::Model> for ProofView {
    fn from(b: &booking::Model) -> Self {
        Self {
            booking_id: b.id,
            payment_proof_url: b.payment_proof_url.clone(),
            payment_status: b.payment_status.clone(),
            status_label: status_badge(&b.payment_status),
            can_moderate: can_moderate(&b.payment_status),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookingStats {
    pub pending: usize,
    pub paid: usize,
    pub rejected: usize,
    pub total: usize,
}

impl BookingStats {
    pub fn from_bookings(bookings: &[booking::Model]) -> Self {
        let count = |status: PaymentStatus| {
            bookings
                .iter()
                .filter(|b| b.payment_status == status.as_str())
                .count()
        };

        Self {
            pending: count(PaymentStatus::PendingConfirmation),
            paid: count(PaymentStatus::Paid),
            rejected: count(PaymentStatus::Rejected),
            total: bookings.len(),
        }
    }
}

/// Every booking, newest first.
pub async fn list_bookings<C: ConnectionTrait>(db: &C) -> AppResult<Vec<booking::Model>> {
    Ok(booking::Entity::find()
        .order_by_desc(booking::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn list_views<C: ConnectionTrait>(db: &C) -> AppResult<Vec<BookingView>> {
    Ok(list_bookings(db)
        .await?
        .into_iter()
        .map(BookingView::from)
        .collect())
}

pub async fn find_booking<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<booking::Model> {
    booking::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}

/// Applies an approve/reject decision to a pending booking.
pub async fn decide<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    decision: Decision,
) -> AppResult<PaymentStatus> {
    let current = find_booking(db, id).await?;
    if !can_moderate(&current.payment_status) {
        return Err(AppError::Conflict(format!(
            "Payment already {}",
            status_badge(&current.payment_status).to_lowercase()
        )));
    }

    let target = decision.target();
    let result = booking::Entity::update_many()
        .col_expr(booking::Column::PaymentStatus, Expr::value(target.as_str()))
        .col_expr(booking::Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(booking::Column::Id.eq(id))
        .filter(booking::Column::PaymentStatus.eq(PaymentStatus::PendingConfirmation.as_str()))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::Conflict(
            "Payment status was changed by someone else".to_string(),
        ));
    }

    tracing::info!(booking_id = %id, status = %target, "Payment status updated");
    Ok(target)
}

/// Permanently removes a booking. Requires explicit confirmation.
pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid, confirmed: bool) -> AppResult<()> {
    if !confirmed {
        return Err(AppError::BadRequest(
            "Deleting a booking is permanent; repeat the request with confirm=true".to_string(),
        ));
    }

    let result = booking::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Booking not found".to_string()));
    }

    tracing::info!(booking_id = %id, "Booking deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn booking_with_status(status: &str) -> booking::Model {
        let now = Utc::now();
        booking::Model {
            id: Uuid::new_v4(),
            name: "Amina Juma".into(),
            email: "amina@example.com".into(),
            phone: "+255700000000".into(),
            passport: "AB123456".into(),
            services: serde_json::json!([{ "id": Uuid::nil(), "title": "Flights" }, { "id": Uuid::nil(), "title": "Hotels" }]),
            destination: "Dubai".into(),
            start_date: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            end_date: None,
            notes: Some("window seat".into()),
            payment_method: "number".into(),
            payment_status: status.into(),
            payment_proof_url: Some("memory://payment-proofs/1-abc.png".into()),
            card_last_four: None,
            user_id: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn exec(rows: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: rows,
        }
    }

    #[test]
    fn test_view_projection() {
        let view = BookingView::from(booking_with_status("pending_confirmation"));
        assert_eq!(view.service_type, "Flights, Hotels");
        assert_eq!(view.status_label, "Pending");
        assert!(view.can_moderate);

        let paid = BookingView::from(booking_with_status("paid"));
        assert_eq!(paid.status_label, "Paid");
        assert!(!paid.can_moderate);
    }

    #[test]
    fn test_stats() {
        let bookings = vec![
            booking_with_status("pending_confirmation"),
            booking_with_status("pending_confirmation"),
            booking_with_status("paid"),
            booking_with_status("rejected"),
            booking_with_status("odd"),
        ];
        assert_eq!(
            BookingStats::from_bookings(&bookings),
            BookingStats { pending: 2, paid: 1, rejected: 1, total: 5 }
        );
    }

    #[tokio::test]
    async fn test_approve_pending_booking() {
        let pending = booking_with_status("pending_confirmation");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![pending.clone()]])
            .append_exec_results([exec(1)])
            .into_connection();

        let status = decide(&db, pending.id, Decision::Approve).await.unwrap();
        assert_eq!(status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn test_terminal_status_is_not_reopened() {
        let paid = booking_with_status("paid");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![paid.clone()]])
            .into_connection();

        let err = decide(&db, paid.id, Decision::Reject).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_lost_race_is_a_conflict() {
        let pending = booking_with_status("pending_confirmation");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![pending.clone()]])
            .append_exec_results([exec(0)])
            .into_connection();

        let err = decide(&db, pending.id, Decision::Approve).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_unknown_booking() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<booking::Model>::new()])
            .into_connection();

        let err = decide(&db, Uuid::new_v4(), Decision::Approve).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = delete(&db, Uuid::new_v4(), false).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_list_no_longer_contains_booking() {
        let kept = booking_with_status("paid");
        let removed = booking_with_status("rejected");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1)])
            .append_query_results([vec![kept.clone()]])
            .into_connection();

        delete(&db, removed.id, true).await.unwrap();
        let remaining = list_bookings(&db).await.unwrap();
        assert!(remaining.iter().all(|b| b.id != removed.id));
    }

    #[tokio::test]
    async fn test_delete_missing_booking() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0)])
            .into_connection();

        let err = delete(&db, Uuid::new_v4(), true).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
