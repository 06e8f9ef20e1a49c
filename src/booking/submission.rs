use chrono::{NaiveDate, Utc};
use sea_orm::{prelude::Json, ActiveModelTrait, ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::status::{PaymentMethod, PaymentStatus};
use crate::entities::booking;

/// Point-in-time copy of a selected service. Later edits to the service do
/// not touch bookings that already hold a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    pub id: Uuid,
    pub title: String,
}

/// Joined display form, `"Flights, Hotels"`.
pub fn service_type(snapshots: &[ServiceSnapshot]) -> String {
    snapshots
        .iter()
        .map(|s| s.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Malformed stored values degrade to an empty list.
pub fn decode_snapshots(value: &Json) -> Vec<ServiceSnapshot> {
    match serde_json::from_value(value.clone()) {
        Ok(snapshots) => snapshots,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed service snapshots on booking");
            Vec::new()
        }
    }
}

/// A complete booking ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub passport: String,
    pub services: Vec<ServiceSnapshot>,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub payment_method: PaymentMethod,
    pub payment_proof_url: String,
    pub card_last_four: Option<String>,
    pub user_id: Option<Uuid>,
}

impl NewBooking {
    /// Every new booking starts out pending confirmation, whatever the method.
    pub fn into_active_model(self) -> booking::ActiveModel {
        let now = Utc::now();
        let card_last_four = match self.payment_method {
            PaymentMethod::Card => self.card_last_four,
            PaymentMethod::Number => None,
        };

        booking::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(self.name),
            email: Set(self.email),
            phone: Set(self.phone),
            passport: Set(self.passport),
            services: Set(serde_json::to_value(&self.services).unwrap_or(Json::Array(Vec::new()))),
            destination: Set(self.destination),
            start_date: Set(self.start_date),
            end_date: Set(self.end_date),
            notes: Set(self.notes),
            payment_method: Set(self.payment_method.as_str().to_string()),
            payment_status: Set(PaymentStatus::PendingConfirmation.as_str().to_string()),
            payment_proof_url: Set(Some(self.payment_proof_url)),
            card_last_four: Set(card_last_four),
            user_id: Set(self.user_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}

pub async fn insert_booking<C: ConnectionTrait>(
    db: &C,
    new_booking: NewBooking,
) -> Result<booking::Model, DbErr> {
    let booking = new_booking.into_active_model().insert(db).await?;
    tracing::info!(
        booking_id = %booking.id,
        payment_method = %booking.payment_method,
        "Booking created"
    );
    Ok(booking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn new_booking(method: PaymentMethod, last_four: Option<&str>) -> NewBooking {
        NewBooking {
            name: "Amina".into(),
            email: "amina@example.com".into(),
            phone: "+255700000000".into(),
            passport: "AB123456".into(),
            services: vec![
                ServiceSnapshot { id: Uuid::new_v4(), title: "Flights".into() },
                ServiceSnapshot { id: Uuid::new_v4(), title: "Hotels".into() },
            ],
            destination: "Dubai".into(),
            start_date: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            end_date: None,
            notes: None,
            payment_method: method,
            payment_proof_url: "memory://payment-proofs/1-abc.png".into(),
            card_last_four: last_four.map(str::to_string),
            user_id: None,
        }
    }

    #[test]
    fn test_number_booking_is_pending_without_card_digits() {
        let model = new_booking(PaymentMethod::Number, Some("9999")).into_active_model();
        assert_eq!(
            model.payment_status,
            ActiveValue::Set("pending_confirmation".to_string())
        );
        assert_eq!(model.card_last_four, ActiveValue::Set(None));
        assert_eq!(model.payment_method, ActiveValue::Set("number".to_string()));
    }

    #[test]
    fn test_card_booking_keeps_last_four() {
        let model = new_booking(PaymentMethod::Card, Some("1234")).into_active_model();
        assert_eq!(model.card_last_four, ActiveValue::Set(Some("1234".to_string())));
        assert_eq!(
            model.payment_status,
            ActiveValue::Set("pending_confirmation".to_string())
        );
    }

    #[test]
    fn test_snapshots_roundtrip_through_json_column() {
        let booking = new_booking(PaymentMethod::Number, None);
        let expected = booking.services.clone();
        let model = booking.into_active_model();

        let ActiveValue::Set(json) = model.services else {
            panic!("services not set");
        };
        assert_eq!(decode_snapshots(&json), expected);
        assert_eq!(service_type(&expected), "Flights, Hotels");
    }

    #[test]
    fn test_malformed_snapshots_degrade_to_empty() {
        let decoded = decode_snapshots(&serde_json::json!("Flights, Hotels"));
        assert!(decoded.is_empty());
        assert_eq!(service_type(&decoded), "");
    }

    #[test]
    fn test_titles_with_commas_stay_intact() {
        let snapshots = vec![ServiceSnapshot { id: Uuid::new_v4(), title: "Visa, Permits".into() }];
        let json = serde_json::to_value(&snapshots).unwrap();
        assert_eq!(decode_snapshots(&json)[0].title, "Visa, Permits");
    }
}
