use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::moderation::BookingView;
use crate::booking::{BookingSummary, BookingWizard, PaymentMethod, WizardError};
use crate::error::{AppError, AppResult};
use crate::locale::Locale;
use crate::middleware::auth::CurrentUser;
use crate::storage::UploadedFile;
use crate::utils::upload::read_file_field;
use crate::AppState;

/// The `booking` part of the submission form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookingRequest {
    pub lang: Locale,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub passport: String,
    pub service_ids: Vec<Uuid>,
    pub destination: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub card_holder: Option<String>,
    pub card_number: Option<String>,
    pub expiry: Option<String>,
    pub cvv: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingCreated {
    pub booking: BookingView,
    pub summary: Option<BookingSummary>,
}

/// Feeds a request through the wizard up to the point of submission. Each
/// step gate applies exactly as it does interactively.
pub fn replay(
    wizard: &mut BookingWizard,
    request: BookingRequest,
    proof: Option<UploadedFile>,
) -> Result<(), WizardError> {
    wizard.set_name(request.name);
    wizard.set_email(request.email);
    wizard.set_phone(request.phone);
    wizard.set_passport(request.passport);
    wizard.continue_to_next()?;

    let mut seen = Vec::with_capacity(request.service_ids.len());
    for id in request.service_ids {
        if !seen.contains(&id) {
            wizard.toggle_service(id)?;
            seen.push(id);
        }
    }
    wizard.set_destination(request.destination);
    wizard.set_start_date(request.start_date);
    wizard.set_end_date(request.end_date);
    wizard.set_notes(request.notes.unwrap_or_default());
    wizard.continue_to_next()?;

    let method = request.payment_method.ok_or(WizardError::MethodNotSelected)?;
    wizard.select_method(method)?;
    if method == PaymentMethod::Card {
        wizard.set_card_holder(request.card_holder.unwrap_or_default());
        wizard.set_card_number(request.card_number.as_deref().unwrap_or_default());
        wizard.set_expiry(request.expiry.as_deref().unwrap_or_default());
        wizard.set_cvv(request.cvv.as_deref().unwrap_or_default());
    }

    let proof = proof.ok_or(WizardError::MissingProof)?;
    wizard.attach_proof(proof)
}

/// Public booking submission (multipart: `booking` JSON + `payment_proof` file)
pub async fn submit_booking(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<BookingCreated>)> {
    let mut request: Option<BookingRequest> = None;
    let mut proof: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("booking") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid booking part: {}", e)))?;
                let parsed = serde_json::from_str(&text)
                    .map_err(|e| AppError::BadRequest(format!("Invalid booking data: {}", e)))?;
                request = Some(parsed);
            }
            Some("payment_proof") => proof = Some(read_file_field(field).await?),
            _ => {}
        }
    }

    let request =
        request.ok_or_else(|| AppError::BadRequest("Missing booking data".to_string()))?;

    let mut wizard = BookingWizard::new(request.lang, state.config.payment_number.clone());
    wizard.set_owner(current_user.user_id());
    wizard.catalog_mut().refresh(state.db.as_ref()).await;

    replay(&mut wizard, request, proof)?;
    let booking = wizard.submit(state.storage.as_ref(), state.db.as_ref()).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingCreated {
            summary: wizard.summary(),
            booking: booking.into(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::Step;
    use crate::catalog::tests::service_model;
    use crate::catalog::CatalogState;

    fn wizard_with_catalog() -> (BookingWizard, Uuid) {
        let flights = service_model("Flights", None, 0);
        let id = flights.id;
        let mut wizard = BookingWizard::new(Locale::En, "0712345678");
        *wizard.catalog_mut() = CatalogState::with_services(vec![flights]);
        (wizard, id)
    }

    fn request(service: Uuid) -> BookingRequest {
        BookingRequest {
            name: "Amina".into(),
            email: "amina@example.com".into(),
            phone: "+255700000000".into(),
            passport: "AB123456".into(),
            service_ids: vec![service, service],
            destination: "Dubai".into(),
            start_date: NaiveDate::from_ymd_opt(2026, 12, 1),
            payment_method: Some(PaymentMethod::Number),
            ..Default::default()
        }
    }

    fn png() -> UploadedFile {
        UploadedFile {
            file_name: "receipt.png".into(),
            content_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_replay_reaches_payment_step() {
        let (mut wizard, id) = wizard_with_catalog();
        replay(&mut wizard, request(id), Some(png())).unwrap();

        assert_eq!(wizard.step(), Step::Payment);
        assert_eq!(wizard.selected_services(), &[id]);
        assert!(wizard.can_submit());
    }

    #[test]
    fn test_replay_stops_at_first_failing_gate() {
        let (mut wizard, id) = wizard_with_catalog();
        let mut req = request(id);
        req.passport = " ".into();

        let err = replay(&mut wizard, req, Some(png())).unwrap_err();
        assert!(matches!(err, WizardError::MissingFields(f) if f == vec!["passport"]));
        assert_eq!(wizard.step(), Step::PersonalInfo);
    }

    #[test]
    fn test_replay_rejects_unknown_service() {
        let (mut wizard, _) = wizard_with_catalog();
        let stranger = Uuid::new_v4();

        let err = replay(&mut wizard, request(stranger), Some(png())).unwrap_err();
        assert!(matches!(err, WizardError::UnknownService(id) if id == stranger));
    }

    #[test]
    fn test_replay_requires_proof() {
        let (mut wizard, id) = wizard_with_catalog();
        let err = replay(&mut wizard, request(id), None).unwrap_err();
        assert!(matches!(err, WizardError::MissingProof));
    }

    #[test]
    fn test_replay_formats_card_fields() {
        let (mut wizard, id) = wizard_with_catalog();
        let mut req = request(id);
        req.payment_method = Some(PaymentMethod::Card);
        req.card_holder = Some("AMINA JUMA".into());
        req.card_number = Some("4111111111111111".into());
        req.expiry = Some("1228".into());
        req.cvv = Some("12a3".into());

        replay(&mut wizard, req, Some(png())).unwrap();
        assert_eq!(wizard.card_number(), "4111 1111 1111 1111");
        assert_eq!(wizard.expiry(), "12/28");
        assert_eq!(wizard.cvv(), "123");
        assert!(wizard.can_submit());
    }
}
