//! The multi-step booking form.
//!
//! Steps advance strictly in order: personal info, travel details, payment,
//! success. Each forward move is gated by the fields of the current step;
//! going back never discards anything. The payment step carries its own
//! sub-state for the chosen method. Submitting uploads the proof first and
//! then inserts the booking; any failure leaves the wizard on the payment
//! step with everything the customer entered.

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, DbErr};
use serde::Serialize;
use uuid::Uuid;

use crate::booking::format::{card_last_four, format_card_number, format_expiry, sanitize_cvv};
use crate::booking::proof::{upload_proof, validate_proof, ProofError};
use crate::booking::status::{PaymentMethod, PaymentStatus};
use crate::booking::submission::{insert_booking, NewBooking, ServiceSnapshot};
use crate::catalog::CatalogState;
use crate::entities::booking;
use crate::locale::Locale;
use crate::storage::{FileStorage, UploadedFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    PersonalInfo,
    TravelDetails,
    Payment,
    Success,
}

impl Step {
    pub fn number(&self) -> u8 {
        match self {
            Step::PersonalInfo => 1,
            Step::TravelDetails => 2,
            Step::Payment => 3,
            Step::Success => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStage {
    MethodUnselected,
    CardForm,
    NumberForm,
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Please fill in: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Unknown service: {0}")]
    UnknownService(Uuid),
    #[error("Cannot {action} from the {from:?} step")]
    InvalidTransition { from: Step, action: &'static str },
    #[error("Please choose a payment method")]
    MethodNotSelected,
    #[error("Payment proof required: please upload a screenshot of your payment")]
    MissingProof,
    #[error(transparent)]
    Proof(#[from] ProofError),
    #[error(transparent)]
    Database(#[from] DbErr),
}

#[derive(Debug, Clone, Default)]
struct PersonalInfo {
    name: String,
    email: String,
    phone: String,
    passport: String,
}

#[derive(Debug, Clone, Default)]
struct TravelDetails {
    destination: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    notes: String,
}

#[derive(Debug, Clone, Default)]
struct CardDetails {
    holder: String,
    number: String,
    expiry: String,
    cvv: String,
}

/// What the success screen shows, built from the form itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSummary {
    pub booking_id: Uuid,
    pub name: String,
    pub services: Vec<String>,
    pub destination: String,
    pub start_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub payment_method_label: &'static str,
    pub payment_status: PaymentStatus,
}

#[derive(Debug)]
pub struct BookingWizard {
    step: Step,
    locale: Locale,
    catalog: CatalogState,
    personal: PersonalInfo,
    travel: TravelDetails,
    selected: Vec<Uuid>,
    method: Option<PaymentMethod>,
    card: CardDetails,
    proof: Option<UploadedFile>,
    owner: Option<Uuid>,
    payment_number: String,
    last_error: Option<String>,
    booking_id: Option<Uuid>,
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl BookingWizard {
    pub fn new(locale: Locale, payment_number: impl Into<String>) -> Self {
        Self {
            step: Step::PersonalInfo,
            locale,
            catalog: CatalogState::new(),
            personal: PersonalInfo::default(),
            travel: TravelDetails::default(),
            selected: Vec::new(),
            method: None,
            card: CardDetails::default(),
            proof: None,
            owner: None,
            payment_number: payment_number.into(),
            last_error: None,
            booking_id: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut CatalogState {
        &mut self.catalog
    }

    pub fn set_owner(&mut self, user_id: Option<Uuid>) {
        self.owner = user_id;
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ============ Step 1 ============

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.personal.name = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.personal.email = value.into();
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.personal.phone = value.into();
    }

    pub fn set_passport(&mut self, value: impl Into<String>) {
        self.personal.passport = value.into();
    }

    fn missing_personal(&self) -> Vec<&'static str> {
        let p = &self.personal;
        [
            ("name", &p.name),
            ("email", &p.email),
            ("phone", &p.phone),
            ("passport", &p.passport),
        ]
        .into_iter()
        .filter(|(_, v)| blank(v))
        .map(|(field, _)| field)
        .collect()
    }

    // ============ Step 2 ============

    /// Adds the service if absent, removes it if present.
    pub fn toggle_service(&mut self, id: Uuid) -> Result<(), WizardError> {
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
            return Ok(());
        }
        if !self.catalog.contains(id) {
            return Err(WizardError::UnknownService(id));
        }
        self.selected.push(id);
        Ok(())
    }

    pub fn selected_services(&self) -> &[Uuid] {
        &self.selected
    }

    /// Localized titles of the selected services, in selection order.
    pub fn selected_service_labels(&self) -> Vec<String> {
        self.selected
            .iter()
            .filter_map(|id| self.catalog.label(*id, self.locale))
            .collect()
    }

    pub fn set_destination(&mut self, value: impl Into<String>) {
        self.travel.destination = value.into();
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        self.travel.start_date = date;
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) {
        self.travel.end_date = date;
    }

    pub fn set_notes(&mut self, value: impl Into<String>) {
        self.travel.notes = value.into();
    }

    fn missing_travel(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.selected.is_empty() {
            missing.push("services");
        }
        if blank(&self.travel.destination) {
            missing.push("destination");
        }
        if self.travel.start_date.is_none() {
            missing.push("start date");
        }
        missing
    }

    // ============ Navigation ============

    pub fn can_continue(&self) -> bool {
        match self.step {
            Step::PersonalInfo => self.missing_personal().is_empty(),
            Step::TravelDetails => self.missing_travel().is_empty(),
            Step::Payment | Step::Success => false,
        }
    }

    pub fn continue_to_next(&mut self) -> Result<Step, WizardError> {
        let (missing, next) = match self.step {
            Step::PersonalInfo => (self.missing_personal(), Step::TravelDetails),
            Step::TravelDetails => (self.missing_travel(), Step::Payment),
            from => {
                return Err(WizardError::InvalidTransition { from, action: "continue" });
            }
        };

        if !missing.is_empty() {
            return Err(WizardError::MissingFields(missing));
        }
        self.step = next;
        Ok(next)
    }

    pub fn back(&mut self) -> Result<Step, WizardError> {
        let previous = match self.step {
            Step::TravelDetails => Step::PersonalInfo,
            Step::Payment => Step::TravelDetails,
            from => return Err(WizardError::InvalidTransition { from, action: "go back" }),
        };
        self.step = previous;
        Ok(previous)
    }

    // ============ Step 3 ============

    pub fn payment_stage(&self) -> PaymentStage {
        match self.method {
            None => PaymentStage::MethodUnselected,
            Some(PaymentMethod::Card) => PaymentStage::CardForm,
            Some(PaymentMethod::Number) => PaymentStage::NumberForm,
        }
    }

    fn require_payment_step(&self, action: &'static str) -> Result<(), WizardError> {
        if self.step != Step::Payment {
            return Err(WizardError::InvalidTransition { from: self.step, action });
        }
        Ok(())
    }

    pub fn select_method(&mut self, method: PaymentMethod) -> Result<PaymentStage, WizardError> {
        self.require_payment_step("choose a payment method")?;
        self.method = Some(method);
        Ok(self.payment_stage())
    }

    /// Back to method selection. Card values stay in memory but no longer
    /// count towards submission.
    pub fn change_method(&mut self) -> Result<PaymentStage, WizardError> {
        self.require_payment_step("change the payment method")?;
        self.method = None;
        Ok(PaymentStage::MethodUnselected)
    }

    /// Number the customer pays to when paying by number.
    pub fn payment_number(&self) -> &str {
        &self.payment_number
    }

    pub fn set_card_holder(&mut self, value: impl Into<String>) {
        self.card.holder = value.into();
    }

    pub fn set_card_number(&mut self, raw: &str) {
        self.card.number = format_card_number(raw);
    }

    pub fn set_expiry(&mut self, raw: &str) {
        self.card.expiry = format_expiry(raw);
    }

    pub fn set_cvv(&mut self, raw: &str) {
        self.card.cvv = sanitize_cvv(raw);
    }

    pub fn card_number(&self) -> &str {
        &self.card.number
    }

    pub fn expiry(&self) -> &str {
        &self.card.expiry
    }

    pub fn cvv(&self) -> &str {
        &self.card.cvv
    }

    /// Replaces the attached proof. A rejected file leaves the previous one
    /// in place.
    pub fn attach_proof(&mut self, file: UploadedFile) -> Result<(), WizardError> {
        validate_proof(&file)?;
        self.proof = Some(file);
        Ok(())
    }

    pub fn proof(&self) -> Option<&UploadedFile> {
        self.proof.as_ref()
    }

    fn missing_payment(&self) -> Result<Vec<&'static str>, WizardError> {
        let mut missing = Vec::new();
        match self.method {
            None => return Err(WizardError::MethodNotSelected),
            Some(PaymentMethod::Number) => {}
            Some(PaymentMethod::Card) => {
                let c = &self.card;
                for (field, value) in [
                    ("card holder", &c.holder),
                    ("card number", &c.number),
                    ("expiry", &c.expiry),
                    ("cvv", &c.cvv),
                ] {
                    if blank(value) {
                        missing.push(field);
                    }
                }
            }
        }
        Ok(missing)
    }

    pub fn can_submit(&self) -> bool {
        self.step == Step::Payment
            && self.proof.is_some()
            && matches!(self.missing_payment(), Ok(missing) if missing.is_empty())
    }

    /// Snapshots of the selected services, titled for the current locale.
    pub fn service_snapshots(&self) -> Vec<ServiceSnapshot> {
        self.selected
            .iter()
            .filter_map(|id| {
                self.catalog
                    .label(*id, self.locale)
                    .map(|title| ServiceSnapshot { id: *id, title })
            })
            .collect()
    }

    fn to_new_booking(&self, proof_url: String) -> Result<NewBooking, WizardError> {
        let method = self.method.ok_or(WizardError::MethodNotSelected)?;
        let start_date = self
            .travel
            .start_date
            .ok_or(WizardError::MissingFields(vec!["start date"]))?;
        let notes = Some(self.travel.notes.clone()).filter(|n| !blank(n));

        Ok(NewBooking {
            name: self.personal.name.clone(),
            email: self.personal.email.clone(),
            phone: self.personal.phone.clone(),
            passport: self.personal.passport.clone(),
            services: self.service_snapshots(),
            destination: self.travel.destination.clone(),
            start_date,
            end_date: self.travel.end_date,
            notes,
            payment_method: method,
            payment_proof_url: proof_url,
            card_last_four: match method {
                PaymentMethod::Card => card_last_four(&self.card.number),
                PaymentMethod::Number => None,
            },
            user_id: self.owner,
        })
    }

    /// Uploads the proof, persists the booking and moves to `Success`.
    ///
    /// On failure the wizard stays on the payment step, records the message
    /// and keeps every field for a retry. A proof uploaded before a failed
    /// insert is not removed.
    pub async fn submit<C: ConnectionTrait>(
        &mut self,
        storage: &dyn FileStorage,
        db: &C,
    ) -> Result<booking::Model, WizardError> {
        self.require_payment_step("submit")?;
        let result = self.try_submit(storage, db).await;

        match &result {
            Ok(booking) => {
                self.step = Step::Success;
                self.booking_id = Some(booking.id);
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Booking submission failed");
                self.last_error = Some(e.to_string());
            }
        }
        result
    }

    async fn try_submit<C: ConnectionTrait>(
        &self,
        storage: &dyn FileStorage,
        db: &C,
    ) -> Result<booking::Model, WizardError> {
        let proof = self.proof.as_ref().ok_or(WizardError::MissingProof)?;
        let missing = self.missing_payment()?;
        if !missing.is_empty() {
            return Err(WizardError::MissingFields(missing));
        }

        let proof_url = upload_proof(storage, proof).await?;
        let new_booking = self.to_new_booking(proof_url)?;
        Ok(insert_booking(db, new_booking).await?)
    }

    /// Available once the booking has been stored.
    pub fn summary(&self) -> Option<BookingSummary> {
        let booking_id = self.booking_id.filter(|_| self.step == Step::Success)?;
        let method = self.method?;

        Some(BookingSummary {
            booking_id,
            name: self.personal.name.clone(),
            services: self.selected_service_labels(),
            destination: self.travel.destination.clone(),
            start_date: self.travel.start_date?,
            payment_method: method,
            payment_method_label: method.label(),
            payment_status: PaymentStatus::PendingConfirmation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::proof::{MAX_PROOF_BYTES, PROOF_BUCKET};
    use crate::catalog::tests::service_model;
    use crate::entities::service;
    use crate::storage::MemoryStorage;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn png(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    fn catalog() -> Vec<service::Model> {
        vec![
            service_model("Flights", Some("حجز الطيران"), 0),
            service_model("Hotels", None, 1),
        ]
    }

    fn wizard_at_payment(services: &[service::Model]) -> BookingWizard {
        let mut w = BookingWizard::new(Locale::En, "0712345678");
        *w.catalog_mut() = CatalogState::with_services(services.to_vec());
        w.set_name("Amina Juma");
        w.set_email("amina@example.com");
        w.set_phone("+255700000000");
        w.set_passport("AB123456");
        w.continue_to_next().unwrap();
        w.toggle_service(services[0].id).unwrap();
        w.set_destination("Dubai");
        w.set_start_date(NaiveDate::from_ymd_opt(2026, 12, 1));
        w.continue_to_next().unwrap();
        w
    }

    fn stored_booking(method: &str, last_four: Option<&str>) -> booking::Model {
        let now = Utc::now();
        booking::Model {
            id: Uuid::new_v4(),
            name: "Amina Juma".into(),
            email: "amina@example.com".into(),
            phone: "+255700000000".into(),
            passport: "AB123456".into(),
            services: serde_json::json!([]),
            destination: "Dubai".into(),
            start_date: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            end_date: None,
            notes: None,
            payment_method: method.into(),
            payment_status: "pending_confirmation".into(),
            payment_proof_url: Some("memory://payment-proofs/x.png".into()),
            card_last_four: last_four.map(str::to_string),
            user_id: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn test_step_one_requires_all_personal_fields() {
        let mut w = BookingWizard::new(Locale::En, "0712345678");
        w.set_name("Amina");
        w.set_email("amina@example.com");
        w.set_phone("+255700000000");
        assert!(!w.can_continue());

        match w.continue_to_next() {
            Err(WizardError::MissingFields(fields)) => assert_eq!(fields, vec!["passport"]),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(w.step(), Step::PersonalInfo);

        w.set_passport("AB123456");
        assert!(w.can_continue());
        assert_eq!(w.continue_to_next().unwrap(), Step::TravelDetails);
    }

    #[test]
    fn test_zero_services_blocks_step_two() {
        let services = catalog();
        let mut w = BookingWizard::new(Locale::En, "0712345678");
        *w.catalog_mut() = CatalogState::with_services(services.clone());
        w.set_name("Amina");
        w.set_email("amina@example.com");
        w.set_phone("+255700000000");
        w.set_passport("AB123456");
        w.continue_to_next().unwrap();
        w.set_destination("Dubai");
        w.set_start_date(NaiveDate::from_ymd_opt(2026, 12, 1));

        assert!(!w.can_continue());
        assert!(matches!(
            w.continue_to_next(),
            Err(WizardError::MissingFields(f)) if f == vec!["services"]
        ));

        w.toggle_service(services[1].id).unwrap();
        assert!(w.can_continue());
        w.toggle_service(services[1].id).unwrap();
        assert!(!w.can_continue());
    }

    #[test]
    fn test_unknown_service_is_refused() {
        let mut w = wizard_at_payment(&catalog());
        let stray = Uuid::new_v4();
        assert!(matches!(w.toggle_service(stray), Err(WizardError::UnknownService(id)) if id == stray));
    }

    #[test]
    fn test_back_keeps_data() {
        let services = catalog();
        let mut w = wizard_at_payment(&services);
        assert_eq!(w.back().unwrap(), Step::TravelDetails);
        assert_eq!(w.back().unwrap(), Step::PersonalInfo);
        assert!(w.back().is_err());

        assert!(w.can_continue());
        w.continue_to_next().unwrap();
        assert!(w.can_continue());
        assert_eq!(w.selected_services(), &[services[0].id]);
    }

    #[test]
    fn test_cannot_continue_past_payment() {
        let mut w = wizard_at_payment(&catalog());
        assert!(!w.can_continue());
        assert!(matches!(
            w.continue_to_next(),
            Err(WizardError::InvalidTransition { from: Step::Payment, .. })
        ));
    }

    #[test]
    fn test_labels_follow_locale() {
        let services = catalog();
        let mut w = BookingWizard::new(Locale::Ar, "0712345678");
        *w.catalog_mut() = CatalogState::with_services(services.clone());
        w.toggle_service(services[0].id).unwrap();
        w.toggle_service(services[1].id).unwrap();
        assert_eq!(w.selected_service_labels(), vec!["حجز الطيران", "Hotels"]);
    }

    #[test]
    fn test_payment_method_sub_states() {
        let mut w = wizard_at_payment(&catalog());
        assert_eq!(w.payment_stage(), PaymentStage::MethodUnselected);
        assert!(!w.can_submit());

        assert_eq!(w.select_method(PaymentMethod::Card).unwrap(), PaymentStage::CardForm);
        w.set_card_holder("Amina Juma");
        w.set_card_number("4111111111111234");
        w.set_expiry("1228");
        w.set_cvv("123");
        assert_eq!(w.card_number(), "4111 1111 1111 1234");
        assert_eq!(w.expiry(), "12/28");
        assert!(!w.can_submit(), "proof still missing");

        w.attach_proof(png("proof.png")).unwrap();
        assert!(w.can_submit());

        assert_eq!(w.change_method().unwrap(), PaymentStage::MethodUnselected);
        assert!(!w.can_submit());
        assert_eq!(w.card_number(), "4111 1111 1111 1234");

        assert_eq!(w.select_method(PaymentMethod::Number).unwrap(), PaymentStage::NumberForm);
        assert_eq!(w.payment_number(), "0712345678");
        assert!(w.can_submit());
    }

    #[test]
    fn test_card_form_requires_every_card_field() {
        let mut w = wizard_at_payment(&catalog());
        w.select_method(PaymentMethod::Card).unwrap();
        w.attach_proof(png("proof.png")).unwrap();
        w.set_card_holder("Amina");
        w.set_card_number("4111111111111234");
        w.set_expiry("1228");
        assert!(!w.can_submit());
        w.set_cvv("12345");
        assert_eq!(w.cvv(), "1234");
        assert!(w.can_submit());
    }

    #[test]
    fn test_method_selection_outside_payment_step() {
        let mut w = BookingWizard::new(Locale::En, "0712345678");
        assert!(w.select_method(PaymentMethod::Card).is_err());
        assert!(w.change_method().is_err());
    }

    #[test]
    fn test_rejected_proof_keeps_previous() {
        let mut w = wizard_at_payment(&catalog());
        w.attach_proof(png("first.png")).unwrap();

        let pdf = UploadedFile {
            file_name: "invoice.pdf".into(),
            content_type: "application/pdf".into(),
            bytes: vec![0; 10],
        };
        assert!(matches!(
            w.attach_proof(pdf),
            Err(WizardError::Proof(ProofError::UnsupportedType(_)))
        ));

        let huge = UploadedFile {
            file_name: "huge.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: vec![0; MAX_PROOF_BYTES + 1],
        };
        assert!(matches!(
            w.attach_proof(huge),
            Err(WizardError::Proof(ProofError::TooLarge(_)))
        ));

        assert_eq!(w.proof().map(|p| p.file_name.as_str()), Some("first.png"));
    }

    #[tokio::test]
    async fn test_submit_without_proof_is_blocked() {
        let mut w = wizard_at_payment(&catalog());
        w.select_method(PaymentMethod::Number).unwrap();
        let storage = MemoryStorage::new();
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = w.submit(&storage, &db).await.unwrap_err();
        assert!(matches!(err, WizardError::MissingProof));
        assert_eq!(w.step(), Step::Payment);
        assert!(w.last_error().unwrap().contains("Payment proof required"));
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_number_submission_reaches_success() {
        let services = catalog();
        let mut w = wizard_at_payment(&services);
        w.select_method(PaymentMethod::Number).unwrap();
        w.attach_proof(png("proof.png")).unwrap();

        let booking_new = w.to_new_booking("url".into()).unwrap();
        assert_eq!(booking_new.card_last_four, None);
        assert_eq!(booking_new.services[0].title, "Flights");

        let stored = stored_booking("number", None);
        let storage = MemoryStorage::new();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored.clone()]])
            .into_connection();

        let booking = w.submit(&storage, &db).await.unwrap();
        assert_eq!(booking.payment_status, "pending_confirmation");
        assert_eq!(booking.card_last_four, None);
        assert_eq!(w.step(), Step::Success);
        assert_eq!(storage.keys(PROOF_BUCKET).len(), 1);

        let summary = w.summary().unwrap();
        assert_eq!(summary.booking_id, stored.id);
        assert_eq!(summary.services, vec!["Flights"]);
        assert_eq!(summary.payment_method_label, "Payment by Number");
        assert_eq!(summary.payment_status, PaymentStatus::PendingConfirmation);
    }

    #[test]
    fn test_card_submission_captures_last_four() {
        let mut w = wizard_at_payment(&catalog());
        w.select_method(PaymentMethod::Card).unwrap();
        w.set_card_number("4111 1111 1111 1234");
        let new_booking = w.to_new_booking("url".into()).unwrap();
        assert_eq!(new_booking.card_last_four.as_deref(), Some("1234"));
        assert_eq!(new_booking.payment_method, PaymentMethod::Card);
    }

    #[tokio::test]
    async fn test_failed_insert_keeps_form_for_retry() {
        let mut w = wizard_at_payment(&catalog());
        w.select_method(PaymentMethod::Number).unwrap();
        w.attach_proof(png("proof.png")).unwrap();

        let storage = MemoryStorage::new();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("insert rejected".into())])
            .into_connection();

        let err = w.submit(&storage, &db).await.unwrap_err();
        assert!(matches!(err, WizardError::Database(_)));
        assert_eq!(w.step(), Step::Payment);
        assert!(w.last_error().unwrap().contains("insert rejected"));
        assert!(w.proof().is_some());
        assert!(w.summary().is_none());
        // the uploaded proof is not cleaned up
        assert_eq!(storage.keys(PROOF_BUCKET).len(), 1);
    }

    #[tokio::test]
    async fn test_failed_upload_does_not_insert() {
        let mut w = wizard_at_payment(&catalog());
        w.select_method(PaymentMethod::Number).unwrap();
        w.attach_proof(png("proof.png")).unwrap();

        let storage = MemoryStorage::new();
        storage.fail_uploads(true);
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = w.submit(&storage, &db).await.unwrap_err();
        assert!(matches!(err, WizardError::Proof(ProofError::Storage(_))));
        assert_eq!(w.step(), Step::Payment);
        assert!(db.into_transaction_log().is_empty());
    }
}
