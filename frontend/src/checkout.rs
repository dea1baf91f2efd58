//! Donation checkout.
//!
//! Two phases: the order intent is created on our backend, then the payment
//! widget collects the money and its confirmation is posted back for
//! verification. Nothing is assumed committed on the client; a failure in
//! either phase only resets the form's processing state.

use crate::api::GoGreenApi;
use crate::web::http::Transport;
use gogreen_shared::protocol::{CreateOrderRequest, PaymentConfirmation, PaymentVerified};
use gogreen_shared::{ApiError, ApiResult, GeocodeResult, PaymentConfig, SessionUser, format};
use std::time::Duration;

pub const OBJECTIVE_OPTIONS: [&str; 6] = [
    "Carbon Offset",
    "Corporate CSR",
    "Memorial Plantation",
    "Gift a Tree",
    "Biodiversity Support",
    "Other",
];
/// Selecting this objective requires free text.
pub const CUSTOM_OBJECTIVE: &str = "Other";

pub const PAYMENT_SUCCESS_MESSAGE: &str =
    "Payment successful. Your donation is confirmed and admin has been notified.";
pub const PAYMENT_DISMISSED_MESSAGE: &str = "Payment was cancelled before completion.";
/// Pause between the success message and the jump to the dashboard.
pub const DASHBOARD_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

const MERCHANT_NAME: &str = "Go Green";
const THEME_COLOR: &str = "#059669";

/// Donation form state.
#[derive(Debug, Clone, PartialEq)]
pub struct DonationDraft {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub number_of_trees: String,
    pub tree_species: String,
    pub planting_location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub objective: String,
    pub custom_objective: String,
    pub dedication_name: String,
    pub notes: String,
}

impl Default for DonationDraft {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            number_of_trees: "1".to_string(),
            tree_species: String::new(),
            planting_location: String::new(),
            latitude: None,
            longitude: None,
            objective: OBJECTIVE_OPTIONS[0].to_string(),
            custom_objective: String::new(),
            dedication_name: String::new(),
            notes: String::new(),
        }
    }
}

impl DonationDraft {
    /// Blank form with the donor's contact details filled in.
    pub fn for_user(user: Option<&SessionUser>) -> Self {
        let mut draft = Self::default();
        if let Some(user) = user {
            draft.full_name = user.full_name.clone();
            draft.email = user.email.clone();
            draft.phone = user.phone.clone();
        }
        draft
    }

    /// Free typing invalidates any previously chosen coordinates.
    pub fn set_location_text(&mut self, text: &str) {
        self.planting_location = text.to_string();
        self.latitude = None;
        self.longitude = None;
    }

    pub fn select_location(&mut self, place: &GeocodeResult) {
        self.planting_location = place.place_name.clone();
        self.latitude = place.latitude;
        self.longitude = place.longitude;
    }

    pub fn trees(&self) -> u32 {
        self.number_of_trees.trim().parse().unwrap_or(0)
    }

    pub fn estimated_total_inr(&self, tree_price_inr: u32) -> u64 {
        u64::from(self.trees()) * u64::from(tree_price_inr)
    }

    pub fn objective_text(&self) -> String {
        if self.objective == CUSTOM_OBJECTIVE {
            self.custom_objective.trim().to_string()
        } else {
            self.objective.clone()
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    pub fn selected_map_url(&self) -> Option<String> {
        self.coordinates()
            .map(|(lat, lng)| format::map_search_url(lat, lng))
    }

    /// Builds the order intent, or the message explaining why it can't be sent.
    pub fn validate(&self) -> ApiResult<CreateOrderRequest> {
        let objective = self.objective_text();
        if objective.is_empty() {
            return Err(ApiError::validation("Please enter the objective."));
        }

        let Some((latitude, longitude)) = self.coordinates() else {
            return Err(ApiError::validation(
                "Please choose a location from the map suggestions.",
            ));
        };

        let number_of_trees = self.trees();
        if number_of_trees == 0 {
            return Err(ApiError::validation("Please enter at least one tree."));
        }

        Ok(CreateOrderRequest {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            number_of_trees,
            tree_species: self.tree_species.clone(),
            planting_location: self.planting_location.clone(),
            latitude,
            longitude,
            objective,
            dedication_name: self.dedication_name.clone(),
            notes: self.notes.clone(),
        })
    }
}

/// Everything the payment widget needs to open.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutIntent {
    pub key: String,
    pub amount_paise: u64,
    pub currency: String,
    pub order_id: String,
    pub name: String,
    pub description: String,
    pub prefill_name: String,
    pub prefill_email: String,
    pub prefill_contact: String,
    pub location: String,
    pub objective: String,
    pub theme_color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    Paid(PaymentConfirmation),
    /// The donor closed the widget.
    Dismissed,
}

/// Third-party payment widget.
#[async_trait::async_trait(?Send)]
pub trait CheckoutGateway {
    async fn open(&self, intent: CheckoutIntent) -> ApiResult<CheckoutOutcome>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonationReceipt {
    pub message: String,
    pub verified: PaymentVerified,
}

/// Runs the full checkout for one submitted form.
pub async fn donate<T: Transport, G: CheckoutGateway>(
    api: &GoGreenApi<T>,
    gateway: &G,
    draft: &DonationDraft,
    config: &PaymentConfig,
) -> ApiResult<DonationReceipt> {
    let order = draft.validate()?;

    let created = api.call(&order).await?;
    log::info!("Payment order {} created", created.order_id);

    let intent = CheckoutIntent {
        key: created
            .razorpay_key_id
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| config.razorpay_key_id.clone()),
        amount_paise: created.amount_paise,
        currency: created
            .currency
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| config.currency.clone()),
        order_id: created.order_id,
        name: MERCHANT_NAME.to_string(),
        description: format!("{} Tree Donation", order.number_of_trees),
        prefill_name: order.full_name.clone(),
        prefill_email: order.email.clone(),
        prefill_contact: order.phone.clone(),
        location: order.planting_location.clone(),
        objective: order.objective.clone(),
        theme_color: THEME_COLOR.to_string(),
    };

    let confirmation = match gateway.open(intent).await? {
        CheckoutOutcome::Paid(confirmation) => confirmation,
        CheckoutOutcome::Dismissed => {
            log::info!("Checkout dismissed");
            return Err(ApiError::checkout(PAYMENT_DISMISSED_MESSAGE));
        }
    };

    let verified = api.call(&confirmation).await?;
    Ok(DonationReceipt {
        message: PAYMENT_SUCCESS_MESSAGE.to_string(),
        verified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::web::http::tests::MockTransport;
    use gogreen_shared::protocol::{HttpMethod, RequestBody};
    use serde_json::json;
    use std::cell::RefCell;

    const CREATE_URL: &str = "http://api.test/api/trees/create-order/";
    const VERIFY_URL: &str = "http://api.test/api/trees/verify-payment/";

    /// Scripted payment widget.
    struct MockGateway {
        outcome: ApiResult<CheckoutOutcome>,
        opened: RefCell<Vec<CheckoutIntent>>,
    }

    impl MockGateway {
        fn new(outcome: ApiResult<CheckoutOutcome>) -> Self {
            Self {
                outcome,
                opened: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait(?Send)]
    impl CheckoutGateway for MockGateway {
        async fn open(&self, intent: CheckoutIntent) -> ApiResult<CheckoutOutcome> {
            self.opened.borrow_mut().push(intent);
            self.outcome.clone()
        }
    }

    fn paid() -> CheckoutOutcome {
        CheckoutOutcome::Paid(PaymentConfirmation {
            razorpay_order_id: "order_1".into(),
            razorpay_payment_id: "pay_1".into(),
            razorpay_signature: "sig".into(),
        })
    }

    fn api() -> (GoGreenApi<MockTransport>, MockTransport) {
        let mock = MockTransport::new();
        (
            GoGreenApi::with_transport(ApiConfig::new("http://api.test"), mock.clone()),
            mock,
        )
    }

    fn ready_draft() -> DonationDraft {
        let user = SessionUser {
            id: Some(1),
            full_name: "Asha".into(),
            email: "asha@example.com".into(),
            phone: "98450".into(),
            avatar: None,
            is_verified: Some(true),
        };
        let mut draft = DonationDraft::for_user(Some(&user));
        draft.number_of_trees = "3".into();
        draft.select_location(&GeocodeResult {
            place_name: "Pune, Maharashtra".into(),
            latitude: Some(18.52),
            longitude: Some(73.85),
        });
        draft
    }

    fn mock_created(mock: &MockTransport) {
        mock.mock_response(
            HttpMethod::Post,
            CREATE_URL,
            201,
            json!({
                "order_id": "order_1",
                "amount_paise": 29700,
                "currency": "INR",
                "razorpay_key_id": "rzp_test_key",
                "donation_id": 5
            }),
        );
    }

    #[test]
    fn test_typing_clears_coordinates() {
        let mut draft = ready_draft();
        assert!(draft.coordinates().is_some());

        draft.set_location_text("Pune West");
        assert_eq!(draft.coordinates(), None);
        assert_eq!(draft.planting_location, "Pune West");
    }

    #[test]
    fn test_estimated_total() {
        let draft = ready_draft();
        assert_eq!(draft.estimated_total_inr(99), 297);

        let blank = DonationDraft {
            number_of_trees: "abc".into(),
            ..DonationDraft::default()
        };
        assert_eq!(blank.estimated_total_inr(99), 0);
    }

    #[test]
    fn test_custom_objective_required() {
        let mut draft = ready_draft();
        draft.objective = CUSTOM_OBJECTIVE.into();
        draft.custom_objective = "   ".into();
        assert_eq!(
            draft.validate().unwrap_err(),
            ApiError::validation("Please enter the objective.")
        );

        draft.custom_objective = " School campus ".into();
        assert_eq!(draft.validate().unwrap().objective, "School campus");
    }

    #[tokio::test]
    async fn test_missing_coordinates_block_submission() {
        let (api, mock) = api();
        let gateway = MockGateway::new(Ok(paid()));
        let mut draft = ready_draft();
        draft.set_location_text("Somewhere typed by hand");

        let err = donate(&api, &gateway, &draft, &PaymentConfig::default())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ApiError::validation("Please choose a location from the map suggestions.")
        );
        assert_eq!(mock.request_count(), 0);
        assert!(gateway.opened.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_never_opens_widget() {
        let (api, mock) = api();
        mock.mock_response(
            HttpMethod::Post,
            CREATE_URL,
            400,
            json!({"error": "Razorpay keys are not configured"}),
        );
        let gateway = MockGateway::new(Ok(paid()));

        let err = donate(&api, &gateway, &ready_draft(), &PaymentConfig::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Razorpay keys are not configured");
        assert!(gateway.opened.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_dismissed_widget_skips_verification() {
        let (api, mock) = api();
        mock_created(&mock);
        let gateway = MockGateway::new(Ok(CheckoutOutcome::Dismissed));

        let err = donate(&api, &gateway, &ready_draft(), &PaymentConfig::default())
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::checkout(PAYMENT_DISMISSED_MESSAGE));
        assert_eq!(mock.count_for(HttpMethod::Post, VERIFY_URL), 0);
    }

    #[tokio::test]
    async fn test_script_failure_is_reported() {
        let (api, mock) = api();
        mock_created(&mock);
        let gateway = MockGateway::new(Err(ApiError::checkout("Unable to load Razorpay checkout")));

        let err = donate(&api, &gateway, &ready_draft(), &PaymentConfig::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Unable to load Razorpay checkout");
        assert_eq!(mock.count_for(HttpMethod::Post, VERIFY_URL), 0);
    }

    #[tokio::test]
    async fn test_successful_payment_is_verified() {
        let (api, mock) = api();
        mock_created(&mock);
        mock.mock_response(
            HttpMethod::Post,
            VERIFY_URL,
            200,
            json!({"message": "Payment verified", "donation_id": 5}),
        );
        let gateway = MockGateway::new(Ok(paid()));
        let config = PaymentConfig {
            razorpay_key_id: "fallback".into(),
            ..PaymentConfig::default()
        };

        let receipt = donate(&api, &gateway, &ready_draft(), &config).await.unwrap();

        assert_eq!(receipt.message, PAYMENT_SUCCESS_MESSAGE);
        assert_eq!(receipt.verified.donation_id, Some(5));

        let intent = gateway.opened.borrow()[0].clone();
        assert_eq!(intent.key, "rzp_test_key");
        assert_eq!(intent.amount_paise, 29700);
        assert_eq!(intent.description, "3 Tree Donation");

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        let RequestBody::Json(body) = &requests[1].body else {
            panic!("verification must be json");
        };
        assert!(body.contains("\"razorpay_payment_id\":\"pay_1\""));
    }

    #[tokio::test]
    async fn test_rejected_verification_surfaces_message() {
        let (api, mock) = api();
        mock_created(&mock);
        mock.mock_response(
            HttpMethod::Post,
            VERIFY_URL,
            400,
            json!({"error": "Invalid payment signature"}),
        );
        let gateway = MockGateway::new(Ok(paid()));

        let err = donate(&api, &gateway, &ready_draft(), &PaymentConfig::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid payment signature");
    }
}
