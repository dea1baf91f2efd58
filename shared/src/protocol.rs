use crate::error::{ApiError, ApiResult, extract_error_message, parse_body};
use crate::impact::PublicImpactResponse;
use crate::{
    GeocodeResult, Order, OrderList, PaymentConfig, Review, ReviewSummary, SessionUser,
    SupportInfo, TREES_API_PATH, USERS_API_PATH,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// The two REST resource groups of the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Users,
    Trees,
}

impl Resource {
    pub fn base_path(&self) -> &'static str {
        match self {
            Resource::Users => USERS_API_PATH,
            Resource::Trees => TREES_API_PATH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    Json,
    /// multipart/form-data; every scalar field becomes a text part.
    Multipart,
}

/// Serialized request payload, independent of the browser API that sends it.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(String),
    Form(Vec<(String, String)>),
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    const RESOURCE: Resource;
    const METHOD: HttpMethod;
    const ENCODING: BodyEncoding = BodyEncoding::Json;
    /// Message shown when the server gives no usable error of its own.
    const FALLBACK_ERROR: &'static str;

    /// Path below the resource base, with a trailing slash.
    fn path(&self) -> String;

    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// `{resource base}{path}?{query}` relative to the API host.
pub fn relative_url<R: ApiRequest>(req: &R) -> String {
    let mut url = format!("{}/{}", R::RESOURCE.base_path(), req.path());
    let query = req.query();
    if !query.is_empty() {
        let encoded: Vec<String> = query
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect();
        url.push('?');
        url.push_str(&encoded.join("&"));
    }
    url
}

fn form_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

pub fn encode_body<R: ApiRequest>(req: &R) -> ApiResult<RequestBody> {
    if !R::METHOD.carries_body() {
        return Ok(RequestBody::Empty);
    }

    match R::ENCODING {
        BodyEncoding::Json => serde_json::to_string(req)
            .map(RequestBody::Json)
            .map_err(|e| ApiError::Encoding(e.to_string())),
        BodyEncoding::Multipart => {
            let value = serde_json::to_value(req).map_err(|e| ApiError::Encoding(e.to_string()))?;
            let Value::Object(map) = value else {
                return Err(ApiError::Encoding("form body must be an object".to_string()));
            };
            Ok(RequestBody::Form(
                map.into_iter()
                    .filter_map(|(key, value)| form_value(&value).map(|v| (key, v)))
                    .collect(),
            ))
        }
    }
}

/// Maps `(status, raw body)` to the typed response or a user-facing error.
pub fn decode_response<R: ApiRequest>(status: u16, raw: &str) -> ApiResult<R::Response> {
    let body = parse_body(raw, R::FALLBACK_ERROR)?;

    if !(200..300).contains(&status) {
        let message =
            extract_error_message(&body).unwrap_or_else(|| R::FALLBACK_ERROR.to_string());
        return Err(ApiError::Status { status, message });
    }

    serde_json::from_value(body).map_err(|_| ApiError::MalformedBody(R::FALLBACK_ERROR.to_string()))
}

// =========================================================
// Shared response shapes
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageResponse {
    pub message: Option<String>,
}

/// Login, OTP verification and profile responses all carry the user record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserResponse {
    pub message: Option<String>,
    pub user: Option<SessionUser>,
}

// =========================================================
// Users
// =========================================================

/// Register a new account. Sent as multipart so an avatar can ride along.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterResponse {
    pub message: Option<String>,
    pub email: Option<String>,
}

impl ApiRequest for RegisterRequest {
    type Response = RegisterResponse;
    const RESOURCE: Resource = Resource::Users;
    const METHOD: HttpMethod = HttpMethod::Post;
    const ENCODING: BodyEncoding = BodyEncoding::Multipart;
    const FALLBACK_ERROR: &'static str = "Registration failed";

    fn path(&self) -> String {
        "register/".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = UserResponse;
    const RESOURCE: Resource = Resource::Users;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK_ERROR: &'static str = "Login failed";

    fn path(&self) -> String {
        "login/".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

impl ApiRequest for VerifyOtpRequest {
    type Response = UserResponse;
    const RESOURCE: Resource = Resource::Users;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK_ERROR: &'static str = "OTP verification failed";

    fn path(&self) -> String {
        "verify-otp/".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResendOtpRequest {
    pub email: String,
}

impl ApiRequest for ResendOtpRequest {
    type Response = MessageResponse;
    const RESOURCE: Resource = Resource::Users;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK_ERROR: &'static str = "Unable to resend OTP";

    fn path(&self) -> String {
        "resend-otp/".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileQuery {
    pub email: String,
}

impl ApiRequest for ProfileQuery {
    type Response = UserResponse;
    const RESOURCE: Resource = Resource::Users;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK_ERROR: &'static str = "Unable to load profile";

    fn path(&self) -> String {
        "profile/".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("email", self.email.clone())]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub email: String,
    pub full_name: String,
    pub phone: String,
}

impl ApiRequest for ProfileUpdate {
    type Response = UserResponse;
    const RESOURCE: Resource = Resource::Users;
    const METHOD: HttpMethod = HttpMethod::Post;
    const ENCODING: BodyEncoding = BodyEncoding::Multipart;
    const FALLBACK_ERROR: &'static str = "Unable to update profile";

    fn path(&self) -> String {
        "profile/".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SupportInfoQuery;

impl ApiRequest for SupportInfoQuery {
    type Response = SupportInfo;
    const RESOURCE: Resource = Resource::Users;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK_ERROR: &'static str = "Unable to load support details";

    fn path(&self) -> String {
        "support/".to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupportTicket {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl SupportTicket {
    /// Rejects tickets the backend would refuse, before any request is sent.
    pub fn validate(&self) -> ApiResult<()> {
        if self.email.trim().is_empty() {
            return Err(ApiError::validation("Please login again to contact support."));
        }
        if self.message.trim().is_empty() {
            return Err(ApiError::validation("Please describe how we can help."));
        }
        Ok(())
    }
}

impl ApiRequest for SupportTicket {
    type Response = MessageResponse;
    const RESOURCE: Resource = Resource::Users;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK_ERROR: &'static str = "Unable to send support request";

    fn path(&self) -> String {
        "support/".to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewsQuery {
    /// When set, the response includes this user's own review.
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewsResponse {
    pub summary: ReviewSummary,
    pub reviews: Vec<Review>,
    pub current_user_review: Option<Review>,
}

impl ApiRequest for ReviewsQuery {
    type Response = ReviewsResponse;
    const RESOURCE: Resource = Resource::Users;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK_ERROR: &'static str = "Unable to load community reviews";

    fn path(&self) -> String {
        "reviews/".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        self.email
            .iter()
            .filter(|email| !email.is_empty())
            .map(|email| ("email", email.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitReview {
    pub email: String,
    pub full_name: String,
    pub rating: u8,
    pub review_text: String,
}

impl SubmitReview {
    pub fn validate(&self) -> ApiResult<()> {
        if !(1..=5).contains(&self.rating) {
            return Err(ApiError::validation("Rating must be between 1 and 5."));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSubmitted {
    pub message: Option<String>,
    pub review: Option<Review>,
}

impl ApiRequest for SubmitReview {
    type Response = ReviewSubmitted;
    const RESOURCE: Resource = Resource::Users;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK_ERROR: &'static str = "Unable to submit review";

    fn path(&self) -> String {
        "reviews/".to_string()
    }
}

// =========================================================
// Trees
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentConfigQuery;

impl ApiRequest for PaymentConfigQuery {
    type Response = PaymentConfig;
    const RESOURCE: Resource = Resource::Trees;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK_ERROR: &'static str = "Unable to load payment config";

    fn path(&self) -> String {
        "config/".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeQuery {
    pub q: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeResponse {
    pub results: Vec<GeocodeResult>,
}

impl ApiRequest for GeocodeQuery {
    type Response = GeocodeResponse;
    const RESOURCE: Resource = Resource::Trees;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK_ERROR: &'static str = "Unable to fetch locations";

    fn path(&self) -> String {
        "geocode/".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("q", self.q.clone()), ("country", self.country.clone())]
    }
}

/// Phase one of checkout: the order intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub number_of_trees: u32,
    pub tree_species: String,
    pub planting_location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub objective: String,
    pub dedication_name: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateOrderResponse {
    pub message: Option<String>,
    pub order_id: String,
    pub amount_paise: u64,
    pub currency: Option<String>,
    pub razorpay_key_id: Option<String>,
    pub donation_id: Option<u64>,
    pub tree_price_inr: Option<u32>,
}

impl ApiRequest for CreateOrderRequest {
    type Response = CreateOrderResponse;
    const RESOURCE: Resource = Resource::Trees;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK_ERROR: &'static str = "Unable to create payment order";

    fn path(&self) -> String {
        "create-order/".to_string()
    }
}

/// Payload the checkout widget hands back after a successful payment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentVerified {
    pub message: Option<String>,
    pub donation_id: Option<u64>,
}

impl ApiRequest for PaymentConfirmation {
    type Response = PaymentVerified;
    const RESOURCE: Resource = Resource::Trees;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK_ERROR: &'static str = "Payment verification failed";

    fn path(&self) -> String {
        "verify-payment/".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersQuery {
    pub email: String,
}

impl ApiRequest for OrdersQuery {
    type Response = OrderList;
    const RESOURCE: Resource = Resource::Trees;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK_ERROR: &'static str = "Unable to load orders";

    fn path(&self) -> String {
        "orders/".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("email", self.email.clone())]
    }
}

/// Full-record replacement of an order's editable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(skip)]
    pub id: u64,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub number_of_trees: u32,
    pub tree_species: String,
    pub planting_location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub objective: String,
    pub dedication_name: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderUpdated {
    pub message: Option<String>,
    pub order: Option<Order>,
}

impl ApiRequest for OrderUpdate {
    type Response = OrderUpdated;
    const RESOURCE: Resource = Resource::Trees;
    const METHOD: HttpMethod = HttpMethod::Put;
    const FALLBACK_ERROR: &'static str = "Unable to update order";

    fn path(&self) -> String {
        format!("orders/{}/", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteOrder {
    pub id: u64,
    pub email: String,
}

impl ApiRequest for DeleteOrder {
    type Response = MessageResponse;
    const RESOURCE: Resource = Resource::Trees;
    const METHOD: HttpMethod = HttpMethod::Delete;
    const FALLBACK_ERROR: &'static str = "Unable to delete order";

    fn path(&self) -> String {
        format!("orders/{}/", self.id)
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("email", self.email.clone())]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackQuery {
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingResponse {
    pub order: Option<Order>,
}

impl ApiRequest for TrackQuery {
    type Response = TrackingResponse;
    const RESOURCE: Resource = Resource::Trees;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK_ERROR: &'static str = "Unable to load tracking details";

    fn path(&self) -> String {
        format!("track/{}/", urlencoding::encode(&self.token))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublicImpactQuery;

impl ApiRequest for PublicImpactQuery {
    type Response = PublicImpactResponse;
    const RESOURCE: Resource = Resource::Trees;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK_ERROR: &'static str = "Unable to load impact metrics";

    fn path(&self) -> String {
        "public-impact/".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_relative_url_with_encoded_query() {
        let req = OrdersQuery {
            email: "asha+trees@example.com".to_string(),
        };
        assert_eq!(
            relative_url(&req),
            "/api/trees/orders/?email=asha%2Btrees%40example.com"
        );

        let req = DeleteOrder {
            id: 12,
            email: "a@b.in".to_string(),
        };
        assert_eq!(relative_url(&req), "/api/trees/orders/12/?email=a%40b.in");
    }

    #[test]
    fn test_reviews_query_omits_blank_email() {
        assert_eq!(relative_url(&ReviewsQuery::default()), "/api/users/reviews/");
        let req = ReviewsQuery {
            email: Some("x@y.in".into()),
        };
        assert_eq!(relative_url(&req), "/api/users/reviews/?email=x%40y.in");
    }

    #[test]
    fn test_get_requests_have_no_body() {
        let body = encode_body(&ProfileQuery {
            email: "x@y.in".into(),
        })
        .unwrap();
        assert_eq!(body, RequestBody::Empty);
    }

    #[test]
    fn test_multipart_fields_are_text() {
        let body = encode_body(&RegisterRequest {
            full_name: "Asha".into(),
            email: "asha@example.com".into(),
            phone: "98450".into(),
            password: "secret".into(),
        })
        .unwrap();

        let RequestBody::Form(fields) = body else {
            panic!("expected a form body");
        };
        assert!(fields.contains(&("email".to_string(), "asha@example.com".to_string())));
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn test_order_update_skips_id_in_body() {
        let update = OrderUpdate {
            id: 7,
            email: "a@b.in".into(),
            full_name: "A".into(),
            phone: "1".into(),
            number_of_trees: 3,
            tree_species: "Neem".into(),
            planting_location: "Pune".into(),
            latitude: None,
            longitude: Some(73.85),
            objective: "Carbon Offset".into(),
            dedication_name: String::new(),
            notes: String::new(),
        };
        assert_eq!(relative_url(&update), "/api/trees/orders/7/");

        let RequestBody::Json(json_body) = encode_body(&update).unwrap() else {
            panic!("expected a json body");
        };
        let value: Value = serde_json::from_str(&json_body).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["latitude"], Value::Null);
        assert_eq!(value["number_of_trees"], json!(3));
    }

    #[test]
    fn test_decode_error_status_uses_server_message() {
        let err = decode_response::<LoginRequest>(401, r#"{"error":"Invalid email or password"}"#)
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 401,
                message: "Invalid email or password".into()
            }
        );

        let err = decode_response::<LoginRequest>(500, "{}").unwrap_err();
        assert_eq!(err.to_string(), "Login failed");
    }

    #[test]
    fn test_decode_success() {
        let raw = r#"{"orders":[{"id":1,"number_of_trees":3,"payment_status":"paid","amount_paise":29700}],"summary":{"total_orders":1}}"#;
        let list = decode_response::<OrdersQuery>(200, raw).unwrap();
        assert_eq!(list.orders.len(), 1);
        assert_eq!(list.summary.total_orders, 1);
        assert_eq!(list.summary.pending_orders, 0);
    }

    #[test]
    fn test_decode_wrong_shape_is_malformed() {
        let err = decode_response::<OrdersQuery>(200, r#"{"orders": "nope"}"#).unwrap_err();
        assert_eq!(err, ApiError::MalformedBody("Unable to load orders".into()));
    }
}
