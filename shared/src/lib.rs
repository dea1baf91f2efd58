use serde::{Deserialize, Serialize};

pub mod date;
pub mod error;
pub mod format;
pub mod impact;
pub mod protocol;

pub use error::{ApiError, ApiResult};

// =========================================================
// Constants
// =========================================================

/// Browser storage key holding the serialized session record.
pub const SESSION_STORAGE_KEY: &str = "gogreen_user";
pub const USERS_API_PATH: &str = "/api/users";
pub const TREES_API_PATH: &str = "/api/trees";
pub const PAYMENT_STATUS_PAID: &str = "paid";
pub const DEFAULT_TREE_PRICE_INR: u32 = 99;
pub const DEFAULT_CURRENCY: &str = "INR";
pub const DEFAULT_COUNTRY: &str = "IN";
pub const PLANTATION_FALLBACK_IMAGE: &str = "https://images.unsplash.com/photo-1511497584788-876760111969?auto=format&fit=crop&w=1200&q=80";

// =========================================================
// Session
// =========================================================

/// The locally cached "who is logged in" record.
///
/// This is not a server-validated token; it is whatever the backend returned on
/// the last successful login, OTP verification or profile sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}

impl SessionUser {
    /// Avatar URL, falling back to a generated initials image.
    pub fn avatar_url(&self) -> String {
        match self.avatar.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => format::fallback_avatar_url(&self.full_name),
        }
    }

    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            "User"
        } else {
            &self.full_name
        }
    }
}

// =========================================================
// Orders
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalDetails {
    pub approval_status: Option<String>,
    pub approved_at: Option<String>,
    pub planted_location: Option<String>,
    pub planted_latitude: Option<f64>,
    pub planted_longitude: Option<f64>,
    pub planted_map_url: Option<String>,
    pub planted_map_live_url: Option<String>,
    pub planted_map_image_url: Option<String>,
    pub plantation_date: Option<String>,
    pub trees_planted_count: Option<u32>,
    pub plantation_update: Option<String>,
    pub thank_you_note: Option<String>,
    pub proof_image_1_url: Option<String>,
    pub proof_image_2_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserOrderDetails {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub number_of_trees: Option<u32>,
    pub tree_species: Option<String>,
    pub planting_location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub requested_map_url: Option<String>,
    pub requested_map_live_url: Option<String>,
    pub requested_map_image_url: Option<String>,
    pub objective: Option<String>,
    pub dedication_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
    pub amount_paise: Option<u64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderImpact {
    pub carbon_offset_kg_per_year: f64,
    pub trees_counted: Option<u32>,
    pub unit: Option<String>,
}

/// Client projection of one server-owned donation.
///
/// Values are displayed verbatim; the only client-side derivations are the
/// aggregates in [`OrderTotals`] and link/image fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub number_of_trees: u32,
    pub tree_species: String,
    pub planting_location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub objective: String,
    pub dedication_name: String,
    pub notes: String,
    pub amount_paise: u64,
    pub currency: String,
    pub payment_status: String,
    pub approval_status: String,
    pub created_at: Option<String>,
    pub paid_at: Option<String>,
    pub approved_at: Option<String>,
    pub tracking_token: String,
    pub tracking_url: Option<String>,
    pub certificate_url: Option<String>,
    pub approval_details: ApprovalDetails,
    pub user_order_details: UserOrderDetails,
    pub impact: OrderImpact,
}

impl Order {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PAYMENT_STATUS_PAID
    }

    /// First proof image supplied by the admin, else a stock plantation photo.
    pub fn hero_image(&self) -> &str {
        let proof = &self.approval_details;
        [&proof.proof_image_1_url, &proof.proof_image_2_url]
            .into_iter()
            .filter_map(|url| url.as_deref())
            .find(|url| !url.is_empty())
            .unwrap_or(PLANTATION_FALLBACK_IMAGE)
    }

    /// Public tracking URL; built from the page origin when the server omits it.
    pub fn tracking_link(&self, origin: &str) -> String {
        match self.tracking_url.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("{}/track/{}", origin.trim_end_matches('/'), self.tracking_token),
        }
    }

    /// Best map link: the planted site once approved, else the requested site.
    pub fn map_link(&self) -> Option<&str> {
        self.approval_details
            .planted_map_url
            .as_deref()
            .or(self.user_order_details.requested_map_url.as_deref())
            .filter(|url| !url.is_empty())
    }

    pub fn display_approval_status(&self) -> String {
        self.approval_details
            .approval_status
            .as_deref()
            .unwrap_or("pending")
            .to_uppercase()
    }

    pub fn trees_planted(&self) -> u32 {
        self.approval_details
            .trees_planted_count
            .filter(|count| *count > 0)
            .unwrap_or(self.number_of_trees)
    }
}

/// Server-computed counters returned alongside the order list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderSummary {
    pub total_orders: u32,
    pub completed_orders: u32,
    pub pending_orders: u32,
    pub rejected_orders: u32,
    pub unpaid_orders: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderList {
    pub orders: Vec<Order>,
    pub summary: OrderSummary,
}

/// Aggregates computed over the locally loaded order list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderTotals {
    pub total_trees: u64,
    pub total_paid_paise: u64,
}

impl OrderTotals {
    pub fn from_orders(orders: &[Order]) -> Self {
        orders.iter().fold(Self::default(), |mut acc, order| {
            acc.total_trees += u64::from(order.number_of_trees);
            if order.is_paid() {
                acc.total_paid_paise += order.amount_paise;
            }
            acc
        })
    }

    /// Paid total in rupees with two decimals, e.g. `"148.50"`.
    pub fn total_spent_inr(&self) -> String {
        format::paise_to_rupees(self.total_paid_paise)
    }
}

// =========================================================
// Reviews
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    pub id: u64,
    pub user_id: Option<u64>,
    pub full_name: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub rating: u8,
    pub review_text: String,
    pub is_public: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSummary {
    pub average_rating: f64,
    pub total_reviews: u32,
    pub rating_breakdown: std::collections::BTreeMap<String, u32>,
}

impl Default for ReviewSummary {
    fn default() -> Self {
        Self {
            average_rating: 0.0,
            total_reviews: 0,
            rating_breakdown: (1..=5).map(|star| (star.to_string(), 0)).collect(),
        }
    }
}

impl ReviewSummary {
    pub fn count_for(&self, stars: u8) -> u32 {
        self.rating_breakdown
            .get(&stars.to_string())
            .copied()
            .unwrap_or(0)
    }

    /// Share of reviews with the given star count, in whole percent.
    pub fn percent_for(&self, stars: u8) -> u32 {
        if self.total_reviews == 0 {
            return 0;
        }
        self.count_for(stars) * 100 / self.total_reviews
    }
}

// =========================================================
// Payments & geocoding
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    pub razorpay_key_id: String,
    pub tree_price_inr: u32,
    pub currency: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            razorpay_key_id: String::new(),
            tree_price_inr: DEFAULT_TREE_PRICE_INR,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl PaymentConfig {
    /// Server values with zero/blank fields replaced by the defaults.
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        Self {
            razorpay_key_id: self.razorpay_key_id,
            tree_price_inr: if self.tree_price_inr == 0 {
                defaults.tree_price_inr
            } else {
                self.tree_price_inr
            },
            currency: if self.currency.is_empty() {
                defaults.currency
            } else {
                self.currency
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeResult {
    pub place_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportInfo {
    pub support_email: String,
    pub whatsapp_number: String,
    pub whatsapp_display: String,
}

impl SupportInfo {
    pub fn whatsapp_link(&self) -> Option<String> {
        let digits: String = self
            .whatsapp_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        (!digits.is_empty()).then(|| format!("https://wa.me/{digits}"))
    }
}

#[cfg(test)]
mod tests;
