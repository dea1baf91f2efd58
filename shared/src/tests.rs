use super::*;
use serde_json::json;

fn order(trees: u32, status: &str, paise: u64) -> Order {
    Order {
        number_of_trees: trees,
        payment_status: status.to_string(),
        amount_paise: paise,
        ..Order::default()
    }
}

// =========================================================
// Session
// =========================================================

#[test]
fn test_session_user_roundtrip_preserves_optional_fields() {
    let user = SessionUser {
        id: Some(4),
        full_name: "Asha Mehta".into(),
        email: "asha@example.com".into(),
        phone: "9845012345".into(),
        avatar: None,
        is_verified: Some(true),
    };

    let text = serde_json::to_string(&user).unwrap();
    assert!(!text.contains("avatar"));
    let back: SessionUser = serde_json::from_str(&text).unwrap();
    assert_eq!(back, user);
}

#[test]
fn test_session_user_from_server_payload() {
    let user: SessionUser = serde_json::from_value(json!({
        "id": 9,
        "full_name": "Ravi",
        "email": "ravi@example.com",
        "phone": "1",
        "avatar": null,
        "is_verified": true
    }))
    .unwrap();

    assert_eq!(user.avatar, None);
    assert!(user.avatar_url().starts_with("https://ui-avatars.com/api/?name=Ravi"));
}

// =========================================================
// Order aggregates
// =========================================================

#[test]
fn test_total_trees_sums_all_orders() {
    let orders = vec![
        order(3, "paid", 0),
        order(5, "created", 0),
        order(2, "failed", 0),
    ];
    assert_eq!(OrderTotals::from_orders(&orders).total_trees, 10);
}

#[test]
fn test_total_spent_counts_paid_orders_only() {
    let orders = vec![
        order(1, "paid", 9900),
        order(1, "paid", 4950),
        order(4, "created", 39600),
    ];
    let totals = OrderTotals::from_orders(&orders);
    assert_eq!(totals.total_paid_paise, 14850);
    assert_eq!(totals.total_spent_inr(), "148.50");
}

#[test]
fn test_totals_of_empty_list() {
    let totals = OrderTotals::from_orders(&[]);
    assert_eq!(totals.total_trees, 0);
    assert_eq!(totals.total_spent_inr(), "0.00");
}

#[test]
fn test_order_link_fallbacks() {
    let mut o = Order {
        tracking_token: "tok123".into(),
        ..Order::default()
    };
    assert_eq!(o.tracking_link("https://green.example/"), "https://green.example/track/tok123");
    assert_eq!(o.hero_image(), PLANTATION_FALLBACK_IMAGE);
    assert_eq!(o.map_link(), None);
    assert_eq!(o.display_approval_status(), "PENDING");

    o.tracking_url = Some("https://api.example/track/tok123".into());
    o.approval_details.proof_image_2_url = Some("https://img/2.jpg".into());
    o.user_order_details.requested_map_url = Some("https://map/req".into());
    assert_eq!(o.tracking_link("ignored"), "https://api.example/track/tok123");
    assert_eq!(o.hero_image(), "https://img/2.jpg");
    assert_eq!(o.map_link(), Some("https://map/req"));
}

#[test]
fn test_hero_image_skips_blank_first_proof() {
    let mut o = Order::default();
    o.approval_details.proof_image_1_url = Some(String::new());
    o.approval_details.proof_image_2_url = Some("https://cdn/p2.jpg".into());
    assert_eq!(o.hero_image(), "https://cdn/p2.jpg");

    o.approval_details.proof_image_1_url = Some("https://cdn/p1.jpg".into());
    assert_eq!(o.hero_image(), "https://cdn/p1.jpg");

    o.approval_details.proof_image_2_url = Some(String::new());
    o.approval_details.proof_image_1_url = None;
    assert_eq!(o.hero_image(), PLANTATION_FALLBACK_IMAGE);
}

#[test]
fn test_trees_planted_prefers_admin_count() {
    let mut o = order(6, "paid", 0);
    assert_eq!(o.trees_planted(), 6);
    o.approval_details.trees_planted_count = Some(5);
    assert_eq!(o.trees_planted(), 5);
}

// =========================================================
// Reviews and configuration
// =========================================================

#[test]
fn test_review_summary_percentages() {
    let summary: ReviewSummary = serde_json::from_value(json!({
        "average_rating": 4.5,
        "total_reviews": 4,
        "rating_breakdown": {"5": 2, "4": 2}
    }))
    .unwrap();

    assert_eq!(summary.percent_for(5), 50);
    assert_eq!(summary.percent_for(1), 0);
    assert_eq!(ReviewSummary::default().percent_for(3), 0);
    assert_eq!(ReviewSummary::default().rating_breakdown.len(), 5);
}

#[test]
fn test_payment_config_normalized() {
    let config: PaymentConfig = serde_json::from_value(json!({
        "razorpay_key_id": "rzp_test",
        "tree_price_inr": 0,
        "currency": ""
    }))
    .unwrap();

    let config = config.normalized();
    assert_eq!(config.tree_price_inr, DEFAULT_TREE_PRICE_INR);
    assert_eq!(config.currency, "INR");
    assert_eq!(config.razorpay_key_id, "rzp_test");
}

#[test]
fn test_support_whatsapp_link() {
    let info = SupportInfo {
        whatsapp_number: "+91 98450 12345".into(),
        ..SupportInfo::default()
    };
    assert_eq!(info.whatsapp_link().as_deref(), Some("https://wa.me/919845012345"));
    assert_eq!(SupportInfo::default().whatsapp_link(), None);
}
