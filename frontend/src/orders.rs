//! Order list sync.
//!
//! The dashboard never patches its cached list: every successful edit or delete
//! is followed by a fresh list request, so what is shown is always the server's
//! latest view.

use crate::api::GoGreenApi;
use crate::sync::{RequestGuard, Ticket};
use crate::web::http::{FetchTransport, Transport};
use gogreen_shared::protocol::{DeleteOrder, OrderUpdate, OrdersQuery};
use gogreen_shared::{ApiError, ApiResult, Order, OrderList};

pub const DELETE_CONFIRMATION: &str = "Delete this order from your dashboard?";
pub const ORDER_UPDATED_MESSAGE: &str =
    "Order updated successfully. Admin approval will refresh after review.";
pub const ORDER_DELETED_MESSAGE: &str = "Order removed from your dashboard.";

/// Text-field state of the per-order edit form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderEditForm {
    pub full_name: String,
    pub phone: String,
    pub number_of_trees: String,
    pub tree_species: String,
    pub planting_location: String,
    pub latitude: String,
    pub longitude: String,
    pub objective: String,
    pub dedication_name: String,
    pub notes: String,
}

fn coordinate(value: &str) -> ApiResult<Option<f64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ApiError::validation("Latitude and longitude must be numbers."))
}

impl OrderEditForm {
    /// Seeds the form from the cached order.
    pub fn from_order(order: &Order) -> Self {
        let coord = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
        Self {
            full_name: order.full_name.clone(),
            phone: order.phone.clone(),
            number_of_trees: order.number_of_trees.to_string(),
            tree_species: order.tree_species.clone(),
            planting_location: order.planting_location.clone(),
            latitude: coord(order.latitude),
            longitude: coord(order.longitude),
            objective: order.objective.clone(),
            dedication_name: order.dedication_name.clone(),
            notes: order.notes.clone(),
        }
    }

    /// Full-record update body; blank coordinates are sent as `null`.
    pub fn to_update(&self, id: u64, email: &str) -> ApiResult<OrderUpdate> {
        let number_of_trees = self
            .number_of_trees
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| ApiError::validation("Number of trees must be at least 1."))?;

        Ok(OrderUpdate {
            id,
            email: email.to_string(),
            full_name: self.full_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            number_of_trees,
            tree_species: self.tree_species.trim().to_string(),
            planting_location: self.planting_location.trim().to_string(),
            latitude: coordinate(&self.latitude)?,
            longitude: coordinate(&self.longitude)?,
            objective: self.objective.trim().to_string(),
            dedication_name: self.dedication_name.trim().to_string(),
            notes: self.notes.trim().to_string(),
        })
    }
}

/// A change the server accepted, plus the list read that followed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed {
    pub message: String,
    /// A failed re-read does not undo the change.
    pub list: ApiResult<OrderList>,
}

impl Committed {
    fn new(message: &str, list: ApiResult<OrderList>) -> Self {
        if let Err(e) = &list {
            log::warn!("Order list re-read failed after a committed change: {e}");
        }
        Self {
            message: message.to_string(),
            list,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// Confirmation declined; nothing was sent.
    Declined,
    Deleted(Committed),
}

/// Order operations scoped to one session email.
#[derive(Clone)]
pub struct OrderBook<T = FetchTransport> {
    api: GoGreenApi<T>,
    email: String,
}

impl<T: Transport> OrderBook<T> {
    pub fn new(api: GoGreenApi<T>, email: impl Into<String>) -> Self {
        Self {
            api,
            email: email.into(),
        }
    }

    /// Orders and server summary for the session email. Logged-out reads as empty.
    pub async fn refresh(&self) -> ApiResult<OrderList> {
        if self.email.is_empty() {
            return Ok(OrderList::default());
        }
        self.api
            .call(&OrdersQuery {
                email: self.email.clone(),
            })
            .await
    }

    /// PUTs the whole record, then re-reads the list.
    ///
    /// `Err` only when the update itself was rejected.
    pub async fn save(&self, id: u64, form: &OrderEditForm) -> ApiResult<Committed> {
        let update = form.to_update(id, &self.email)?;
        self.api.call(&update).await?;
        Ok(Committed::new(ORDER_UPDATED_MESSAGE, self.refresh().await))
    }

    /// Asks `confirm` first; a declined prompt sends no request.
    pub async fn delete(
        &self,
        id: u64,
        confirm: impl FnOnce(&str) -> bool,
    ) -> ApiResult<DeleteOutcome> {
        if !confirm(DELETE_CONFIRMATION) {
            return Ok(DeleteOutcome::Declined);
        }

        self.api
            .call(&DeleteOrder {
                id,
                email: self.email.clone(),
            })
            .await?;
        Ok(DeleteOutcome::Deleted(Committed::new(
            ORDER_DELETED_MESSAGE,
            self.refresh().await,
        )))
    }

    /// [`delete`](Self::delete) under `guard`. The ticket is taken only once
    /// the prompt is accepted, so declining leaves an in-flight refresh current.
    pub async fn delete_guarded(
        &self,
        id: u64,
        guard: &RequestGuard,
        confirm: impl FnOnce(&str) -> bool,
    ) -> (ApiResult<DeleteOutcome>, Option<Ticket>) {
        let mut ticket = None;
        let outcome = self
            .delete(id, |question| {
                let confirmed = confirm(question);
                if confirmed {
                    ticket = Some(guard.begin());
                }
                confirmed
            })
            .await;
        (outcome, ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::web::http::tests::MockTransport;
    use gogreen_shared::OrderTotals;
    use gogreen_shared::protocol::{HttpMethod, RequestBody};
    use serde_json::{Value, json};

    const LIST_URL: &str = "http://api.test/api/trees/orders/?email=asha%40example.com";

    fn book() -> (OrderBook<MockTransport>, MockTransport) {
        let mock = MockTransport::new();
        let api = GoGreenApi::with_transport(ApiConfig::new("http://api.test"), mock.clone());
        (OrderBook::new(api, "asha@example.com"), mock)
    }

    fn list_body(trees: &[u32]) -> Value {
        let orders: Vec<Value> = trees
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let status = if i == 0 { "paid" } else { "created" };
                json!({
                    "id": i + 1,
                    "number_of_trees": n,
                    "payment_status": status,
                    "amount_paise": n * 9900,
                })
            })
            .collect();
        json!({"orders": orders, "summary": {"total_orders": trees.len()}})
    }

    #[tokio::test]
    async fn test_refresh_and_totals() {
        let (book, mock) = book();
        mock.mock_response(HttpMethod::Get, LIST_URL, 200, list_body(&[3, 5, 2]));

        let list = book.refresh().await.unwrap();
        let totals = OrderTotals::from_orders(&list.orders);

        assert_eq!(totals.total_trees, 10);
        assert_eq!(totals.total_spent_inr(), "297.00");
        assert_eq!(list.summary.total_orders, 3);
    }

    #[tokio::test]
    async fn test_refresh_without_session_sends_nothing() {
        let mock = MockTransport::new();
        let api = GoGreenApi::with_transport(ApiConfig::new("http://api.test"), mock.clone());
        let book = OrderBook::new(api, "");

        assert_eq!(book.refresh().await.unwrap(), OrderList::default());
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_save_puts_full_record_then_refetches() {
        let (book, mock) = book();
        mock.mock_response(
            HttpMethod::Put,
            "http://api.test/api/trees/orders/1/",
            200,
            json!({"message": "Order updated"}),
        );
        mock.mock_response(HttpMethod::Get, LIST_URL, 200, list_body(&[4]));

        let order = Order {
            id: 1,
            full_name: "Asha".into(),
            number_of_trees: 3,
            latitude: Some(18.5),
            ..Order::default()
        };
        let mut form = OrderEditForm::from_order(&order);
        form.number_of_trees = "4".into();
        form.longitude = String::new();

        let committed = book.save(1, &form).await.unwrap();
        assert_eq!(committed.message, ORDER_UPDATED_MESSAGE);
        assert_eq!(committed.list.unwrap().orders[0].number_of_trees, 4);

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, HttpMethod::Put);
        assert_eq!(requests[1].method, HttpMethod::Get);
        let RequestBody::Json(body) = &requests[0].body else {
            panic!("update must be json");
        };
        let body: Value = serde_json::from_str(body).unwrap();
        assert_eq!(body["number_of_trees"], json!(4));
        assert_eq!(body["latitude"], json!(18.5));
        assert_eq!(body["longitude"], Value::Null);
        assert_eq!(body["email"], json!("asha@example.com"));
    }

    #[tokio::test]
    async fn test_save_commits_even_when_reread_fails() {
        let (book, mock) = book();
        mock.mock_response(
            HttpMethod::Put,
            "http://api.test/api/trees/orders/1/",
            200,
            json!({"message": "Order updated"}),
        );
        mock.mock_network_error(HttpMethod::Get, LIST_URL, "offline");

        let form = OrderEditForm::from_order(&Order {
            number_of_trees: 2,
            ..Order::default()
        });
        let committed = book.save(1, &form).await.unwrap();

        assert_eq!(committed.message, ORDER_UPDATED_MESSAGE);
        assert!(matches!(committed.list, Err(ApiError::Network(_))));
        assert_eq!(mock.count_for(HttpMethod::Put, "http://api.test/api/trees/orders/1/"), 1);
    }

    #[tokio::test]
    async fn test_failed_save_surfaces_server_message_without_refetch() {
        let (book, mock) = book();
        mock.mock_response(
            HttpMethod::Put,
            "http://api.test/api/trees/orders/1/",
            403,
            json!({"error": "Approved orders cannot be edited"}),
        );

        let form = OrderEditForm::from_order(&Order {
            number_of_trees: 2,
            ..Order::default()
        });
        let err = book.save(1, &form).await.unwrap_err();

        assert_eq!(err.to_string(), "Approved orders cannot be edited");
        assert_eq!(mock.count_for(HttpMethod::Get, LIST_URL), 0);
    }

    #[tokio::test]
    async fn test_invalid_tree_count_sends_nothing() {
        let (book, mock) = book();
        let form = OrderEditForm {
            number_of_trees: "0".into(),
            ..OrderEditForm::default()
        };

        let err = book.save(1, &form).await.unwrap_err();
        assert!(err.is_client_side());
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let (book, mock) = book();
        let mut prompted = None;

        let outcome = book
            .delete(7, |question| {
                prompted = Some(question.to_string());
                false
            })
            .await
            .unwrap();

        assert_eq!(outcome, DeleteOutcome::Declined);
        assert_eq!(prompted.as_deref(), Some(DELETE_CONFIRMATION));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_declined_delete_keeps_running_refresh_current() {
        let (book, mock) = book();
        let guard = RequestGuard::new();
        let refresh = guard.begin();

        let (outcome, ticket) = book.delete_guarded(7, &guard, |_| false).await;

        assert_eq!(outcome, Ok(DeleteOutcome::Declined));
        assert!(ticket.is_none());
        assert!(refresh.is_current());
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_confirmed_delete_supersedes_running_refresh() {
        let (book, mock) = book();
        mock.mock_response(
            HttpMethod::Delete,
            "http://api.test/api/trees/orders/7/?email=asha%40example.com",
            500,
            json!({"error": "Unable to delete order"}),
        );
        let guard = RequestGuard::new();
        let refresh = guard.begin();

        let (outcome, ticket) = book.delete_guarded(7, &guard, |_| true).await;

        assert_eq!(outcome.unwrap_err().to_string(), "Unable to delete order");
        assert!(!refresh.is_current());
        assert!(ticket.is_some_and(|t| t.is_current()));
    }

    #[tokio::test]
    async fn test_confirmed_delete_is_scoped_and_refetches() {
        let (book, mock) = book();
        mock.mock_response(
            HttpMethod::Delete,
            "http://api.test/api/trees/orders/7/?email=asha%40example.com",
            200,
            json!({"message": "Deleted"}),
        );
        mock.mock_response(HttpMethod::Get, LIST_URL, 200, list_body(&[]));

        let outcome = book.delete(7, |_| true).await.unwrap();

        let DeleteOutcome::Deleted(committed) = outcome else {
            panic!("expected a delete");
        };
        assert_eq!(committed.message, ORDER_DELETED_MESSAGE);
        assert!(committed.list.unwrap().orders.is_empty());
        assert_eq!(mock.request_count(), 2);
    }
}
