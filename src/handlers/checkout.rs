//! Checkout session creation and webhook-driven inventory reconciliation.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::{Result, StagedoorError};
use crate::payment::{LineItem, WebhookEvent};

use super::AppState;

/// Header carrying the provider's webhook signature.
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Convert a dollar price to integer cents for the provider.
///
/// Prices are validated at product creation, but conversion still refuses
/// any value a charge amount cannot represent.
fn price_in_cents(price: f64) -> Result<i64> {
    let cents = (price * 100.0).round();
    if !cents.is_finite() || cents < 0.0 || cents >= i64::MAX as f64 {
        return Err(StagedoorError::Payment(format!(
            "price {price} is not a chargeable amount"
        )));
    }
    Ok(cents as i64)
}

#[derive(Debug, Deserialize)]
struct CheckoutRequest {
    items: Vec<OrderItem>,
}

#[derive(Debug, Deserialize)]
struct OrderItem {
    id: String,
    quantity: u32,
}

/// Build a hosted checkout session for the cart.
///
/// Each item is checked against current stock before the provider is
/// called, so a session is only created for a fulfillable order.
pub async fn create_checkout(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>> {
    let order: CheckoutRequest =
        serde_json::from_slice(&body).map_err(|_| StagedoorError::InvalidJson)?;

    let mut line_items = Vec::with_capacity(order.items.len());
    for item in &order.items {
        let product = state.store.product_for_order(&item.id, item.quantity).await?;
        line_items.push(LineItem {
            product_id: product.id.clone(),
            name: format!("{} ({})", product.name, product.size),
            unit_amount: price_in_cents(product.price)?,
            currency: "usd".to_string(),
            quantity: item.quantity,
        });
    }

    let session = state.payments.create_checkout_session(line_items).await?;
    info!(session = %session.id, "checkout session created");
    Ok(Json(json!({ "url": session.url })))
}

/// Handle a provider callback.
///
/// The payload is verified against the signature header before anything is
/// decoded. On a completed checkout, each purchased line item decrements
/// the product's stock.
pub async fn handle_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(StagedoorError::InvalidSignature)?;

    let event = state.payments.verify_webhook(&body, signature)?;

    match event {
        WebhookEvent::CheckoutCompleted { items } => {
            for item in items {
                if let Err(err) = state
                    .store
                    .decrement_quantity(&item.product_id, item.quantity)
                    .await
                {
                    // The sale already happened at the provider; log and keep
                    // reconciling the remaining items.
                    warn!(
                        product = %item.product_id,
                        quantity = item.quantity,
                        error = %err,
                        "failed to reconcile inventory for purchased item"
                    );
                } else {
                    info!(
                        product = %item.product_id,
                        quantity = item.quantity,
                        "inventory reconciled"
                    );
                }
            }
        }
        WebhookEvent::Other(kind) => {
            info!(event = %kind, "ignoring webhook event");
        }
    }

    Ok(Json(json!({ "received": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::handlers::testutil::{request, state_with, test_router};
    use crate::payment::{CheckoutSession, PaymentProvider, PurchasedItem};
    use crate::store::{Datastore, MemoryStore, Product};

    /// Provider double: accepts any session, verifies a fixed signature,
    /// and reports one purchased item per line item.
    struct FakeProvider;

    #[async_trait]
    impl PaymentProvider for FakeProvider {
        async fn create_checkout_session(
            &self,
            items: Vec<LineItem>,
        ) -> crate::error::Result<CheckoutSession> {
            assert!(!items.is_empty());
            Ok(CheckoutSession {
                id: "cs_test_1".to_string(),
                url: "https://pay.example.com/cs_test_1".to_string(),
            })
        }

        fn verify_webhook(
            &self,
            payload: &[u8],
            signature: &str,
        ) -> crate::error::Result<WebhookEvent> {
            if signature != "valid-sig" {
                return Err(StagedoorError::InvalidSignature);
            }
            let items: Vec<PurchasedItem> = serde_json::from_slice(payload).unwrap();
            Ok(WebhookEvent::CheckoutCompleted { items })
        }
    }

    async fn store_with_tee(quantity: u32) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .create_product(Product {
                id: "uhp01".to_string(),
                name: "Logo Tee".to_string(),
                size: "M".to_string(),
                price: 25.0,
                quantity,
                image_url: None,
            })
            .await
            .unwrap();
        store
    }

    #[test]
    fn test_price_in_cents() {
        assert_eq!(price_in_cents(25.0).unwrap(), 2500);
        assert_eq!(price_in_cents(19.99).unwrap(), 1999);
        assert_eq!(price_in_cents(0.0).unwrap(), 0);

        assert!(price_in_cents(-1.0).is_err());
        assert!(price_in_cents(f64::NAN).is_err());
        assert!(price_in_cents(f64::INFINITY).is_err());
        assert!(price_in_cents(1e300).is_err());
    }

    #[tokio::test]
    async fn test_checkout_returns_session_url() {
        let store = store_with_tee(10).await;
        let app = test_router(state_with(store, Arc::new(FakeProvider)));

        let body = Body::from(r#"{"items": [{"id": "uhp01", "quantity": 2}]}"#);
        let res = app
            .oneshot(request("POST", "/checkout", body))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = res.into_body().collect().await.unwrap().to_bytes();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["url"], "https://pay.example.com/cs_test_1");
    }

    #[tokio::test]
    async fn test_checkout_rejects_oversized_order() {
        let store = store_with_tee(1).await;
        let app = test_router(state_with(store, Arc::new(FakeProvider)));

        let body = Body::from(r#"{"items": [{"id": "uhp01", "quantity": 3}]}"#);
        let res = app
            .oneshot(request("POST", "/checkout", body))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = res.into_body().collect().await.unwrap().to_bytes();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "OUT_OF_STOCK");
        assert!(value["message"]
            .as_str()
            .unwrap()
            .contains("Only 1 M Logo Tee(s) in stock"));
    }

    #[tokio::test]
    async fn test_webhook_decrements_inventory() {
        let store = store_with_tee(10).await;
        let app = test_router(state_with(store.clone(), Arc::new(FakeProvider)));

        let mut req = request(
            "POST",
            "/webhook",
            Body::from(r#"[{"product_id": "uhp01", "quantity": 3}]"#),
        );
        req.headers_mut()
            .insert(SIGNATURE_HEADER, "valid-sig".parse().unwrap());

        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(store.product("uhp01").await.unwrap().unwrap().quantity, 7);
    }

    #[tokio::test]
    async fn test_webhook_rejects_bad_signature() {
        let store = store_with_tee(10).await;
        let app = test_router(state_with(store.clone(), Arc::new(FakeProvider)));

        let mut req = request("POST", "/webhook", Body::from(r#"[]"#));
        req.headers_mut()
            .insert(SIGNATURE_HEADER, "forged".parse().unwrap());

        let res = app.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        // Missing header entirely is also a signature failure.
        let res = app
            .oneshot(request("POST", "/webhook", Body::from(r#"[]"#)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.product("uhp01").await.unwrap().unwrap().quantity, 10);
    }
}
