//! Payment-provider boundary.
//!
//! Checkout and webhook handling talk to the provider through the
//! [`PaymentProvider`] trait. The remote service is invoked synchronously,
//! one round trip per request; no retries or queueing happen here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StagedoorError};

/// One item of a checkout session, in the provider's terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// The storefront product id, carried so the completion webhook can be
    /// mapped back to inventory.
    pub product_id: String,
    pub name: String,
    /// Unit price in the smallest currency denomination (cents)
    pub unit_amount: i64,
    pub currency: String,
    pub quantity: u32,
}

/// A hosted checkout session created at the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Where the storefront redirects the buyer
    pub url: String,
}

/// A purchased line item reported by the completion webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchasedItem {
    pub product_id: String,
    pub quantity: u32,
}

/// A webhook callback, after signature verification.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    /// The buyer completed payment; inventory must be reconciled.
    CheckoutCompleted { items: Vec<PurchasedItem> },
    /// Any other event type, ignored by the service
    Other(String),
}

/// Interface to the remote payment provider.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a hosted checkout session for the given line items.
    async fn create_checkout_session(&self, items: Vec<LineItem>) -> Result<CheckoutSession>;

    /// Verify a webhook payload against its signature header and decode it.
    fn verify_webhook(&self, payload: &[u8], signature: &str) -> Result<WebhookEvent>;
}

/// Placeholder provider used until a real integration is configured.
///
/// Every call fails with `PAYMENT_ERROR`; the rest of the service (listings,
/// admin CRUD, rate limiting) is unaffected.
pub struct UnconfiguredProvider;

#[async_trait]
impl PaymentProvider for UnconfiguredProvider {
    async fn create_checkout_session(&self, _items: Vec<LineItem>) -> Result<CheckoutSession> {
        Err(StagedoorError::Payment(
            "no payment provider configured".to_string(),
        ))
    }

    fn verify_webhook(&self, _payload: &[u8], _signature: &str) -> Result<WebhookEvent> {
        Err(StagedoorError::Payment(
            "no payment provider configured".to_string(),
        ))
    }
}
