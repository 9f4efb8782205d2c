//! Email-delivery boundary.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::error::Result;

/// A booking inquiry submitted through the contact form.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingInquiry {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Interface to the outbound mail service.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, inquiry: BookingInquiry) -> Result<()>;
}

/// A mailer that records inquiries in the service log.
///
/// Stands in until an SMTP or API-based delivery integration is wired up;
/// inquiries are not lost silently, they land in the operator's logs.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, inquiry: BookingInquiry) -> Result<()> {
        info!(
            name = %inquiry.name,
            email = %inquiry.email,
            message = %inquiry.message,
            "booking inquiry received"
        );
        Ok(())
    }
}
