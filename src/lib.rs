//! Stagedoor - Storefront Backend
//!
//! This crate implements the HTTP backend for a single-merchant storefront:
//! merchandise listings, payment-provider checkout sessions, webhook-driven
//! inventory reconciliation, and admin CRUD for products, events, and
//! featured-artist metadata. Every route is guarded by a per-client
//! token-bucket rate limiter; admin routes additionally require a bearer or
//! session token.

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod images;
pub mod mail;
pub mod payment;
pub mod ratelimit;
pub mod store;
