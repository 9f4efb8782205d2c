//! Persistent-store boundary.
//!
//! The service consumes storage through the [`Datastore`] trait; the crate
//! ships an in-memory implementation used by the default binary and by
//! handler tests. A SQL-backed implementation plugs in behind the same trait.

mod memory;
mod models;

pub use memory::MemoryStore;
pub use models::{
    Artist, ArtistPatch, BillingEntry, Event, EventPatch, FeaturedArtist, FeaturedArtistPatch,
    Product, ProductPatch,
};

use async_trait::async_trait;

use crate::error::Result;

/// Data-access interface for the storefront.
#[async_trait]
pub trait Datastore: Send + Sync {
    // Products
    async fn product(&self, id: &str) -> Result<Option<Product>>;
    async fn products(&self) -> Result<Vec<Product>>;
    async fn create_product(&self, product: Product) -> Result<Product>;
    async fn update_product(&self, product: Product) -> Result<Product>;
    async fn delete_product(&self, id: &str) -> Result<()>;

    /// Fetch a product for a checkout order of `quantity` units.
    ///
    /// Fails with `OutOfStock` (carrying the available quantity) when the
    /// order cannot be satisfied, and `NotFound` for an unknown id.
    async fn product_for_order(&self, id: &str, quantity: u32) -> Result<Product>;

    /// Reduce a product's stock after a completed purchase. Saturates at
    /// zero rather than failing; the sale already happened.
    async fn decrement_quantity(&self, id: &str, by: u32) -> Result<()>;

    // Events
    async fn event(&self, id: i32) -> Result<Option<Event>>;
    async fn events(&self) -> Result<Vec<Event>>;
    async fn create_event(&self, event: Event) -> Result<Event>;
    async fn update_event(&self, event: Event) -> Result<Event>;
    async fn delete_event(&self, id: i32) -> Result<()>;

    // Artists
    async fn artist(&self, id: i32) -> Result<Option<Artist>>;
    async fn artists(&self) -> Result<Vec<Artist>>;
    async fn create_artist(&self, artist: Artist) -> Result<Artist>;
    async fn update_artist(&self, artist: Artist) -> Result<Artist>;
    async fn delete_artist(&self, id: i32) -> Result<()>;

    // Featured artists
    async fn featured_artist(&self, id: i32) -> Result<Option<FeaturedArtist>>;
    async fn featured_artists(&self) -> Result<Vec<FeaturedArtist>>;
    async fn create_featured_artist(&self, featured: FeaturedArtist) -> Result<FeaturedArtist>;
    async fn update_featured_artist(&self, featured: FeaturedArtist) -> Result<FeaturedArtist>;
    async fn delete_featured_artist(&self, id: i32) -> Result<()>;
}
