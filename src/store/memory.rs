//! In-memory datastore implementation.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{Result, StagedoorError};

use super::models::{Artist, Event, FeaturedArtist, Product};
use super::Datastore;

#[derive(Default)]
struct Inner {
    products: HashMap<String, Product>,
    events: BTreeMap<i32, Event>,
    artists: BTreeMap<i32, Artist>,
    featured: BTreeMap<i32, FeaturedArtist>,
    next_id: i32,
}

impl Inner {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// A [`Datastore`] backed by process memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn product(&self, id: &str) -> Result<Option<Product>> {
        Ok(self.inner.read().products.get(id).cloned())
    }

    async fn products(&self) -> Result<Vec<Product>> {
        let inner = self.inner.read();
        let mut products: Vec<Product> = inner.products.values().cloned().collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(products)
    }

    async fn create_product(&self, product: Product) -> Result<Product> {
        let mut inner = self.inner.write();
        if inner.products.contains_key(&product.id) {
            return Err(StagedoorError::Datastore(format!(
                "duplicate product id {}",
                product.id
            )));
        }
        inner.products.insert(product.id.clone(), product.clone());
        Ok(product)
    }

    async fn update_product(&self, product: Product) -> Result<Product> {
        let mut inner = self.inner.write();
        if !inner.products.contains_key(&product.id) {
            return Err(StagedoorError::NotFound);
        }
        inner.products.insert(product.id.clone(), product.clone());
        Ok(product)
    }

    async fn delete_product(&self, id: &str) -> Result<()> {
        self.inner.write().products.remove(id);
        Ok(())
    }

    async fn product_for_order(&self, id: &str, quantity: u32) -> Result<Product> {
        let inner = self.inner.read();
        let product = inner.products.get(id).ok_or(StagedoorError::NotFound)?;
        if product.quantity < quantity {
            return Err(StagedoorError::OutOfStock {
                name: product.name.clone(),
                size: product.size.clone(),
                available: product.quantity,
            });
        }
        let mut ordered = product.clone();
        ordered.quantity = quantity;
        Ok(ordered)
    }

    async fn decrement_quantity(&self, id: &str, by: u32) -> Result<()> {
        let mut inner = self.inner.write();
        match inner.products.get_mut(id) {
            Some(product) => {
                product.quantity = product.quantity.saturating_sub(by);
                Ok(())
            }
            None => Err(StagedoorError::NotFound),
        }
    }

    async fn event(&self, id: i32) -> Result<Option<Event>> {
        Ok(self.inner.read().events.get(&id).cloned())
    }

    async fn events(&self) -> Result<Vec<Event>> {
        Ok(self.inner.read().events.values().cloned().collect())
    }

    async fn create_event(&self, mut event: Event) -> Result<Event> {
        let mut inner = self.inner.write();
        let id = event.id.unwrap_or_else(|| inner.allocate_id());
        event.id = Some(id);
        inner.events.insert(id, event.clone());
        Ok(event)
    }

    async fn update_event(&self, event: Event) -> Result<Event> {
        let id = event.id.ok_or(StagedoorError::InvalidId)?;
        let mut inner = self.inner.write();
        if !inner.events.contains_key(&id) {
            return Err(StagedoorError::NotFound);
        }
        inner.events.insert(id, event.clone());
        Ok(event)
    }

    async fn delete_event(&self, id: i32) -> Result<()> {
        self.inner.write().events.remove(&id);
        Ok(())
    }

    async fn artist(&self, id: i32) -> Result<Option<Artist>> {
        Ok(self.inner.read().artists.get(&id).cloned())
    }

    async fn artists(&self) -> Result<Vec<Artist>> {
        Ok(self.inner.read().artists.values().cloned().collect())
    }

    async fn create_artist(&self, mut artist: Artist) -> Result<Artist> {
        let mut inner = self.inner.write();
        let id = artist.id.unwrap_or_else(|| inner.allocate_id());
        artist.id = Some(id);
        inner.artists.insert(id, artist.clone());
        Ok(artist)
    }

    async fn update_artist(&self, artist: Artist) -> Result<Artist> {
        let id = artist.id.ok_or(StagedoorError::InvalidId)?;
        let mut inner = self.inner.write();
        if !inner.artists.contains_key(&id) {
            return Err(StagedoorError::NotFound);
        }
        inner.artists.insert(id, artist.clone());
        Ok(artist)
    }

    async fn delete_artist(&self, id: i32) -> Result<()> {
        self.inner.write().artists.remove(&id);
        Ok(())
    }

    async fn featured_artist(&self, id: i32) -> Result<Option<FeaturedArtist>> {
        Ok(self.inner.read().featured.get(&id).cloned())
    }

    async fn featured_artists(&self) -> Result<Vec<FeaturedArtist>> {
        let inner = self.inner.read();
        let mut featured: Vec<FeaturedArtist> = inner.featured.values().cloned().collect();
        featured.sort_by_key(|f| f.sequence);
        Ok(featured)
    }

    async fn create_featured_artist(&self, mut featured: FeaturedArtist) -> Result<FeaturedArtist> {
        let mut inner = self.inner.write();
        let id = featured.id.unwrap_or_else(|| inner.allocate_id());
        featured.id = Some(id);
        inner.featured.insert(id, featured.clone());
        Ok(featured)
    }

    async fn update_featured_artist(&self, featured: FeaturedArtist) -> Result<FeaturedArtist> {
        let id = featured.id.ok_or(StagedoorError::InvalidId)?;
        let mut inner = self.inner.write();
        if !inner.featured.contains_key(&id) {
            return Err(StagedoorError::NotFound);
        }
        inner.featured.insert(id, featured.clone());
        Ok(featured)
    }

    async fn delete_featured_artist(&self, id: i32) -> Result<()> {
        self.inner.write().featured.remove(&id);
        Ok(())
    }
}
