//! Storefront data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A merchandise item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub size: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Partial product update, applied over the stored record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub size: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<u32>,
    pub image_url: Option<String>,
}

impl Product {
    /// Apply a patch, leaving unset fields untouched.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = Some(image_url);
        }
    }
}

/// An act on an event bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingEntry {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub sequence: u32,
}

/// A scheduled show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub headliner: BillingEntry,
    #[serde(default)]
    pub openers: Vec<BillingEntry>,
    #[serde(default)]
    pub image_url: String,
    pub location_name: String,
    #[serde(default)]
    pub location_url: String,
    #[serde(default)]
    pub ticket_url: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Partial event update, applied over the stored record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    pub headliner: Option<BillingEntry>,
    pub openers: Option<Vec<BillingEntry>>,
    pub image_url: Option<String>,
    pub location_name: Option<String>,
    pub location_url: Option<String>,
    pub ticket_url: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl Event {
    /// Apply a patch, leaving unset fields untouched.
    pub fn apply(&mut self, patch: EventPatch) {
        if let Some(headliner) = patch.headliner {
            self.headliner = headliner;
        }
        if let Some(openers) = patch.openers {
            self.openers = openers;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(location_name) = patch.location_name {
            self.location_name = location_name;
        }
        if let Some(location_url) = patch.location_url {
            self.location_url = location_url;
        }
        if let Some(ticket_url) = patch.ticket_url {
            self.ticket_url = ticket_url;
        }
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            self.end_time = end_time;
        }
    }
}

/// A roster artist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Partial artist update, applied over the stored record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtistPatch {
    pub name: Option<String>,
    pub url: Option<String>,
}

impl Artist {
    /// Apply a patch, leaving unset fields untouched.
    pub fn apply(&mut self, patch: ArtistPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(url) = patch.url {
            self.url = url;
        }
    }
}

/// A roster artist promoted on the landing page, with an embeddable mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedArtist {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub artist: Artist,
    #[serde(rename = "soundcloud_iframe_url")]
    pub soundcloud_url: String,
    #[serde(default)]
    pub sequence: u32,
}

/// Partial featured-artist update, applied over the stored record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeaturedArtistPatch {
    pub artist: Option<Artist>,
    #[serde(rename = "soundcloud_iframe_url")]
    pub soundcloud_url: Option<String>,
    pub sequence: Option<u32>,
}

impl FeaturedArtist {
    /// Apply a patch, leaving unset fields untouched.
    pub fn apply(&mut self, patch: FeaturedArtistPatch) {
        if let Some(artist) = patch.artist {
            self.artist = artist;
        }
        if let Some(soundcloud_url) = patch.soundcloud_url {
            self.soundcloud_url = soundcloud_url;
        }
        if let Some(sequence) = patch.sequence {
            self.sequence = sequence;
        }
    }
}
