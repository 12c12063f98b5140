//! Core data models for the Databank catalog
//!
//! This module contains the catalog sections exposed by the Star Wars
//! Databank API and the canonical shapes the rest of the application works
//! with: one record, one page of records, and its pagination metadata.

pub mod client;
pub mod repository;

pub use client::{DatabankClient, FetchError};
pub use repository::{CachedCatalog, CatalogFetcher};

use serde::{Deserialize, Serialize};

/// A catalog section of the Databank API
///
/// The set is closed: section names double as URL path segments and as
/// cache-key components, so free-form strings are never passed around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Characters,
    Creatures,
    Droids,
    Locations,
    Organizations,
    Species,
    Vehicles,
}

/// All catalog sections, in display order
pub const ENDPOINTS: [Endpoint; 7] = [
    Endpoint::Characters,
    Endpoint::Creatures,
    Endpoint::Droids,
    Endpoint::Locations,
    Endpoint::Organizations,
    Endpoint::Species,
    Endpoint::Vehicles,
];

impl Endpoint {
    /// URL path segment and cache-key component for this section
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Characters => "characters",
            Endpoint::Creatures => "creatures",
            Endpoint::Droids => "droids",
            Endpoint::Locations => "locations",
            Endpoint::Organizations => "organizations",
            Endpoint::Species => "species",
            Endpoint::Vehicles => "vehicles",
        }
    }

    /// Human-readable label for tabs and headers
    pub fn label(&self) -> &'static str {
        match self {
            Endpoint::Characters => "Characters",
            Endpoint::Creatures => "Creatures",
            Endpoint::Droids => "Droids",
            Endpoint::Locations => "Locations",
            Endpoint::Organizations => "Organizations",
            Endpoint::Species => "Species",
            Endpoint::Vehicles => "Vehicles",
        }
    }

    /// Parses a section name (case-insensitive).
    ///
    /// # Returns
    /// * `Some(Endpoint)` if the name matches a catalog section
    /// * `None` otherwise
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "characters" | "character" => Some(Endpoint::Characters),
            "creatures" | "creature" => Some(Endpoint::Creatures),
            "droids" | "droid" => Some(Endpoint::Droids),
            "locations" | "location" => Some(Endpoint::Locations),
            "organizations" | "organization" => Some(Endpoint::Organizations),
            "species" => Some(Endpoint::Species),
            "vehicles" | "vehicle" => Some(Endpoint::Vehicles),
            _ => None,
        }
    }

    /// The section after this one, wrapping around
    pub fn next(&self) -> Self {
        let index = ENDPOINTS.iter().position(|e| e == self).unwrap_or(0);
        ENDPOINTS[(index + 1) % ENDPOINTS.len()]
    }

    /// The section before this one, wrapping around
    pub fn prev(&self) -> Self {
        let index = ENDPOINTS.iter().position(|e| e == self).unwrap_or(0);
        ENDPOINTS[(index + ENDPOINTS.len() - 1) % ENDPOINTS.len()]
    }
}

/// One record in the Databank catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Databank record identifier
    pub id: String,
    /// Display name of the record
    pub name: String,
    /// Databank description text (may be empty)
    pub description: String,
    /// Normalized absolute image URL, if the record carries one
    pub image: Option<String>,
}

/// Pagination metadata for a catalog page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Total records in the section for this query
    pub total: u32,
    /// 1-based page number of this page
    pub page: u32,
    /// Requested page size
    pub limit: u32,
    /// Total number of pages for this query
    pub total_pages: u32,
    /// Whether a later page exists
    pub has_next: bool,
    /// Whether an earlier page exists
    pub has_prev: bool,
}

/// One page of catalog records in canonical shape
///
/// This is the unit stored in the response cache, so it is always fully
/// normalized before it leaves the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPage {
    /// Records on this page
    pub items: Vec<CatalogItem>,
    /// Pagination metadata
    pub info: PageInfo,
}

impl CatalogPage {
    /// A page with no records, used before the first fetch completes
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            info: PageInfo {
                total: 0,
                page: 1,
                limit: 0,
                total_pages: 1,
                has_next: false,
                has_prev: false,
            },
        }
    }
}
