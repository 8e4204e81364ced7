//! Product listings as shown in the catalog grid.

use serde::{Deserialize, Serialize};

use crate::types::{ListingId, Price};

/// A product entry with display fields and a purchasable price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListing {
    pub id: ListingId,
    pub name: String,
    pub description: String,
    /// URL of the first asset preview, if any.
    pub preview_image: Option<String>,
    /// Price of the first variant, if any.
    pub price: Option<Price>,
}

impl ProductListing {
    /// Whether this listing may be shown.
    ///
    /// A listing needs a non-empty preview image, a description that is not
    /// blank after trimming, and a strictly positive price.
    #[must_use]
    pub fn is_displayable(&self) -> bool {
        let has_preview = self
            .preview_image
            .as_deref()
            .is_some_and(|url| !url.is_empty());
        let has_description = !self.description.trim().is_empty();
        let has_price = self.price.as_ref().is_some_and(Price::is_positive);

        has_preview && has_description && has_price
    }
}

/// Keep the displayable listings, preserving fetch order.
#[must_use]
pub fn displayable_listings(listings: impl IntoIterator<Item = ProductListing>) -> Vec<ProductListing> {
    listings
        .into_iter()
        .filter(ProductListing::is_displayable)
        .collect()
}
