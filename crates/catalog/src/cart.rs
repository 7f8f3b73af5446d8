use serde::{Deserialize, Serialize};

use crate::artwork::{Artwork, ArtworkId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("artwork {0} is not for sale")]
    NotForSale(ArtworkId),
    #[error("artwork {0} is not in the cart")]
    Missing(ArtworkId),
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ArtworkId,
    pub title: String,
    pub price: u32,
    pub image_url: String,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> u64 {
        u64::from(self.price) * u64::from(self.quantity)
    }
}

/// Ordered shopping cart; lines keep the order in which they were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds one unit of `artwork`, incrementing the existing line if present.
    /// Returns the line's new quantity.
    pub fn add(&mut self, artwork: &Artwork) -> Result<u32, CartError> {
        let price = artwork.price.ok_or(CartError::NotForSale(artwork.id))?;
        if let Some(item) = self.items.iter_mut().find(|item| item.id == artwork.id) {
            item.quantity = item.quantity.saturating_add(1);
            return Ok(item.quantity);
        }
        self.items.push(CartItem {
            id: artwork.id,
            title: artwork.title.clone(),
            price,
            image_url: artwork.image_url.clone(),
            quantity: 1,
        });
        Ok(1)
    }

    /// Removes one unit; the line disappears when its quantity reaches zero.
    pub fn decrement(&mut self, id: ArtworkId) -> Result<u32, CartError> {
        let position = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(CartError::Missing(id))?;
        let item = &mut self.items[position];
        item.quantity -= 1;
        let remaining = item.quantity;
        if remaining == 0 {
            self.items.remove(position);
        }
        Ok(remaining)
    }

    pub fn remove(&mut self, id: ArtworkId) -> Result<CartItem, CartError> {
        let position = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(CartError::Missing(id))?;
        Ok(self.items.remove(position))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn subtotal(&self) -> u64 {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

/// Saved artworks, in the order they were first saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wishlist {
    ids: Vec<ArtworkId>,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `id` and reports whether it is now wishlisted.
    pub fn toggle(&mut self, id: ArtworkId) -> bool {
        if let Some(position) = self.ids.iter().position(|&saved| saved == id) {
            self.ids.remove(position);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn contains(&self, id: ArtworkId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[ArtworkId] {
        &self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artwork::ArtworkCategory;

    fn artwork(id: ArtworkId, price: Option<u32>) -> Artwork {
        Artwork {
            id,
            title: format!("Work {id}"),
            year: 2024,
            category: ArtworkCategory::Digital,
            medium: "Print".into(),
            size: "A3".into(),
            price,
            image_url: format!("art/{id}.png"),
            description: String::new(),
        }
    }

    #[test]
    fn add_increments_existing_line() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(&artwork(1, Some(100))), Ok(1));
        assert_eq!(cart.add(&artwork(2, Some(250))), Ok(1));
        assert_eq!(cart.add(&artwork(1, Some(100))), Ok(2));

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].id, 1);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), 450);
    }

    #[test]
    fn unpriced_artwork_is_rejected() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(&artwork(7, None)), Err(CartError::NotForSale(7)));
        assert!(cart.is_empty());
    }

    #[test]
    fn decrement_drops_empty_lines() {
        let mut cart = Cart::new();
        cart.add(&artwork(1, Some(10))).unwrap();
        cart.add(&artwork(1, Some(10))).unwrap();
        assert_eq!(cart.decrement(1), Ok(1));
        assert_eq!(cart.decrement(1), Ok(0));
        assert!(cart.is_empty());
        assert_eq!(cart.decrement(1), Err(CartError::Missing(1)));
    }

    #[test]
    fn remove_and_clear() {
        let mut cart = Cart::new();
        cart.add(&artwork(1, Some(10))).unwrap();
        cart.add(&artwork(2, Some(20))).unwrap();
        let removed = cart.remove(1).unwrap();
        assert_eq!(removed.title, "Work 1");
        assert_eq!(cart.remove(1), Err(CartError::Missing(1)));
        cart.clear();
        assert_eq!(cart.subtotal(), 0);
    }

    #[test]
    fn wishlist_toggles() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.toggle(3));
        assert!(wishlist.toggle(5));
        assert!(wishlist.contains(3));
        assert!(!wishlist.toggle(3));
        assert_eq!(wishlist.ids(), &[5]);
    }
}
