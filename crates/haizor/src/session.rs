use catalog::{Artwork, ArtworkCategory, Cart, CartError, Catalog, CategoryFilter, Wishlist};
use renderer::{DelegateAction, GalleryDelegate, KeyInput};
use tracing::{debug, info, warn};

use crate::listing::{format_cart, format_detail, format_price};

/// Gallery page state driven by the watercolor window.
#[derive(Debug)]
pub struct GallerySession {
    catalog: Catalog,
    filter: CategoryFilter,
    cart: Cart,
    wishlist: Wishlist,
    selected: Option<Artwork>,
    available: Option<bool>,
}

impl GallerySession {
    pub fn new(catalog: Catalog, filter: CategoryFilter) -> Self {
        Self {
            catalog,
            filter,
            cart: Cart::new(),
            wishlist: Wishlist::new(),
            selected: None,
            available: None,
        }
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    /// Artworks currently shown, in catalog order.
    pub fn visible(&self) -> Vec<Artwork> {
        self.catalog.filtered(self.filter)
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    pub fn selected(&self) -> Option<&Artwork> {
        self.selected.as_ref()
    }

    /// `Some(false)` once the renderer reported it cannot draw.
    pub fn available(&self) -> Option<bool> {
        self.available
    }

    fn switch_filter(&mut self, filter: CategoryFilter) -> DelegateAction {
        if filter == self.filter {
            return DelegateAction::None;
        }
        self.filter = filter;
        self.selected = None;
        let artworks = self.visible();
        println!("Showing {} ({} artworks)", filter, artworks.len());
        DelegateAction::ReplaceArtworks(artworks)
    }

    fn add_selected_to_cart(&mut self) {
        let Some(artwork) = self.selected.as_ref() else {
            debug!("add to cart ignored; nothing selected");
            return;
        };
        match self.cart.add(artwork) {
            Ok(quantity) => {
                info!(id = artwork.id, quantity, "added to cart");
                println!(
                    "Added {} ({}) to cart; {} item(s)",
                    artwork.title,
                    format_price(artwork.price),
                    self.cart.item_count()
                );
            }
            Err(CartError::NotForSale(id)) => {
                println!("{} is not for sale", artwork.title);
                debug!(id, "artwork not for sale");
            }
            Err(err) => warn!(error = %err, "cart update failed"),
        }
    }

    fn toggle_selected_wishlist(&mut self) {
        let Some(artwork) = self.selected.as_ref() else {
            return;
        };
        if self.wishlist.toggle(artwork.id) {
            println!("Saved {} to wishlist", artwork.title);
        } else {
            println!("Removed {} from wishlist", artwork.title);
        }
    }
}

impl GalleryDelegate for GallerySession {
    fn capability_changed(&mut self, available: bool) {
        if !available {
            warn!("watercolor rendering unavailable; showing the plain listing");
        }
        self.available = Some(available);
    }

    fn artwork_selected(&mut self, artwork: &Artwork) {
        info!(id = artwork.id, title = %artwork.title, "artwork selected");
        print!("{}", format_detail(artwork, self.wishlist.contains(artwork.id)));
        self.selected = Some(artwork.clone());
    }

    fn key_pressed(&mut self, key: KeyInput) -> DelegateAction {
        let ch = match key {
            KeyInput::Escape => {
                self.selected = None;
                return DelegateAction::None;
            }
            KeyInput::Character(ch) => ch,
        };
        match ch.as_str() {
            "1" => self.switch_filter(CategoryFilter::All),
            "2" => self.switch_filter(CategoryFilter::Only(ArtworkCategory::Handmade)),
            "3" => self.switch_filter(CategoryFilter::Only(ArtworkCategory::Digital)),
            "a" | "A" => {
                self.add_selected_to_cart();
                DelegateAction::None
            }
            "w" | "W" => {
                self.toggle_selected_wishlist();
                DelegateAction::None
            }
            "c" | "C" => {
                print!("{}", format_cart(&self.cart));
                DelegateAction::None
            }
            "q" | "Q" => DelegateAction::Close,
            _ => DelegateAction::None,
        }
    }
}
