use std::fmt::Write as _;

use catalog::{Artwork, Cart, CategoryFilter};
use serde::Serialize;

/// JSON shape of `haizor catalog list --json`.
#[derive(Debug, Serialize)]
pub struct CatalogListing<'a> {
    pub filter: String,
    pub count: usize,
    pub artworks: &'a [Artwork],
}

impl<'a> CatalogListing<'a> {
    pub fn new(filter: CategoryFilter, artworks: &'a [Artwork]) -> Self {
        Self {
            filter: filter.to_string(),
            count: artworks.len(),
            artworks,
        }
    }
}

/// `$1,200` style price, or the display-only label.
pub fn format_price(price: Option<u32>) -> String {
    match price {
        Some(value) => format!("${}", group_thousands(u64::from(value))),
        None => "Not for sale".to_string(),
    }
}

fn format_amount(value: u64) -> String {
    format!("${}", group_thousands(value))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// One line per artwork in display order.
pub fn format_listing(artworks: &[Artwork]) -> String {
    if artworks.is_empty() {
        return "no artworks match this filter\n".to_string();
    }
    let title_width = artworks
        .iter()
        .map(|artwork| artwork.title.chars().count())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for artwork in artworks {
        let _ = writeln!(
            out,
            "{:>3}  {:<width$}  {}  {:<14}  {}",
            artwork.id,
            artwork.title,
            artwork.year,
            artwork.category.label(),
            format_price(artwork.price),
            width = title_width,
        );
    }
    out
}

/// Detail block shown when an artwork is selected.
pub fn format_detail(artwork: &Artwork, wishlisted: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", artwork.title, artwork.year);
    let _ = writeln!(out, "  {}", artwork.category.label());
    let _ = writeln!(out, "  Medium: {}", artwork.medium);
    let _ = writeln!(out, "  Size:   {}", artwork.size);
    let _ = writeln!(out, "  Price:  {}", format_price(artwork.price));
    if !artwork.description.is_empty() {
        let _ = writeln!(out, "  {}", artwork.description);
    }
    let mut actions = Vec::new();
    if artwork.is_for_sale() {
        actions.push("[a] add to cart");
    }
    actions.push(if wishlisted {
        "[w] remove from wishlist"
    } else {
        "[w] save to wishlist"
    });
    actions.push("[esc] close");
    let _ = writeln!(out, "  {}", actions.join("  "));
    out
}

pub fn format_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "cart is empty\n".to_string();
    }
    let mut out = String::new();
    for item in cart.items() {
        let _ = writeln!(
            out,
            "{} x{}  {}",
            item.title,
            item.quantity,
            format_amount(item.line_total())
        );
    }
    let _ = writeln!(
        out,
        "{} item(s), subtotal {}",
        cart.item_count(),
        format_amount(cart.subtotal())
    );
    out
}

#[cfg(test)]
mod tests {
    use catalog::Catalog;

    use super::*;

    #[test]
    fn prices_group_thousands() {
        assert_eq!(format_price(Some(450)), "$450");
        assert_eq!(format_price(Some(1200)), "$1,200");
        assert_eq!(format_price(Some(1_234_567)), "$1,234,567");
        assert_eq!(format_price(None), "Not for sale");
    }

    #[test]
    fn detail_offers_cart_only_for_priced_work() {
        let catalog = Catalog::bundled().unwrap();
        let priced = catalog.get(1).unwrap();
        let unpriced = catalog.get(5).unwrap();

        let detail = format_detail(priced, false);
        assert!(detail.starts_with(&format!("{} ({})", priced.title, priced.year)));
        assert!(detail.contains("[a] add to cart"));
        assert!(detail.contains("[w] save to wishlist"));

        let detail = format_detail(unpriced, true);
        assert!(detail.contains("Not for sale"));
        assert!(!detail.contains("[a]"));
        assert!(detail.contains("[w] remove from wishlist"));
    }

    #[test]
    fn listing_keeps_catalog_order() {
        let catalog = Catalog::bundled().unwrap();
        let listing = format_listing(catalog.artworks());
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), catalog.len());
        for (line, artwork) in lines.iter().zip(catalog.artworks()) {
            assert!(line.contains(&artwork.title));
        }
        assert_eq!(format_listing(&[]), "no artworks match this filter\n");
    }

    #[test]
    fn cart_summary_totals() {
        let catalog = Catalog::bundled().unwrap();
        let mut cart = Cart::new();
        assert_eq!(format_cart(&cart), "cart is empty\n");
        let first = catalog.get(1).unwrap();
        cart.add(first).unwrap();
        cart.add(first).unwrap();
        let summary = format_cart(&cart);
        let expected_total = u64::from(first.price.unwrap()) * 2;
        assert!(summary.contains(&format!("{} x2", first.title)));
        assert!(summary.contains(&format!("subtotal {}", format_amount(expected_total))));
    }
}
