//! Turning a collection into cards on a display surface.

use serde::Serialize;
use shared::{
    domain::{Product, SortDirection, SortSelection},
    error::ErrorCode,
};

/// Capability interface for whatever presents the catalog.
///
/// The product area holds either cards or a single notice; the validation line
/// is independent of it.
pub trait DisplaySurface {
    fn clear(&mut self);
    fn append_card(&mut self, card: ProductCard);
    fn show_notice(&mut self, text: &str);
    /// An empty `text` clears the line.
    fn set_validation_message(&mut self, text: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCard {
    pub image_src: String,
    pub alt: String,
    pub title: String,
    pub price: String,
}

impl ProductCard {
    pub fn for_product(product: &Product) -> Self {
        Self {
            image_src: product.image_source().to_string(),
            alt: product.title.clone(),
            title: product.title.clone(),
            price: format_price(product.price),
        }
    }
}

/// `"$"` followed by the number as-is: no rounding, no locale grouping.
pub fn format_price(price: f64) -> String {
    format!("${}", number_text(price))
}

/// Number-to-text the way a browser stringifies it: shortest round-trip
/// digits, exponent form from 1e21 up and below 1e-6.
fn number_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }
    let scientific = format!("{value:e}");
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => scientific,
    }
}

/// Copy of `products` ordered by price. Stable, so equal prices keep their
/// relative order in both directions.
pub fn sorted_by_price(products: &[Product], direction: SortDirection) -> Vec<&Product> {
    let mut sorted: Vec<&Product> = products.iter().collect();
    match direction {
        SortDirection::Ascending => sorted.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortDirection::Descending => sorted.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }
    sorted
}

/// Replaces the product area with one card per product, or the "no results"
/// notice. With `order` set the cards follow price order; `products` itself is
/// left as it was. Returns the number of cards rendered.
pub fn render_collection(
    products: &[Product],
    order: Option<&SortSelection>,
    surface: &mut dyn DisplaySurface,
) -> usize {
    surface.clear();
    if products.is_empty() {
        surface.show_notice(ErrorCode::NoResults.message());
        return 0;
    }

    let ordered = match order {
        Some(selection) => sorted_by_price(products, selection.direction()),
        None => products.iter().collect(),
    };
    for product in &ordered {
        surface.append_card(ProductCard::for_product(product));
    }
    ordered.len()
}

/// In-memory surface. Keeps exactly what a screen would show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordingSurface {
    pub cards: Vec<ProductCard>,
    pub notice: Option<String>,
    pub validation_message: String,
    #[serde(skip)]
    pub clears: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.cards.iter().map(|card| card.title.as_str()).collect()
    }
}

impl DisplaySurface for RecordingSurface {
    fn clear(&mut self) {
        self.cards.clear();
        self.notice = None;
        self.clears += 1;
    }

    fn append_card(&mut self, card: ProductCard) {
        self.cards.push(card);
    }

    fn show_notice(&mut self, text: &str) {
        self.cards.clear();
        self.notice = Some(text.to_string());
    }

    fn set_validation_message(&mut self, text: &str) {
        self.validation_message = text.to_string();
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
