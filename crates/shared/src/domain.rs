use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(ProductId);

/// Selector value that orders the catalog from cheapest to most expensive.
pub const LOW_TO_HIGH: &str = "low-to-high";
/// The other value offered by the sort selector.
pub const HIGH_TO_LOW: &str = "high-to-low";

/// A catalog entry as served by the product API. Read-only on our side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Only integer ids are kept; anything else the API sends is dropped.
    #[serde(default, deserialize_with = "integer_id_or_none")]
    pub id: Option<ProductId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Integer(i64),
    Other(IgnoredAny),
}

fn integer_id_or_none<'de, D>(deserializer: D) -> Result<Option<ProductId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Integer(id)) => Some(ProductId(id)),
        Some(RawId::Other(_)) | None => None,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Product {
    /// Thumbnail if set, else the first image, else empty.
    pub fn image_source(&self) -> &str {
        self.thumbnail
            .as_deref()
            .filter(|src| !src.is_empty())
            .or_else(|| self.images.first().map(String::as_str))
            .unwrap_or_default()
    }
}

pub type Collection = Vec<Product>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Raw value of the price sort selector.
///
/// Only [`LOW_TO_HIGH`] sorts ascending; every other value, including ones the
/// selector never offers, sorts descending.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSelection(String);

impl SortSelection {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn direction(&self) -> SortDirection {
        if self.0 == LOW_TO_HIGH {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }
}

impl Default for SortSelection {
    fn default() -> Self {
        Self::new(LOW_TO_HIGH)
    }
}

impl std::fmt::Display for SortSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(thumbnail: Option<&str>, images: &[&str]) -> Product {
        Product {
            id: Some(ProductId(1)),
            title: "Lamp".to_string(),
            price: 12.5,
            thumbnail: thumbnail.map(str::to_string),
            images: images.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn image_source_prefers_thumbnail() {
        assert_eq!(product(Some("t.png"), &["a.png"]).image_source(), "t.png");
    }

    #[test]
    fn image_source_falls_back_to_first_image() {
        assert_eq!(product(None, &["a.png", "b.png"]).image_source(), "a.png");
        assert_eq!(product(Some(""), &["a.png"]).image_source(), "a.png");
    }

    #[test]
    fn image_source_is_empty_without_thumbnail_or_images() {
        assert_eq!(product(None, &[]).image_source(), "");
        assert_eq!(product(Some(""), &[]).image_source(), "");
    }

    #[test]
    fn only_low_to_high_sorts_ascending() {
        assert_eq!(
            SortSelection::new(LOW_TO_HIGH).direction(),
            SortDirection::Ascending
        );
        assert_eq!(
            SortSelection::new(HIGH_TO_LOW).direction(),
            SortDirection::Descending
        );
        assert_eq!(
            SortSelection::new("by-rating").direction(),
            SortDirection::Descending
        );
        assert_eq!(SortSelection::new("").direction(), SortDirection::Descending);
        assert_eq!(SortSelection::default().as_str(), LOW_TO_HIGH);
    }

    #[test]
    fn decodes_sparse_product_records() {
        let product: Product = serde_json::from_str(
            r#"{"title":"A","price":5,"thumbnail":null,"brand":"Acme"}"#,
        )
        .expect("decode");
        assert_eq!(product.id, None);
        assert_eq!(product.price, 5.0);
        assert!(product.images.is_empty());
        assert_eq!(product.image_source(), "");
    }

    #[test]
    fn non_integer_ids_are_dropped_not_rejected() {
        let product: Product =
            serde_json::from_str(r#"{"id":"sku-1","title":"A","price":5}"#).expect("decode");
        assert_eq!(product.id, None);
        assert_eq!(product.title, "A");

        let product: Product =
            serde_json::from_str(r#"{"id":{"sku":1},"title":"B","price":1.5}"#).expect("decode");
        assert_eq!(product.id, None);

        let product: Product =
            serde_json::from_str(r#"{"id":42,"title":"C","price":2}"#).expect("decode");
        assert_eq!(product.id, Some(ProductId(42)));
    }

    #[test]
    fn null_title_and_images_decode_as_empty() {
        let product: Product = serde_json::from_str(
            r#"{"id":3,"title":null,"price":7,"thumbnail":"t.png","images":null}"#,
        )
        .expect("decode");
        assert_eq!(product.title, "");
        assert!(product.images.is_empty());
        assert_eq!(product.image_source(), "t.png");
    }

    #[test]
    fn price_is_required() {
        assert!(serde_json::from_str::<Product>(r#"{"title":"A"}"#).is_err());
    }
}
