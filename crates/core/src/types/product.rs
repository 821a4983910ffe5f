//! Catalog products and the admin form payload.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::normalize_price_label;

/// A catalog product as served to the storefront.
///
/// `price` and `old_price` are display labels, not amounts. Use
/// [`parse_price`](super::price::parse_price) when arithmetic is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    /// Price before a discount, shown struck through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<String>,
    pub category: String,
    #[serde(default)]
    pub rating: f64,
    /// Number of customer reviews.
    #[serde(default)]
    pub reviews: i64,
    /// Sale badge such as `"NEW"` or `"20% OFF"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Image URL or `/uploads/...` path.
    #[serde(default)]
    pub img: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    /// Case-insensitive substring match on the name or the category.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.category.to_lowercase().contains(&query)
    }

    /// One-line summary used as language model context.
    #[must_use]
    pub fn context_line(&self) -> String {
        format!("{} ({}): {}", self.name, self.category, self.price)
    }
}

/// Errors raised while validating an admin product form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductInputError {
    /// A required field was missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Raw product fields as submitted by the admin form.
///
/// Every field arrives as text; blank strings mean "not set".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductInput {
    pub name: String,
    pub price: String,
    pub category: String,
    pub img: String,
    pub description: String,
    pub tag: String,
    pub old_price: String,
}

/// A validated product ready to be written to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub price: String,
    pub category: String,
    pub img: String,
    pub description: Option<String>,
    pub tag: Option<String>,
    pub old_price: Option<String>,
}

impl ProductInput {
    /// Trim, auto-format prices and validate required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ProductInputError::MissingField`] when the name, price or
    /// category is blank.
    pub fn normalize(&self) -> Result<ProductDraft, ProductInputError> {
        let name = required(&self.name, "name")?;
        let price = normalize_price_label(&self.price).ok_or(ProductInputError::MissingField("price"))?;
        let category = required(&self.category, "category")?;

        Ok(ProductDraft {
            name,
            price,
            category,
            img: self.img.trim().to_owned(),
            description: optional(&self.description),
            tag: optional(&self.tag),
            old_price: normalize_price_label(&self.old_price),
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ProductInputError> {
    optional(value).ok_or(ProductInputError::MissingField(field))
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(name: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(1),
            name: name.to_string(),
            price: "R$299.00".to_string(),
            old_price: None,
            category: category.to_string(),
            rating: 4.5,
            reviews: 128,
            tag: None,
            img: "https://example.com/a.jpg".to_string(),
            description: None,
        }
    }

    #[test]
    fn test_matches_query_on_name_or_category() {
        let p = product("Acoustic Pro Max", "Eletrônicos, Áudio e Vídeo");
        assert!(p.matches_query("acoustic"));
        assert!(p.matches_query("PRO"));
        assert!(p.matches_query("áudio"));
        assert!(p.matches_query("ÁUDIO"));
        assert!(!p.matches_query("laptop"));
    }

    #[test]
    fn test_serializes_camel_case_and_skips_absent_optionals() {
        let mut p = product("Nitro Run Red", "Esportes e Fitness");
        p.old_price = Some("R$110.00".to_string());

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["oldPrice"], "R$110.00");
        assert!(json.get("tag").is_none());
        assert!(json.get("description").is_none());
        assert_eq!(json["reviews"], 128);
    }

    #[test]
    fn test_context_line() {
        let p = product("SleekTime V2", "Saúde e Bem-estar");
        assert_eq!(p.context_line(), "SleekTime V2 (Saúde e Bem-estar): R$299.00");
    }

    #[test]
    fn test_normalize_formats_prices_and_blanks() {
        let input = ProductInput {
            name: "  Chef's Knife ".to_string(),
            price: "85.00".to_string(),
            category: "Cozinha e Utilidades".to_string(),
            img: String::new(),
            description: "   ".to_string(),
            tag: String::new(),
            old_price: "R$99.00".to_string(),
        };

        let draft = input.normalize().unwrap();
        assert_eq!(draft.name, "Chef's Knife");
        assert_eq!(draft.price, "R$85.00");
        assert_eq!(draft.old_price.as_deref(), Some("R$99.00"));
        assert_eq!(draft.description, None);
        assert_eq!(draft.tag, None);
    }

    #[test]
    fn test_normalize_requires_fields() {
        let input = ProductInput {
            name: "Vase".to_string(),
            price: " ".to_string(),
            category: "Casa e Jardim".to_string(),
            ..ProductInput::default()
        };
        assert_eq!(
            input.normalize(),
            Err(ProductInputError::MissingField("price"))
        );

        let input = ProductInput {
            price: "10".to_string(),
            category: "Casa".to_string(),
            ..ProductInput::default()
        };
        assert_eq!(input.normalize(), Err(ProductInputError::MissingField("name")));
    }
}
