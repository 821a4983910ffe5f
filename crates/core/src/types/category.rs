//! Categories derived from the catalog on read.

use serde::Serialize;

use super::product::Product;

/// A catalog category as shown in the category browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub title: String,
    /// Number of products carrying this category label.
    pub count: usize,
    /// Image of the first product seen in the category.
    pub img: String,
    /// Material Symbols icon name.
    pub icon: &'static str,
}

/// Keyword table for category icons; first match wins.
const ICON_KEYWORDS: &[(&[&str], &str)] = &[
    (&["eletrônicos", "áudio", "vídeo"], "devices"),
    (&["saúde", "bem-estar"], "spa"),
    (&["esportes", "fitness"], "fitness_center"),
    (&["casa", "jardim"], "yard"),
    (&["beleza", "cuidados"], "face"),
    (&["cozinha", "utilidades"], "kitchen"),
    (&["pets", "animais"], "pets"),
    (&["segurança"], "security"),
    (&["brinquedos", "crianças", "bebês"], "child_care"),
    (&["bolsas", "acessórios"], "shopping_bag"),
];

const DEFAULT_ICON: &str = "grid_view";

/// Pick an icon for a category title.
#[must_use]
pub fn icon_for(title: &str) -> &'static str {
    let lower = title.to_lowercase();
    ICON_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map_or(DEFAULT_ICON, |(_, icon)| *icon)
}

/// Group products by exact category label, in first-seen order.
#[must_use]
pub fn aggregate_categories(products: &[Product]) -> Vec<Category> {
    let mut categories: Vec<Category> = Vec::new();

    for product in products {
        if let Some(existing) = categories
            .iter_mut()
            .find(|c| c.title == product.category)
        {
            existing.count += 1;
        } else {
            categories.push(Category {
                title: product.category.clone(),
                count: 1,
                img: product.img.clone(),
                icon: icon_for(&product.category),
            });
        }
    }

    categories
}
