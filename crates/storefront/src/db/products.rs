//! Product repository for catalog operations.
//!
//! Queries are built at runtime so the same code runs against either backend.

use serde::Deserialize;

use izeshop_core::{Product, ProductDraft, ProductId};

use super::{Database, RepositoryError};

const SELECT_COLUMNS: &str =
    "SELECT id, name, price, category, rating, reviews, img, description, tag, old_price FROM products";

/// Default catalog inserted into an empty store.
const SEED_CATALOG: &str = include_str!("../../seed/products.json");

/// Database row for a product.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: String,
    category: String,
    rating: f64,
    reviews: i64,
    img: String,
    description: Option<String>,
    tag: Option<String>,
    old_price: Option<String>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        if !row.rating.is_finite() {
            return Err(RepositoryError::DataCorruption(format!(
                "invalid rating for product {}: {}",
                row.id, row.rating
            )));
        }
        if row.reviews < 0 {
            return Err(RepositoryError::DataCorruption(format!(
                "negative review count for product {}",
                row.id
            )));
        }

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            price: row.price,
            old_price: row.old_price,
            category: row.category,
            rating: row.rating,
            reviews: row.reviews,
            tag: row.tag,
            img: row.img,
            description: row.description,
        })
    }
}

/// Entry in the bundled default catalog.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedProduct {
    name: String,
    price: String,
    category: String,
    rating: f64,
    reviews: i64,
    img: String,
    description: Option<String>,
    tag: Option<String>,
    old_price: Option<String>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    db: &'a Database,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List every product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is invalid.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        self.fetch_ordered("DESC").await
    }

    /// List every product in insertion order.
    ///
    /// # Errors
    ///
    /// Same as [`ProductRepository::list`].
    pub async fn list_oldest_first(&self) -> Result<Vec<Product>, RepositoryError> {
        self.fetch_ordered("ASC").await
    }

    async fn fetch_ordered(&self, direction: &str) -> Result<Vec<Product>, RepositoryError> {
        let query = format!("{SELECT_COLUMNS} ORDER BY id {direction}");
        let rows: Vec<ProductRow> = sqlx::query_as(&query)
            .fetch_all(self.db.pool())
            .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let query = self
            .db
            .backend()
            .sql(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .into_owned();
        let row: Option<ProductRow> = sqlx::query_as(&query)
            .bind(id.as_i64())
            .fetch_optional(self.db.pool())
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Insert a product. Rating and review count start at zero.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let id = self.insert(draft, 0.0, 0).await?;

        self.get(id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("product {id} missing after insert"))
        })
    }

    async fn insert(
        &self,
        draft: &ProductDraft,
        rating: f64,
        reviews: i64,
    ) -> Result<ProductId, RepositoryError> {
        let query = self.db.backend().sql(
            "INSERT INTO products (name, price, category, rating, reviews, img, description, tag, old_price)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING id",
        );
        let id: i64 = sqlx::query_scalar(&query)
            .bind(&draft.name)
            .bind(&draft.price)
            .bind(&draft.category)
            .bind(rating)
            .bind(reviews)
            .bind(&draft.img)
            .bind(draft.description.as_deref())
            .bind(draft.tag.as_deref())
            .bind(draft.old_price.as_deref())
            .fetch_one(self.db.pool())
            .await?;

        Ok(ProductId::new(id))
    }

    /// Replace a product's editable fields. Rating and reviews are kept.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        let query = self.db.backend().sql(
            "UPDATE products
             SET name = ?, price = ?, category = ?, img = ?, description = ?, tag = ?, old_price = ?
             WHERE id = ?",
        );
        let result = sqlx::query(&query)
            .bind(&draft.name)
            .bind(&draft.price)
            .bind(&draft.category)
            .bind(&draft.img)
            .bind(draft.description.as_deref())
            .bind(draft.tag.as_deref())
            .bind(draft.old_price.as_deref())
            .bind(id.as_i64())
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let query = self.db.backend().sql("DELETE FROM products WHERE id = ?");
        let result = sqlx::query(&query)
            .bind(id.as_i64())
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Whether any product still uses this image path.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn image_in_use(&self, img: &str) -> Result<bool, RepositoryError> {
        let query = self
            .db
            .backend()
            .sql("SELECT COUNT(*) FROM products WHERE img = ?");
        let count: i64 = sqlx::query_scalar(&query)
            .bind(img)
            .fetch_one(self.db.pool())
            .await?;
        Ok(count > 0)
    }

    /// Count products in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }

    /// Insert the default catalog when the store is empty.
    ///
    /// Returns the number of products inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if the bundled catalog is malformed.
    pub async fn seed_defaults(&self) -> Result<usize, RepositoryError> {
        if self.count().await? > 0 {
            return Ok(0);
        }
        self.insert_defaults().await
    }

    /// Insert the default catalog unconditionally.
    ///
    /// # Errors
    ///
    /// Same as [`ProductRepository::seed_defaults`].
    pub async fn insert_defaults(&self) -> Result<usize, RepositoryError> {
        let seed: Vec<SeedProduct> = serde_json::from_str(SEED_CATALOG).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid default catalog: {e}"))
        })?;

        let total = seed.len();
        for product in seed {
            let draft = ProductDraft {
                name: product.name,
                price: product.price,
                category: product.category,
                img: product.img,
                description: product.description,
                tag: product.tag,
                old_price: product.old_price,
            };
            self.insert(&draft, product.rating, product.reviews).await?;
        }

        tracing::info!(count = total, "Seeded default catalog");
        Ok(total)
    }
}
