//! Default catalog seeding.

use izeshop_storefront::db::{Database, ProductRepository};

/// Insert the bundled default catalog.
///
/// # Arguments
///
/// * `if_empty` - Skip when the catalog already has products
///
/// # Errors
///
/// Returns an error if the schema cannot be created or an insert fails.
pub async fn run(db: &Database, if_empty: bool) -> Result<(), Box<dyn std::error::Error>> {
    db.init_schema().await?;
    let repo = ProductRepository::new(db);

    let inserted = if if_empty {
        repo.seed_defaults().await?
    } else {
        repo.insert_defaults().await?
    };

    if inserted == 0 {
        tracing::info!("Catalog already has products, nothing seeded");
    } else {
        tracing::info!(inserted, total = repo.count().await?, "Seeded default catalog");
    }
    Ok(())
}
