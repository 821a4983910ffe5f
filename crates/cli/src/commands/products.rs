//! Catalog listing command.

use izeshop_storefront::db::{Database, ProductRepository};

/// Print catalog products as a table, newest first.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
#[allow(clippy::print_stdout)]
pub async fn list(db: &Database, query: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let products = ProductRepository::new(db).list().await?;
    let matching: Vec<_> = products
        .iter()
        .filter(|p| query.is_none_or(|q| p.matches_query(q)))
        .collect();

    println!("{:>5}  {:<32}  {:>12}  {}", "ID", "NAME", "PRICE", "CATEGORY");
    for product in &matching {
        println!(
            "{:>5}  {:<32}  {:>12}  {}",
            product.id.as_i64(),
            product.name,
            product.price,
            product.category
        );
    }

    tracing::info!(shown = matching.len(), total = products.len(), "Listed products");
    Ok(())
}
