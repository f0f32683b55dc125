/// User interface module
///
/// - Landing header (header.rs)
/// - Product grid, search bar and empty/error states (catalog.rs)
/// - Individual product tiles (card.rs)
/// - Add-product modal (add_product.rs)

pub mod add_product;
pub mod card;
pub mod catalog;
pub mod header;
