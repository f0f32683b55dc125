/// State management module
///
/// This module handles all client-side state:
/// - Shared data structures (data.rs)
/// - The product catalog and search filter (catalog.rs)
/// - The add-product form and its submission lifecycle (draft.rs)
/// - Image preview resources for the form (preview.rs)

pub mod catalog;
pub mod data;
pub mod draft;
pub mod preview;
