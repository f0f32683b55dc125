/// Backend access module
///
/// This module handles:
/// - Talking to the product REST backend (client.rs)
/// - Loading product images picked from disk (image_file.rs)

pub mod client;
pub mod image_file;

pub use client::ProductApi;
