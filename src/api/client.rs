use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::data::{NewProduct, Product};

// Relative, so they resolve beneath the base URL's path
const LIST_PRODUCTS_PATH: &str = "product/get-all-products";
const ADD_PRODUCT_PATH: &str = "product/add-product";

/// HTTP client for the product backend.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ProductApi {
    client: Client,
    base_url: Url,
}

impl ProductApi {
    /// `base_url` should end in `/` (as `Config` guarantees), otherwise
    /// its last path segment is replaced when endpoints are joined
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Transport(format!("invalid endpoint {path}: {e}")))
    }

    /// GET the full product list and decode every product image
    pub async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        let url = self.url(LIST_PRODUCTS_PATH)?;
        debug!("GET {url}");

        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        let mut products = decode_products(&body)?;

        // Base64 decoding of every image is CPU work; keep it off the executor
        products = tokio::task::spawn_blocking(move || {
            for product in &mut products {
                product.decode_image();
            }
            products
        })
        .await
        .map_err(|e| ApiError::Transport(format!("Task join error: {}", e)))?;

        info!("Fetched {} products", products.len());
        Ok(products)
    }

    /// POST a new product as multipart form data. The response body is ignored.
    pub async fn add_product(&self, product: NewProduct) -> Result<(), ApiError> {
        let url = self.url(ADD_PRODUCT_PATH)?;
        debug!("POST {url} ({} byte image)", product.image.size());

        let form = build_form(product)?;
        self.client
            .post(url)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/// Parse the JSON array returned by the list endpoint
pub fn decode_products(body: &[u8]) -> Result<Vec<Product>, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::Transport(format!("malformed product list: {}", e)))
}

fn build_form(product: NewProduct) -> Result<Form, ApiError> {
    let image = product.image;
    let part = Part::bytes(image.bytes)
        .file_name(image.file_name)
        .mime_str(&image.mime)?;

    Ok(Form::new()
        .text("productName", product.name)
        .text("productDescription", product.description)
        .text("productPrice", product.price)
        .part("productImage", part))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::SelectedImage;

    fn api(base: &str) -> ProductApi {
        ProductApi::new(Url::parse(base).unwrap())
    }

    #[test]
    fn test_urls_join_base_and_path() {
        let api = api("http://localhost:8080/");
        assert_eq!(
            api.url(LIST_PRODUCTS_PATH).unwrap().as_str(),
            "http://localhost:8080/product/get-all-products"
        );
        assert_eq!(
            api.url(ADD_PRODUCT_PATH).unwrap().as_str(),
            "http://localhost:8080/product/add-product"
        );
    }

    #[test]
    fn test_urls_keep_base_path_prefix() {
        let api = api("https://shop.example.com/api/v1/");
        assert_eq!(
            api.url(LIST_PRODUCTS_PATH).unwrap().as_str(),
            "https://shop.example.com/api/v1/product/get-all-products"
        );
    }

    #[test]
    fn test_urls_from_default_config() {
        let api = ProductApi::new(crate::config::Config::default().api_base_url);
        assert_eq!(
            api.url(ADD_PRODUCT_PATH).unwrap().as_str(),
            "http://localhost:8080/product/add-product"
        );
    }

    #[test]
    fn test_decode_products_keeps_server_order() {
        let body = br#"[
            {"productName": "Bandage", "productDescription": "Elastic", "productPrice": 40},
            {"productName": "Syringe", "productDescription": "5 ml", "productPrice": 8.5,
             "productImageData": null, "productUploadDate": "2024-06-01T09:30:00"}
        ]"#;

        let products = decode_products(body).unwrap();
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bandage", "Syringe"]);
        assert!(!products[0].is_new());
        assert!(products[1].is_new());
    }

    #[test]
    fn test_decode_products_tolerates_null_fields() {
        let body = br#"[
            {"productName": "Bandage", "productDescription": "Elastic", "productPrice": 40},
            {"productName": null, "productDescription": null, "productPrice": null}
        ]"#;

        let products = decode_products(body).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Bandage");
        assert_eq!(products[1].name, "");
        assert_eq!(products[1].price, 0.0);
    }

    #[test]
    fn test_decode_products_rejects_non_array() {
        let err = decode_products(br#"{"error": "boom"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn test_build_form_accepts_sniffed_mime() {
        let product = NewProduct {
            name: "Stethoscope".to_string(),
            description: "Dual head".to_string(),
            price: "899".to_string(),
            image: SelectedImage {
                file_name: "steth.png".to_string(),
                mime: "image/png".to_string(),
                bytes: vec![0x89, b'P', b'N', b'G'],
            },
        };

        assert!(build_form(product).is_ok());
    }
}
