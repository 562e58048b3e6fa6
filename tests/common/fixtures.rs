//! Catalog fixtures and mock API helpers

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::CATALOG_PATH;

/// Image payload served by the mock API
pub const PNG_BYTES: &[u8] = b"PNG...";

/// Catalog body listing `names`, each served from `/images/<name>` on `server`
pub fn catalog_json(server: &MockServer, names: &[&str]) -> String {
    let products: Vec<_> = names
        .iter()
        .map(|name| {
            serde_json::json!({
                "name": name,
                "url": format!("{}/images/{}", server.uri(), name),
            })
        })
        .collect();
    serde_json::json!({ "products": products }).to_string()
}

/// Serve `body` as the catalog with HTTP 200
pub async fn mount_catalog(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Serve `/images/<name>` with the given status and [`PNG_BYTES`]
pub async fn mount_image(server: &MockServer, name: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/images/{}", name)))
        .respond_with(ResponseTemplate::new(status).set_body_bytes(PNG_BYTES.to_vec()))
        .mount(server)
        .await;
}

/// Accept every S3 `PutObject` on `server`
pub async fn mount_bucket(server: &MockServer) {
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}
