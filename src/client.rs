//! HTTP collaborators: product fetch and session check.
//!
//! The projection engine never talks to the network; this client hands it a
//! fully materialized [`ProductRecord`]. Retries and session management are
//! left to the caller.

use crate::config::Config;
use crate::error::ClientError;
use crate::record::ProductRecord;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Row of the product list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProductSummaryRow")]
pub struct ProductSummary {
    pub gtin: String,
    pub name: String,
    pub status: Option<String>,
    pub category: Option<String>,
}

/// Wire form of a list row; either spelling of GTIN and name may be present.
#[derive(Debug, Deserialize)]
struct ProductSummaryRow {
    #[serde(default)]
    gtin: Option<String>,
    #[serde(default)]
    gtin13: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

impl From<ProductSummaryRow> for ProductSummary {
    fn from(row: ProductSummaryRow) -> Self {
        let first_non_empty = |a: Option<String>, b: Option<String>| {
            a.filter(|s| !s.is_empty())
                .or(b.filter(|s| !s.is_empty()))
                .unwrap_or_default()
        };
        Self {
            gtin: first_non_empty(row.gtin, row.gtin13),
            name: first_non_empty(row.name, row.product_name),
            status: row.status,
            category: row.category,
        }
    }
}

/// Role of the signed-in user; only used for route gating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    User,
    Other(String),
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        match role.to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "user" => Role::User,
            _ => Role::Other(role),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => "admin".to_string(),
            Role::User => "user".to_string(),
            Role::Other(other) => other,
        }
    }
}

/// The user behind the current bearer credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
struct AuthCheckResponse {
    user: SessionUser,
}

/// Client for the product backend.
#[derive(Debug, Clone)]
pub struct ProductClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl ProductClient {
    pub fn new(http: reqwest::Client, api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self::new(http, &config.api_url, config.api_token.clone()))
    }

    /// `GET /products/{gtin}`
    pub async fn get_product(&self, gtin: &str) -> Result<ProductRecord, ClientError> {
        info!("Fetching product {}", gtin);
        let body = self.get_json(&format!("/products/{}", gtin), Some(gtin)).await?;
        let record = ProductRecord::from_value(&body)?;
        debug!(
            "Product {} has {} languages and {} categories",
            gtin,
            record.languages.len(),
            record.categories.len()
        );
        Ok(record)
    }

    /// `GET /products/short`
    pub async fn list_products(&self) -> Result<Vec<ProductSummary>, ClientError> {
        let body = self.get_json("/products/short", None).await?;
        let products: Vec<ProductSummary> = serde_json::from_value(body)?;
        info!("Fetched {} products", products.len());
        Ok(products)
    }

    /// `GET /auth/check`
    pub async fn who_am_i(&self) -> Result<SessionUser, ClientError> {
        let body = self.get_json("/auth/check", None).await?;
        let response: AuthCheckResponse = serde_json::from_value(body)?;
        Ok(response.user)
    }

    async fn get_json(&self, path: &str, product: Option<&str>) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.api_url, path);
        let mut request = self.http.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(gtin) = product {
                return Err(ClientError::NotFound(gtin.to_string()));
            }
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server: &MockServer, token: Option<&str>) -> ProductClient {
        ProductClient::new(
            reqwest::Client::new(),
            format!("{}/api/", server.uri()),
            token.map(str::to_string),
        )
    }

    // ==================== Role Tests ====================

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from("admin".to_string()), Role::Admin);
        assert_eq!(Role::from("ADMIN".to_string()), Role::Admin);
        assert_eq!(Role::from("user".to_string()), Role::User);
        assert_eq!(Role::from("auditor".to_string()), Role::Other("auditor".to_string()));
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
    }

    #[test]
    fn test_role_roundtrip_through_json() {
        let user: SessionUser =
            serde_json::from_value(json!({"id": 3, "email": "a@b.c", "role": "admin"})).unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(serde_json::to_value(&user.role).unwrap(), json!("admin"));
    }

    #[test]
    fn test_product_summary_aliases() {
        let summary: ProductSummary =
            serde_json::from_value(json!({"gtin13": "1", "product_name": "Tea", "extra": true}))
                .unwrap();
        assert_eq!(summary.gtin, "1");
        assert_eq!(summary.name, "Tea");
        assert!(summary.status.is_none());
    }

    // ==================== get_product Tests ====================

    #[tokio::test]
    async fn test_get_product_success_with_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/04012345678901"))
            .and(header("Authorization", "Bearer token-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "product": {"gtin13": "04012345678901"},
                "languages": ["eng"],
                "values": {},
                "categories": {}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("token-123"));
        let record = client.get_product("04012345678901").await.expect("Should fetch");
        assert_eq!(record.gtin(), Some("04012345678901"));
        assert_eq!(record.languages, vec!["eng".to_string()]);
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/000"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server, None).get_product("000").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(ref gtin) if gtin == "000"));
    }

    #[tokio::test]
    async fn test_get_product_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/1"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client_for(&server, None).get_product("1").await.unwrap_err();
        assert!(err.is_auth_failure());
    }

    #[tokio::test]
    async fn test_get_product_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal error"))
            .mount(&server)
            .await;

        let err = client_for(&server, None).get_product("1").await.unwrap_err();
        match err {
            ClientError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "Internal error");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_product_non_object_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
            .mount(&server)
            .await;

        let err = client_for(&server, None).get_product("1").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidRecord(_)));
    }

    #[tokio::test]
    async fn test_get_product_invalid_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server, None).get_product("1").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    // ==================== list_products / who_am_i Tests ====================

    #[tokio::test]
    async fn test_list_products() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/short"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"gtin": "1", "name": "Tea", "status": "active"},
                {"gtin13": "2", "product_name": "Coffee"}
            ])))
            .mount(&server)
            .await;

        let products = client_for(&server, None).list_products().await.expect("Should list");
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].status.as_deref(), Some("active"));
        assert_eq!(products[1].name, "Coffee");
    }

    #[test]
    fn test_product_summary_prefers_plain_keys() {
        let summary: ProductSummary = serde_json::from_value(json!({
            "gtin": "", "gtin13": "04012345678901", "name": "Tea", "product_name": "Green tea"
        }))
        .unwrap();
        assert_eq!(summary.gtin, "04012345678901");
        assert_eq!(summary.name, "Tea");
    }

    #[tokio::test]
    async fn test_list_products_rows_with_both_spellings() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/short"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"gtin": "1", "name": "A"},
                {"gtin": "2", "gtin13": "2", "name": "B", "product_name": "B"}
            ])))
            .mount(&server)
            .await;

        let products = client_for(&server, None).list_products().await.expect("Should list");
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].gtin, "2");
        assert_eq!(products[1].name, "B");
    }

    #[tokio::test]
    async fn test_list_products_404_is_http_error() {
        let server = MockServer::start().await;
        let err = client_for(&server, None).list_products().await.unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_who_am_i() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/check"))
            .and(header("Authorization", "Bearer t"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": {"id": "u1", "email": "admin@example.com", "role": "admin"}
            })))
            .mount(&server)
            .await;

        let user = client_for(&server, Some("t")).who_am_i().await.expect("Should check");
        assert!(user.role.is_admin());
        assert_eq!(user.email.as_deref(), Some("admin@example.com"));
    }
}
