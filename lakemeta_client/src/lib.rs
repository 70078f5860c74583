//! HTTP client for the LakeMeta catalog service
//!
//! Implements [`CatalogClient`] against the catalog's REST API. Status
//! codes carry the interesting outcomes: `404` maps to
//! [`CatalogError::NotFound`], `409` to [`CatalogError::AlreadyExists`],
//! anything else unexpected to [`CatalogError::Remote`] with the response
//! text attached.

use async_trait::async_trait;
use reqwest::{IntoUrl, Method, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use url::Url;

use lakemeta_catalog::descriptor::StorageDescriptor;
use lakemeta_catalog::interface::{CatalogClient, CatalogError, Partition, TableMeta};

/// Primary error type for the [`Client`]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("base URL error: {0}")]
    BaseUrl(#[source] reqwest::Error),

    #[error("request URL error: {0}")]
    RequestUrl(#[from] url::ParseError),

    #[error("failed to parse JSON response: {0}")]
    Json(#[source] reqwest::Error),

    #[error("failed to parse plaintext response: {0}")]
    Text(#[source] reqwest::Error),

    #[error("server responded with error [{code}]: {message}")]
    ApiError { code: StatusCode, message: String },

    #[error("failed to send {method} {url} request: {source}")]
    RequestSend {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl Error {
    fn request_send(method: Method, url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::RequestSend {
            method,
            url: url.into(),
            source,
        }
    }
}

impl From<Error> for CatalogError {
    fn from(error: Error) -> Self {
        match error {
            Error::ApiError {
                code: StatusCode::NOT_FOUND,
                ..
            } => Self::NotFound,
            Error::ApiError {
                code: StatusCode::CONFLICT,
                ..
            } => Self::AlreadyExists,
            other => Self::remote(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Client for the LakeMeta catalog HTTP API
#[derive(Debug, Clone)]
pub struct Client {
    /// The base URL of the catalog service
    base_url: Url,
    /// The `Bearer` token to use for authenticating on each request
    auth_token: Option<Secret<String>>,
    /// A [`reqwest::Client`] for handling HTTP requests
    http_client: reqwest::Client,
}

#[derive(Serialize)]
struct PartitionReq<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    catalog_id: Option<&'a str>,
    database: &'a str,
    table: &'a str,
    values: &'a [String],
}

#[derive(Serialize)]
struct CreatePartitionReq<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    catalog_id: Option<&'a str>,
    database: &'a str,
    table: &'a str,
    values: &'a [String],
    descriptor: &'a StorageDescriptor,
}

#[derive(Serialize)]
struct TableReq<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    catalog_id: Option<&'a str>,
    database: &'a str,
    table: &'a str,
}

impl Client {
    /// Create a new [`Client`]
    pub fn new<U: IntoUrl>(base_url: U) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into_url().map_err(Error::BaseUrl)?,
            auth_token: None,
            http_client: reqwest::Client::new(),
        })
    }

    /// Set the `Bearer` token that will be sent with each request
    ///
    /// # Example
    /// ```
    /// # use lakemeta_client::Client;
    /// # fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    /// let token = "secret-token-string";
    /// let client = Client::new("http://localhost:8181")?
    ///     .with_auth_token(token);
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_auth_token<S: Into<String>>(mut self, auth_token: S) -> Self {
        self.auth_token = Some(Secret::new(auth_token.into()));
        self
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder> {
        let url = self.base_url.join(path)?;
        let mut req = self.http_client.request(method, url);
        if let Some(token) = &self.auth_token {
            req = req.bearer_auth(token.expose_secret());
        }
        Ok(req)
    }

    /// Send a request to the `POST /api/v1/partition/find` API
    pub async fn api_v1_partition_find(
        &self,
        catalog_id: Option<&str>,
        database: &str,
        table: &str,
        values: &[String],
    ) -> Result<Partition> {
        const PATH: &str = "/api/v1/partition/find";
        let resp = self
            .request(Method::POST, PATH)?
            .json(&PartitionReq {
                catalog_id,
                database,
                table,
                values,
            })
            .send()
            .await
            .map_err(|src| Error::request_send(Method::POST, PATH, src))?;
        match resp.status() {
            StatusCode::OK => resp.json().await.map_err(Error::Json),
            code => Err(Error::ApiError {
                code,
                message: resp.text().await.map_err(Error::Text)?,
            }),
        }
    }

    /// Send a request to the `POST /api/v1/partition` API
    pub async fn api_v1_partition_create(
        &self,
        catalog_id: Option<&str>,
        database: &str,
        table: &str,
        values: &[String],
        descriptor: &StorageDescriptor,
    ) -> Result<()> {
        const PATH: &str = "/api/v1/partition";
        let resp = self
            .request(Method::POST, PATH)?
            .json(&CreatePartitionReq {
                catalog_id,
                database,
                table,
                values,
                descriptor,
            })
            .send()
            .await
            .map_err(|src| Error::request_send(Method::POST, PATH, src))?;
        match resp.status() {
            StatusCode::OK | StatusCode::CREATED => Ok(()),
            code => Err(Error::ApiError {
                code,
                message: resp.text().await.map_err(Error::Text)?,
            }),
        }
    }

    /// Send a request to the `DELETE /api/v1/partition` API
    pub async fn api_v1_partition_delete(
        &self,
        catalog_id: Option<&str>,
        database: &str,
        table: &str,
        values: &[String],
    ) -> Result<()> {
        const PATH: &str = "/api/v1/partition";
        let resp = self
            .request(Method::DELETE, PATH)?
            .json(&PartitionReq {
                catalog_id,
                database,
                table,
                values,
            })
            .send()
            .await
            .map_err(|src| Error::request_send(Method::DELETE, PATH, src))?;
        match resp.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            code => Err(Error::ApiError {
                code,
                message: resp.text().await.map_err(Error::Text)?,
            }),
        }
    }

    /// Send a request to the `POST /api/v1/table/find` API
    pub async fn api_v1_table_find(
        &self,
        catalog_id: Option<&str>,
        database: &str,
        table: &str,
    ) -> Result<TableMeta> {
        const PATH: &str = "/api/v1/table/find";
        let resp = self
            .request(Method::POST, PATH)?
            .json(&TableReq {
                catalog_id,
                database,
                table,
            })
            .send()
            .await
            .map_err(|src| Error::request_send(Method::POST, PATH, src))?;
        match resp.status() {
            StatusCode::OK => resp.json().await.map_err(Error::Json),
            code => Err(Error::ApiError {
                code,
                message: resp.text().await.map_err(Error::Text)?,
            }),
        }
    }
}

#[async_trait]
impl CatalogClient for Client {
    async fn get_partition(
        &self,
        catalog_id: Option<&str>,
        database: &str,
        table: &str,
        values: &[String],
    ) -> std::result::Result<Partition, CatalogError> {
        Ok(self
            .api_v1_partition_find(catalog_id, database, table, values)
            .await?)
    }

    async fn create_partition(
        &self,
        catalog_id: Option<&str>,
        database: &str,
        table: &str,
        values: &[String],
        descriptor: &StorageDescriptor,
    ) -> std::result::Result<(), CatalogError> {
        Ok(self
            .api_v1_partition_create(catalog_id, database, table, values, descriptor)
            .await?)
    }

    async fn delete_partition(
        &self,
        catalog_id: Option<&str>,
        database: &str,
        table: &str,
        values: &[String],
    ) -> std::result::Result<(), CatalogError> {
        Ok(self
            .api_v1_partition_delete(catalog_id, database, table, values)
            .await?)
    }

    async fn get_table(
        &self,
        catalog_id: Option<&str>,
        database: &str,
        table: &str,
    ) -> std::result::Result<TableMeta, CatalogError> {
        Ok(self.api_v1_table_find(catalog_id, database, table).await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use mockito::{Matcher, Server};
    use serde_json::json;

    use lakemeta_catalog::descriptor::StorageDescriptor;
    use lakemeta_catalog::interface::{CatalogClient, CatalogError};

    use crate::Client;

    #[tokio::test]
    async fn api_v1_partition_find() {
        let token = "super-secret-token";

        let mut mock_server = Server::new_async().await;
        let mock = mock_server
            .mock("POST", "/api/v1/partition/find")
            .match_header("Authorization", format!("Bearer {token}").as_str())
            .match_body(Matcher::Json(json!({
                "database": "sales",
                "table": "events",
                "values": ["2025-11-24"],
            })))
            .with_status(200)
            .with_body(
                r#"{
                    "values": ["2025-11-24"],
                    "location": "s3://data-lake/raw/events/date=2025-11-24/",
                    "created_at": "2025-11-24T12:00:00Z"
                }"#,
            )
            .create_async()
            .await;

        let client = Client::new(mock_server.url())
            .expect("create client")
            .with_auth_token(token);

        let partition = client
            .api_v1_partition_find(None, "sales", "events", &["2025-11-24".to_owned()])
            .await
            .expect("send find request");

        assert_eq!(partition.values, vec!["2025-11-24"]);
        assert_eq!(
            partition.location.as_deref(),
            Some("s3://data-lake/raw/events/date=2025-11-24/")
        );
        assert_eq!(
            partition.created_at,
            Some("2025-11-24T12:00:00Z".parse::<DateTime<Utc>>().unwrap())
        );

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_partition_maps_404_to_not_found() {
        let mut mock_server = Server::new_async().await;
        let mock = mock_server
            .mock("POST", "/api/v1/partition/find")
            .with_status(404)
            .with_body("partition not found")
            .create_async()
            .await;

        let client = Client::new(mock_server.url()).expect("create client");
        let err = client
            .get_partition(None, "sales", "events", &["2025-11-24".to_owned()])
            .await
            .expect_err("partition should be missing");

        assert_eq!(err, CatalogError::NotFound);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_partition_sends_descriptor_and_catalog_id() {
        let mut mock_server = Server::new_async().await;
        let mock = mock_server
            .mock("POST", "/api/v1/partition")
            .match_body(Matcher::Json(json!({
                "catalog_id": "123456789012",
                "database": "sales",
                "table": "events",
                "values": ["2025-11-24"],
                "descriptor": {
                    "columns": [],
                    "input_format": "org.apache.hadoop.mapred.TextInputFormat",
                    "output_format":
                        "org.apache.hadoop.hive.ql.io.HiveIgnoreKeyTextOutputFormat",
                    "serialization_library":
                        "org.apache.hadoop.hive.serde2.lazy.LazySimpleSerDe",
                    "location": "s3://data-lake/raw/events/date=2025-11-24/"
                },
            })))
            .with_status(201)
            .create_async()
            .await;

        let client = Client::new(mock_server.url()).expect("create client");
        let descriptor =
            StorageDescriptor::plain_text("s3://data-lake/raw/events/date=2025-11-24/");

        client
            .create_partition(
                Some("123456789012"),
                "sales",
                "events",
                &["2025-11-24".to_owned()],
                &descriptor,
            )
            .await
            .expect("send create request");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_partition_maps_409_to_already_exists() {
        let mut mock_server = Server::new_async().await;
        let mock = mock_server
            .mock("POST", "/api/v1/partition")
            .with_status(409)
            .with_body("partition already exists")
            .create_async()
            .await;

        let client = Client::new(mock_server.url()).expect("create client");
        let err = client
            .create_partition(
                None,
                "sales",
                "events",
                &["2025-11-24".to_owned()],
                &StorageDescriptor::plain_text("s3://b/p/"),
            )
            .await
            .expect_err("create should collide");

        assert_eq!(err, CatalogError::AlreadyExists);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn delete_partition_accepts_no_content() {
        let mut mock_server = Server::new_async().await;
        let mock = mock_server
            .mock("DELETE", "/api/v1/partition")
            .match_body(Matcher::Json(json!({
                "database": "sales",
                "table": "events",
                "values": ["2025-11-24"],
            })))
            .with_status(204)
            .create_async()
            .await;

        let client = Client::new(mock_server.url()).expect("create client");
        client
            .delete_partition(None, "sales", "events", &["2025-11-24".to_owned()])
            .await
            .expect("send delete request");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_errors_surface_code_and_body() {
        let mut mock_server = Server::new_async().await;
        let mock = mock_server
            .mock("POST", "/api/v1/table/find")
            .with_status(500)
            .with_body("internal catalog failure")
            .create_async()
            .await;

        let client = Client::new(mock_server.url()).expect("create client");
        let err = client
            .get_table(None, "sales", "events")
            .await
            .expect_err("table fetch should fail");

        match err {
            CatalogError::Remote { message } => {
                assert!(message.contains("[500"), "unexpected message: {message}");
                assert!(message.contains("internal catalog failure"));
            }
            other => panic!("expected remote error, got {other:?}"),
        }
        mock.assert_async().await;
    }
}
