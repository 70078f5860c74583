use clap::Parser;
use secrecy::Secret;
use url::Url;

/// Connection settings shared by every command that talks to the catalog
#[derive(Debug, Parser)]
pub(crate) struct CatalogConfig {
    /// The host URL of the catalog service
    #[clap(
        short = 'H',
        long = "host",
        env = "LAKEMETA_HOST_URL",
        default_value = "http://127.0.0.1:8181"
    )]
    pub(crate) host_url: Url,

    /// The name of the database to operate on
    #[clap(short = 'd', long = "database", env = "LAKEMETA_DATABASE")]
    pub(crate) database: String,

    /// The token for authentication with the catalog service
    #[clap(long = "token", env = "LAKEMETA_AUTH_TOKEN")]
    pub(crate) auth_token: Option<Secret<String>>,

    /// The catalog account to target when the credentials' default is not
    /// the right one
    #[clap(long = "catalog-id", env = "LAKEMETA_CATALOG_ID")]
    pub(crate) catalog_id: Option<String>,
}
