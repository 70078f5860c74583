//! Canonical storage locations for partitions.
//!
//! All location strings handed to the catalog are built here so that every
//! registered partition points at a URI of the same shape, regardless of
//! separator noise in the configured bucket/prefix.

/// Build the canonical location URI for a partition from a storage bucket
/// and a path prefix.
///
/// Leading and trailing `/` characters are stripped from the prefix and the
/// result always ends in exactly one `/`. Interior separators are kept
/// as-is. An empty prefix yields the bucket root.
///
/// ```
/// use lakemeta_catalog::location::build_location;
///
/// assert_eq!(
///     build_location("data-lake", "/raw/events/"),
///     "s3://data-lake/raw/events/"
/// );
/// ```
pub fn build_location(bucket: &str, prefix: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("s3://{bucket}/")
    } else {
        format!("s3://{bucket}/{prefix}/")
    }
}
