//! Canonicalization functionality for signature generation.
//!
//! This assembles the AWS SigV4 canonical request from an already-resolved verb, path, query parameters, headers, and
//! payload hash.
//!
//! **Stability of this module is not guaranteed except for items exposed at the crate root**.
//! The functions and types are subject to change in minor/patch versions. This is exposed for
//! testing purposes only.

use {
    crate::{
        constants::*,
        crypto::sha256_hex,
        encoding::{latin1_to_string, normalize_header_value, normalize_path, uri_encode},
    },
    http::header::{HeaderMap, HeaderValue},
    log::trace,
    qualifier_attr::qualifiers,
    std::{
        collections::BTreeMap,
        fmt::{Debug, Formatter, Result as FmtResult},
    },
};

/// A canonicalized request for AWS SigV4.
///
/// This is mainly used internally for generating the canonical request for signing, but is
/// exposed for testing and debugging purposes.
///
/// **The stability of this struct is not guaranteed.** The fields and methods are subject to
/// change in minor/patch versions.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[derive(Clone)]
struct CanonicalRequest {
    /// The HTTP method for the request, upper-cased.
    request_method: String,

    /// The normalized, percent-encoded path. This is guaranteed to be ASCII.
    canonical_path: String,

    /// The canonical query string, already encoded, sorted, and joined with `&`.
    canonical_query: String,

    /// Lower-cased header names mapped to their normalized, comma-joined values. Every entry is signed.
    headers: BTreeMap<String, String>,

    /// The hex SHA-256 of the payload, or `UNSIGNED-PAYLOAD`.
    payload_hash: String,
}

impl CanonicalRequest {
    /// Create a CanonicalRequest from its already-resolved components.
    ///
    /// The path is normalized and percent-encoded here; the query string and headers must already be in canonical
    /// form (see [canonicalize_query], [presigned_query], and [canonicalize_headers]).
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn new(
        request_method: &str,
        path: &str,
        insure_trailing_slash: bool,
        canonical_query: String,
        headers: BTreeMap<String, String>,
        payload_hash: String,
    ) -> Self {
        Self {
            request_method: request_method.to_uppercase(),
            canonical_path: uri_encode(&normalize_path(path, insure_trailing_slash), false),
            canonical_query,
            headers,
            payload_hash,
        }
    }

    /// Retrieve the HTTP request method.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn request_method(&self) -> &str {
        &self.request_method
    }

    /// Retrieve the canonicalized URI path.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn canonical_path(&self) -> &str {
        &self.canonical_path
    }

    /// Retrieve the canonical query string.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn canonical_query_string(&self) -> &str {
        &self.canonical_query
    }

    /// Retrieve the canonical headers, keyed by lower-case name.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Retrieve the payload hash line.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn payload_hash(&self) -> &str {
        &self.payload_hash
    }

    /// The `;`-joined list of signed header names, in sorted order.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn signed_headers(&self) -> String {
        self.headers.keys().map(String::as_str).collect::<Vec<&str>>().join(";")
    }

    /// Get the [canonical request to hash](https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html)
    /// for the request.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn canonical_request(&self) -> String {
        let mut result = String::with_capacity(1024);
        result.push_str(self.request_method());
        result.push('\n');
        result.push_str(self.canonical_path());
        result.push('\n');
        result.push_str(self.canonical_query_string());
        result.push('\n');

        for (name, value) in self.headers.iter() {
            result.push_str(name);
            result.push(':');
            result.push_str(value);
            result.push('\n');
        }

        result.push('\n');
        result.push_str(&self.signed_headers());
        result.push('\n');
        result.push_str(self.payload_hash());

        trace!("Canonical request:\n{}", result);

        result
    }

    /// Get the hex SHA-256 hash of the [canonical request](https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html).
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn canonical_request_sha256(&self) -> String {
        sha256_hex(self.canonical_request().as_bytes())
    }
}

impl Debug for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CanonicalRequest")
            .field("request_method", &self.request_method)
            .field("canonical_path", &self.canonical_path)
            .field("canonical_query", &self.canonical_query)
            .field("signed_headers", &self.signed_headers())
            .field("payload_hash", &self.payload_hash)
            .finish()
    }
}

/// Encode, sort, and join the query parameters of a request.
///
/// Names and values are percent-encoded with `/` encoded. A parameter whose value is absent or empty renders as the
/// bare name. Parameters are sorted by encoded name, then encoded value, so duplicates keep a stable order.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn canonicalize_query(params: &[(String, Option<String>)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(name, value)| (uri_encode(name, true), uri_encode(value.as_deref().unwrap_or(""), true)))
        .collect();
    encoded.sort();

    encoded
        .into_iter()
        .map(|(name, value)| {
            if value.is_empty() {
                name
            } else {
                format!("{}={}", name, value)
            }
        })
        .collect::<Vec<String>>()
        .join("&")
}

/// The synthesized query string of a presigned URL, without the trailing signature.
///
/// The parameters are emitted in exactly this order: algorithm, credential, date, expiry, signed headers.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn presigned_query(access_key: &str, credential_scope: &str, timestamp: &str, expiry: u64) -> String {
    let credential = format!("{}/{}", access_key, credential_scope);
    format!(
        "{}={}&{}={}&{}={}&{}={}&{}={}",
        QP_X_AMZ_ALGORITHM,
        AWS4_HMAC_SHA256,
        QP_X_AMZ_CREDENTIAL,
        uri_encode(&credential, true),
        QP_X_AMZ_DATE,
        timestamp,
        QP_X_AMZ_EXPIRES,
        expiry,
        QP_X_AMZ_SIGNED_HEADERS,
        HDR_HOST
    )
}

/// Returns a sorted map of lower-cased header names to their canonical values.
///
/// Each value is whitespace-normalized; multiple values for one name are joined with `,` in the order they appear.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn canonicalize_headers(headers: &HeaderMap<HeaderValue>) -> BTreeMap<String, String> {
    let mut result = BTreeMap::<String, String>::new();
    for (key, value) in headers.iter() {
        let value = normalize_header_value(&latin1_to_string(value.as_bytes()));
        match result.get_mut(key.as_str()) {
            Some(existing) => {
                existing.push(',');
                existing.push_str(&value);
            }
            None => {
                result.insert(key.as_str().to_lowercase(), value);
            }
        }
    }

    result
}
