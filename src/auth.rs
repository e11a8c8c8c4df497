//! AWS API request signature generation routines.
//!
//! This implements the string-to-sign and signature steps of the AWS
//! [SigV4](http://docs.aws.amazon.com/general/latest/gr/signature-version-4.html) algorithm, once a canonical request
//! has been generated.
//!
//! **Stability of this module is not guaranteed except for items exposed at the crate root**.
//! The functions and types are subject to change in minor/patch versions. This is exposed for
//! testing purposes only.

use {
    crate::{
        chronoutil::{format_amz_timestamp, format_date_stamp},
        constants::*,
        KSecretKey, SignatureError,
    },
    chrono::{DateTime, Utc},
    derive_builder::Builder,
    log::trace,
    qualifier_attr::qualifiers,
    std::fmt::{Debug, Formatter, Result as FmtResult},
};

/// Low-level structure for producing an AWS SigV4 signature after a canonical request has been generated.
#[derive(Builder, Clone)]
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[builder(derive(Debug), build_fn(error = "SignatureError"))]
pub struct SigV4Signer {
    /// The hex SHA-256 hash of the canonical request.
    #[builder(setter(into))]
    canonical_request_sha256: String,

    /// The access key id placed in the credential.
    #[builder(setter(into))]
    access_key: String,

    /// The region of the credential scope.
    #[builder(setter(into))]
    region: String,

    /// The service of the credential scope.
    #[builder(setter(into))]
    service: String,

    /// The signing timestamp. The credential scope date is taken from this.
    request_timestamp: DateTime<Utc>,

    /// The `;`-joined signed header list, as it appears in the canonical request.
    #[builder(setter(into))]
    signed_headers: String,
}

impl SigV4Signer {
    /// Create a builder for `SigV4Signer`.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn builder() -> SigV4SignerBuilder {
        SigV4SignerBuilder::default()
    }

    /// Retrieve the hex SHA-256 hash of the canonical request.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn canonical_request_sha256(&self) -> &str {
        &self.canonical_request_sha256
    }

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    /// Retrieve the access key id.
    #[inline(always)]
    fn access_key(&self) -> &str {
        &self.access_key
    }

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    /// Retrieve the signing timestamp.
    #[inline(always)]
    fn request_timestamp(&self) -> DateTime<Utc> {
        self.request_timestamp
    }

    /// The credential scope: `YYYYMMDD/region/service/aws4_request`.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn credential_scope(&self) -> String {
        credential_scope(&self.request_timestamp, &self.region, &self.service)
    }

    /// Return the string to sign for the request.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn get_string_to_sign(&self) -> String {
        let cscope = self.credential_scope();
        let mut result = String::with_capacity(
            AWS4_HMAC_SHA256.len() + 1 + ISO8601_UTC_LENGTH + 1 + cscope.len() + 1 + SHA256_HEX_LENGTH,
        );

        result.push_str(AWS4_HMAC_SHA256);
        result.push('\n');
        result.push_str(&format_amz_timestamp(&self.request_timestamp()));
        result.push('\n');
        result.push_str(&cscope);
        result.push('\n');
        result.push_str(self.canonical_request_sha256());
        result
    }

    /// Derive the signing key for this scope and sign the string to sign, returning the lower-case hex signature.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn compute_signature(&self, secret_key: &KSecretKey) -> Result<String, SignatureError> {
        let string_to_sign = self.get_string_to_sign();
        trace!("String to sign:\n{}", string_to_sign);
        let signing_key =
            secret_key.to_ksigning(self.request_timestamp().date_naive(), &self.region, &self.service)?;
        signing_key.sign(&string_to_sign)
    }

    /// Format the `Authorization` header value for a computed signature.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn authorization_header(&self, signature: &str) -> String {
        format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            AWS4_HMAC_SHA256,
            self.access_key(),
            self.credential_scope(),
            self.signed_headers,
            signature
        )
    }
}

/// Build the credential scope for a timestamp, region, and service.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn credential_scope(timestamp: &DateTime<Utc>, region: &str, service: &str) -> String {
    format!("{}/{}/{}/{}", format_date_stamp(timestamp), region, service, AWS4_REQUEST)
}

impl Debug for SigV4Signer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SigV4Signer")
            .field("canonical_request_sha256", &self.canonical_request_sha256)
            .field("access_key", &self.access_key)
            .field("credential_scope", &self.credential_scope())
            .field("signed_headers", &self.signed_headers)
            .field("request_timestamp", &self.request_timestamp)
            .finish()
    }
}
