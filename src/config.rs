use {
    crate::{encoding::unescape_uri_encoding, SignatureError},
    derive_builder::{Builder, UninitializedFieldError},
    http::uri::Uri,
    std::{
        fmt::{Debug, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// Options that adjust how a request is canonicalized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignatureOptions {
    /// Add an `x-amz-content-sha256` header carrying the payload hash and sign it.
    pub sign_content_sha256: bool,

    /// Append a trailing slash to the canonical path when it does not already have one.
    pub insure_trailing_slash: bool,
}

impl SignatureOptions {
    /// Create a `SignatureOptions` suitable for use with S3, which requires the `x-amz-content-sha256` header.
    ///
    /// This sets `sign_content_sha256` to `true` and `insure_trailing_slash` to `false`.
    pub const S3: Self = Self {
        sign_content_sha256: true,
        insure_trailing_slash: false,
    };
}

/// The service endpoint a request is signed for.
///
/// The authority (host and optional port) becomes the signed `host` header. A path other than `/` replaces the path
/// of the request being signed. An endpoint may not carry userinfo, a query, or a fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    scheme: String,
    authority: String,
    base_path: Option<String>,
}

impl Endpoint {
    /// Retrieve the URI scheme, e.g. `https`.
    #[inline(always)]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Retrieve the host and optional port.
    #[inline(always)]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Retrieve the percent-decoded path of the endpoint if it is anything other than the root.
    #[inline(always)]
    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }
}

impl FromStr for Endpoint {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, SignatureError> {
        let s = s.trim();
        let uri = Uri::from_str(s)
            .map_err(|e| SignatureError::MalformedEndpoint(format!("Endpoint is not a valid URI: {}: {}", s, e)))?;

        let (scheme, authority) = match (uri.scheme_str(), uri.authority()) {
            (Some(scheme), Some(authority)) if !authority.host().is_empty() => {
                (scheme.to_string(), authority.as_str().to_string())
            }
            _ => return Err(SignatureError::MalformedEndpoint(format!("Endpoint must include a scheme and host: {}", s))),
        };

        // Userinfo has no place in a signed host header.
        if authority.contains('@') {
            return Err(SignatureError::MalformedEndpoint(format!("Endpoint must not include credentials: {}", s)));
        }

        // A query or fragment would be silently lost from the signed request.
        if uri.query().is_some() || s.contains('#') {
            return Err(SignatureError::MalformedEndpoint(format!(
                "Endpoint must not include a query or fragment: {}",
                s
            )));
        }

        // The path is held raw, like a request path; canonicalization encodes it exactly once.
        let base_path = match uri.path() {
            "" | "/" => None,
            path => Some(unescape_uri_encoding(path)),
        };

        Ok(Self {
            scheme,
            authority,
            base_path,
        })
    }
}

/// The resolved, immutable inputs of one signing invocation that do not depend on the request.
///
/// SigningConfig structs are immutable. Use [SigningConfigBuilder] to construct one; a required field that is absent
/// or empty fails with [SignatureError::MissingRequiredField].
#[derive(Builder, Clone)]
#[builder(build_fn(validate = "Self::validate", error = "SignatureError"))]
pub struct SigningConfig {
    /// The AWS region, e.g. `us-east-1`.
    #[builder(setter(into))]
    region: String,

    /// The AWS service name, e.g. `s3`.
    #[builder(setter(into))]
    service: String,

    /// The access key id.
    #[builder(setter(into))]
    access_key: String,

    /// The secret access key. Never logged.
    #[builder(setter(into))]
    secret_key: String,

    /// The endpoint the request is destined for.
    endpoint: Endpoint,

    /// Canonicalization options.
    #[builder(default)]
    options: SignatureOptions,
}

impl SigningConfig {
    /// Create a [SigningConfigBuilder] to construct a [SigningConfig].
    #[inline]
    pub fn builder() -> SigningConfigBuilder {
        SigningConfigBuilder::default()
    }

    /// Retrieve the AWS region.
    #[inline]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Retrieve the AWS service name.
    #[inline]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Retrieve the access key id.
    #[inline]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Retrieve the secret access key.
    #[inline]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Retrieve the endpoint.
    #[inline]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Retrieve the canonicalization options.
    #[inline]
    pub fn options(&self) -> SignatureOptions {
        self.options
    }
}

impl Debug for SigningConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SigningConfig")
            .field("region", &self.region)
            .field("service", &self.service)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("options", &self.options)
            .finish()
    }
}

/// The property name a field is known by at the configuration boundary.
fn property_name(field: &str) -> &str {
    match field {
        "access_key" => crate::constants::PROP_ACCESS_KEY,
        "secret_key" => crate::constants::PROP_SECRET_KEY,
        other => other,
    }
}

/// The message used whenever a required string is absent or empty.
pub(crate) fn missing_field(name: &str) -> SignatureError {
    SignatureError::MissingRequiredField(format!("{} resolves to null or empty.", name))
}

impl SigningConfigBuilder {
    fn validate(&self) -> Result<(), SignatureError> {
        let required = [
            ("region", &self.region),
            ("service", &self.service),
            ("access_key", &self.access_key),
            ("secret_key", &self.secret_key),
        ];

        for (field, value) in required {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    return Err(missing_field(property_name(field)));
                }
            }
        }

        Ok(())
    }
}

impl From<UninitializedFieldError> for SignatureError {
    fn from(e: UninitializedFieldError) -> SignatureError {
        missing_field(property_name(e.field_name()))
    }
}
