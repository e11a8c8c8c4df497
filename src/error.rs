use {
    crate::constants::*,
    http::status::StatusCode,
    scratchstack_errors::ServiceError,
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// Error returned when an attempt at producing an AWS SigV4 signature fails.
///
/// Every variant describes a configuration or input problem that the caller must fix before retrying; none of them
/// are transient. No partial output should be trusted when one of these is returned.
#[derive(Debug)]
#[non_exhaustive]
pub enum SignatureError {
    /// The HMAC-SHA256 or SHA-256 primitive could not be used. This is fatal and is never retried.
    CryptoUnavailable(/* message */ String),

    /// A property could be resolved but its value could not be interpreted, e.g. a `request-expiry` that is not a
    /// number of seconds, or a `request-date` that is not an ISO-8601 timestamp.
    InvalidProperty(/* message */ String),

    /// The endpoint does not parse into a scheme and a host. Sample messages:
    /// `Endpoint is not a valid URI: ...`
    /// `Endpoint must include a scheme and host: ...`
    MalformedEndpoint(/* message */ String),

    /// A header on the source request could not be interpreted (e.g. the `x-amz-date` header is not a valid date),
    /// or a computed header value cannot be represented as an HTTP header value.
    MalformedHeader(/* message */ String),

    /// A required field is absent: region, service, key, secret, endpoint, verb, path, expiry, or output. Sample
    /// messages:
    /// `region resolves to null or empty.`
    /// `neither source nor verb is specified.`
    MissingRequiredField(/* message */ String),

    /// The source request named in the configuration does not resolve to a request.
    UnresolvedSource(/* message */ String),
}

impl SignatureError {
    /// The short error-kind string exposed to the host alongside the message.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CryptoUnavailable(_) => ERR_CODE_CRYPTO_UNAVAILABLE,
            Self::InvalidProperty(_) => ERR_CODE_INVALID_PROPERTY,
            Self::MalformedEndpoint(_) => ERR_CODE_MALFORMED_ENDPOINT,
            Self::MalformedHeader(_) => ERR_CODE_MALFORMED_HEADER,
            Self::MissingRequiredField(_) => ERR_CODE_MISSING_REQUIRED_FIELD,
            Self::UnresolvedSource(_) => ERR_CODE_UNRESOLVED_SOURCE,
        }
    }

    /// The HTTP status a host should use if it surfaces this failure directly.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::CryptoUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl ServiceError for SignatureError {
    fn error_code(&self) -> &'static str {
        SignatureError::error_code(self)
    }

    fn http_status(&self) -> StatusCode {
        SignatureError::http_status(self)
    }
}

impl Display for SignatureError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::CryptoUnavailable(msg) => f.write_str(msg),
            Self::InvalidProperty(msg) => f.write_str(msg),
            Self::MalformedEndpoint(msg) => f.write_str(msg),
            Self::MalformedHeader(msg) => f.write_str(msg),
            Self::MissingRequiredField(msg) => f.write_str(msg),
            Self::UnresolvedSource(msg) => f.write_str(msg),
        }
    }
}

impl Error for SignatureError {}

impl From<http::header::InvalidHeaderValue> for SignatureError {
    fn from(e: http::header::InvalidHeaderValue) -> SignatureError {
        SignatureError::MalformedHeader(format!("Computed header value is not a valid HTTP header value: {}", e))
    }
}
