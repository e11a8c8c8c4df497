//! Common constants used throughout the crate.
//!
//! This was consolidated here so the canonicalizer, the signer, and the property layer all agree on
//! the exact spelling of header names, query parameters, and error codes. If a value is spelled
//! incorrectly, at least it can be fixed in one spot.
//!
//! Tests that are testing the content of an error code or message should not use these constants;
//! they should use hard-coded strings so the tests are also testing for misspellings.
//!
//! Please keep this file organized alphabetically. (This can be a bit hard with comments, etc.)

/// Algorithm for AWS SigV4
pub(crate) const AWS4_HMAC_SHA256: &str = "AWS4-HMAC-SHA256";

/// Prefix applied to the raw secret key to form `kSecret`.
pub(crate) const AWS4_KEY_PREFIX: &str = "AWS4";

/// String included at the end of the AWS SigV4 credential scope
pub(crate) const AWS4_REQUEST: &str = "aws4_request";

/// Marker used to render newlines in single-line diagnostics.
pub(crate) const DIAGNOSTIC_NEWLINE: &str = "↵";

/// Error code: CryptoUnavailable
pub(crate) const ERR_CODE_CRYPTO_UNAVAILABLE: &str = "CryptoUnavailable";

/// Error code: InvalidProperty
pub(crate) const ERR_CODE_INVALID_PROPERTY: &str = "InvalidProperty";

/// Error code: MalformedEndpoint
pub(crate) const ERR_CODE_MALFORMED_ENDPOINT: &str = "MalformedEndpoint";

/// Error code: MalformedHeader
pub(crate) const ERR_CODE_MALFORMED_HEADER: &str = "MalformedHeader";

/// Error code: MissingRequiredField
pub(crate) const ERR_CODE_MISSING_REQUIRED_FIELD: &str = "MissingRequiredField";

/// Error code: UnresolvedSource
pub(crate) const ERR_CODE_UNRESOLVED_SOURCE: &str = "UnresolvedSource";

/// Header field for the host
pub(crate) const HDR_HOST: &str = "host";

/// Header field for the content SHA-256 hash
pub(crate) const HDR_X_AMZ_CONTENT_SHA256: &str = "x-amz-content-sha256";

/// Header field for the request timestamp
pub(crate) const HDR_X_AMZ_DATE: &str = "x-amz-date";

/// Uppercase hex digits.
pub(crate) const HEX_DIGITS_UPPER: [u8; 16] =
    [b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'A', b'B', b'C', b'D', b'E', b'F'];

/// Compact ISO8601 format used for the string to sign.
pub(crate) const ISO8601_COMPACT_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Date format used in the credential scope.
pub(crate) const ISO8601_DATE_FORMAT: &str = "%Y%m%d";

/// Length of an ISO8601 date string in the UTC time zone.
pub(crate) const ISO8601_UTC_LENGTH: usize = 16;

/// Error message: `"neither source nor path is specified."`
pub(crate) const MSG_NEITHER_SOURCE_NOR_PATH: &str = "neither source nor path is specified.";

/// Error message: `"neither source nor verb is specified."`
pub(crate) const MSG_NEITHER_SOURCE_NOR_VERB: &str = "neither source nor verb is specified.";

/// Property: AWS access key id.
pub(crate) const PROP_ACCESS_KEY: &str = "key";

/// Property: turn on verbose diagnostics.
pub(crate) const PROP_DEBUG: &str = "debug";

/// Property: endpoint URL (`scheme://host[/basepath]`).
pub(crate) const PROP_ENDPOINT: &str = "endpoint";

/// Property: append a trailing slash to the canonical path.
pub(crate) const PROP_INSURE_TRAILING_SLASH: &str = "insure-trailing-slash";

/// Property: name of the output slot that receives a presigned URL.
pub(crate) const PROP_OUTPUT: &str = "output";

/// Property: AWS region.
pub(crate) const PROP_REGION: &str = "region";

/// Property: presigned URL timestamp override.
pub(crate) const PROP_REQUEST_DATE: &str = "request-date";

/// Property: presigned URL lifetime in seconds.
pub(crate) const PROP_REQUEST_EXPIRY: &str = "request-expiry";

/// Property: presigned URL path.
pub(crate) const PROP_REQUEST_PATH: &str = "request-path";

/// Property: presigned URL verb.
pub(crate) const PROP_REQUEST_VERB: &str = "request-verb";

/// Property: AWS secret access key.
pub(crate) const PROP_SECRET_KEY: &str = "secret";

/// Property: AWS service name.
pub(crate) const PROP_SERVICE: &str = "service";

/// Property: include `x-amz-content-sha256` in the signed headers.
pub(crate) const PROP_SIGN_CONTENT_SHA256: &str = "sign-content-sha256";

/// Property: name of the source message to sign.
pub(crate) const PROP_SOURCE: &str = "source";

/// Query parameter for the signature algorithm
pub(crate) const QP_X_AMZ_ALGORITHM: &str = "X-Amz-Algorithm";

/// Query parameter for delivering the access key
pub(crate) const QP_X_AMZ_CREDENTIAL: &str = "X-Amz-Credential";

/// Query parameter for delivering the date
pub(crate) const QP_X_AMZ_DATE: &str = "X-Amz-Date";

/// Query parameter for the lifetime of a presigned URL
pub(crate) const QP_X_AMZ_EXPIRES: &str = "X-Amz-Expires";

/// Query parameter for delivering the signature
pub(crate) const QP_X_AMZ_SIGNATURE: &str = "X-Amz-Signature";

/// Query parameter specifying the signed headers
pub(crate) const QP_X_AMZ_SIGNED_HEADERS: &str = "X-Amz-SignedHeaders";

/// SHA-256 of an empty string.
pub(crate) const SHA256_EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Length of a SHA-256 hex string.
pub(crate) const SHA256_HEX_LENGTH: usize = SHA256_EMPTY.len();

/// Length of a SHA-256 digest in bytes.
pub(crate) const SHA256_OUTPUT_LEN: usize = 32;

/// Payload hash placeholder used by presigned URLs.
pub(crate) const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Prefix applied to every diagnostic variable name.
pub(crate) const VARIABLE_PREFIX: &str = "awsv4sig_";
