use {
    crate::encoding::unescape_uri_encoding,
    bytes::Bytes,
    chrono::{DateTime, Utc},
    derive_builder::Builder,
    http::{header::HeaderMap, method::Method, request::Parts},
};

/// An HTTP request to be signed in header-signing mode.
///
/// The path and query parameters are raw (not percent-encoded); they are encoded during canonicalization. Signing
/// replaces the headers of this request with the signed headers. Nothing else is modified.
///
/// SigningRequest structs are built with [SigningRequestBuilder] or adapted from an [http::Request] with
/// [SigningRequest::from_http_request].
#[derive(Builder, Clone, Debug)]
pub struct SigningRequest {
    /// The HTTP method.
    #[builder(default = "Method::GET")]
    method: Method,

    /// The raw request path.
    #[builder(setter(into), default = "\"/\".to_string()")]
    path: String,

    /// The raw query parameters in their original order. Duplicate names are allowed. A parameter with no `=` has no
    /// value.
    #[builder(default)]
    query: Vec<(String, Option<String>)>,

    /// The request headers.
    #[builder(default)]
    headers: HeaderMap,

    /// The request body, if any.
    #[builder(setter(into, strip_option), default)]
    body: Option<Bytes>,

    /// A signing timestamp that takes precedence over the `x-amz-date` header and the current time.
    #[builder(setter(strip_option), default)]
    timestamp: Option<DateTime<Utc>>,
}

impl SigningRequest {
    /// Create a [SigningRequestBuilder] to construct a [SigningRequest].
    #[inline]
    pub fn builder() -> SigningRequestBuilder {
        SigningRequestBuilder::default()
    }

    /// Create a SigningRequest from HTTP request [Parts] and a body of [Bytes].
    ///
    /// The URI path and query are percent-decoded so that canonicalization can re-encode them. An empty body is
    /// treated as no body.
    pub fn from_http_request(parts: &Parts, body: Bytes) -> Self {
        Self {
            method: parts.method.clone(),
            path: unescape_uri_encoding(parts.uri.path()),
            query: parse_query_string(parts.uri.query().unwrap_or("")),
            headers: parts.headers.clone(),
            body: if body.is_empty() {
                None
            } else {
                Some(body)
            },
            timestamp: None,
        }
    }

    /// Write the (signed) headers of this request back onto HTTP request [Parts].
    pub fn apply_to_http_parts(&self, parts: &mut Parts) {
        parts.headers = self.headers.clone();
    }

    /// Retrieve the HTTP method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Retrieve the raw request path.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Retrieve the raw query parameters in their original order.
    #[inline]
    pub fn query(&self) -> &[(String, Option<String>)] {
        &self.query
    }

    /// Retrieve the request headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Retrieve the request body, if any.
    #[inline]
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Retrieve the explicit signing timestamp, if any.
    #[inline]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Swap in a fully signed header map.
    pub(crate) fn replace_headers(&mut self, headers: HeaderMap) {
        self.headers = headers;
    }
}

/// Split a raw query string into decoded name/value pairs, keeping their order.
fn parse_query_string(query_string: &str) -> Vec<(String, Option<String>)> {
    query_string
        .split('&')
        .filter(|component| !component.is_empty())
        .map(|component| match component.split_once('=') {
            Some((name, value)) => (unescape_uri_encoding(name), Some(unescape_uri_encoding(value))),
            None => (unescape_uri_encoding(component), None),
        })
        .collect()
}

/// The scalar inputs of presigned-URL mode.
///
/// Every field is optional here; [sigv4_sign][crate::sigv4_sign] reports which one is missing.
#[derive(Builder, Clone, Debug, Default, PartialEq, Eq)]
#[builder(default)]
pub struct PresignParameters {
    /// The HTTP verb the URL will be used with.
    #[builder(setter(into, strip_option))]
    verb: Option<String>,

    /// The raw path of the URL.
    #[builder(setter(into, strip_option))]
    path: Option<String>,

    /// The signing timestamp. The current time is used when this is absent.
    #[builder(setter(strip_option))]
    date: Option<DateTime<Utc>>,

    /// The lifetime of the URL in seconds.
    #[builder(setter(strip_option))]
    expiry: Option<u64>,

    /// The name of the slot that receives the URL.
    #[builder(setter(into, strip_option))]
    output: Option<String>,
}

impl PresignParameters {
    /// Create a [PresignParametersBuilder] to construct a [PresignParameters].
    #[inline]
    pub fn builder() -> PresignParametersBuilder {
        PresignParametersBuilder::default()
    }

    /// Retrieve the HTTP verb.
    #[inline]
    pub fn verb(&self) -> Option<&str> {
        self.verb.as_deref()
    }

    /// Retrieve the raw path.
    #[inline]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Retrieve the signing timestamp override.
    #[inline]
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.date
    }

    /// Retrieve the URL lifetime in seconds.
    #[inline]
    pub fn expiry(&self) -> Option<u64> {
        self.expiry
    }

    /// Retrieve the output slot name.
    #[inline]
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{parse_query_string, PresignParameters, SigningRequest},
        bytes::Bytes,
        http::{header::HeaderValue, method::Method, request::Request},
    };

    #[test_log::test]
    fn test_parse_query_string() {
        assert!(parse_query_string("").is_empty());
        assert_eq!(
            parse_query_string("p1=1&p2&&p3=&a%20b=c%2Fd"),
            vec![
                ("p1".to_string(), Some("1".to_string())),
                ("p2".to_string(), None),
                ("p3".to_string(), Some("".to_string())),
                ("a b".to_string(), Some("c/d".to_string())),
            ]
        );
    }

    #[test_log::test]
    fn test_from_http_request() {
        let request = Request::builder()
            .method(Method::PUT)
            .uri("https://examplebucket.s3.amazonaws.com/test%24file.text?max-keys=2&prefix=J")
            .header("x-amz-storage-class", "REDUCED_REDUNDANCY")
            .body(Bytes::from_static(b"Welcome to Amazon S3."))
            .unwrap();
        let (mut parts, body) = request.into_parts();

        let mut sr = SigningRequest::from_http_request(&parts, body);
        assert_eq!(sr.method(), Method::PUT);
        assert_eq!(sr.path(), "/test$file.text");
        assert_eq!(sr.query().len(), 2);
        assert_eq!(sr.body().unwrap().as_ref(), b"Welcome to Amazon S3.");
        assert!(sr.timestamp().is_none());

        let mut headers = sr.headers().clone();
        headers.insert("x-amz-date", HeaderValue::from_static("20130524T000000Z"));
        sr.replace_headers(headers);
        sr.apply_to_http_parts(&mut parts);
        assert_eq!(parts.headers.get("x-amz-date").unwrap(), "20130524T000000Z");
        assert_eq!(parts.headers.get("x-amz-storage-class").unwrap(), "REDUCED_REDUNDANCY");
    }

    #[test_log::test]
    fn test_empty_body_is_none() {
        let request = Request::builder().uri("/").body(Bytes::new()).unwrap();
        let (parts, body) = request.into_parts();
        assert!(SigningRequest::from_http_request(&parts, body).body().is_none());
    }

    #[test_log::test]
    fn test_builders() {
        let sr = SigningRequest::builder().build().unwrap();
        assert_eq!(sr.method(), Method::GET);
        assert_eq!(sr.path(), "/");
        assert!(sr.query().is_empty());

        let p = PresignParameters::builder().verb("GET").path("/test.txt").expiry(86400).output("url").build().unwrap();
        assert_eq!(p.verb(), Some("GET"));
        assert_eq!(p.expiry(), Some(86400));
        assert_eq!(p.date(), None);
        assert_eq!(PresignParameters::default().output(), None);
    }
}
