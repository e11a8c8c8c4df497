//! The configuration boundary: turning a host's string properties into signing inputs.
//!
//! A host configures the signer with a flat map of named string properties. A value may reference host variables
//! with `{name}` or `{name:default}`; these are resolved at call time through a caller-supplied function.

use {
    crate::{
        chronoutil::parse_signing_timestamp,
        config::missing_field,
        constants::*,
        diagnostics::DiagnosticVariables,
        signature::sigv4_sign_at,
        Endpoint, PresignParameters, SignatureError, SignatureOptions, SigningConfig, SigningOutcome, SigningRequest,
    },
    chrono::{DateTime, Utc},
    lazy_static::lazy_static,
    log::debug,
    regex::{Captures, Regex},
    std::{
        collections::{BTreeMap, HashMap},
        hash::BuildHasher,
        str::FromStr,
    },
};

lazy_static! {
    /// A `{name}` or `{name:default}` reference inside a property value.
    static ref VARIABLE_REFERENCE: Regex = Regex::new(r"\{([^{} :][^{} ]*?)\}").unwrap();
}

/// Where the host keeps the messages a `source` property can name.
pub trait MessageLookup {
    /// Return the message registered under `name`, if any.
    fn message_mut(&mut self, name: &str) -> Option<&mut SigningRequest>;
}

impl<S: BuildHasher> MessageLookup for HashMap<String, SigningRequest, S> {
    fn message_mut(&mut self, name: &str) -> Option<&mut SigningRequest> {
        self.get_mut(name)
    }
}

impl MessageLookup for BTreeMap<String, SigningRequest> {
    fn message_mut(&mut self, name: &str) -> Option<&mut SigningRequest> {
        self.get_mut(name)
    }
}

/// Replace every `{name}` / `{name:default}` reference in `template`.
///
/// A reference that `resolve` cannot satisfy is replaced by its default, or by nothing when there is no default.
pub fn resolve_variable_references<R>(template: &str, resolve: &R) -> String
where
    R: Fn(&str) -> Option<String>,
{
    VARIABLE_REFERENCE
        .replace_all(template, |cap: &Captures| {
            let reference = &cap[1];
            let (name, default) = match reference.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (reference, None),
            };

            match resolve(name) {
                Some(value) => value,
                None => default.unwrap_or("").to_string(),
            }
        })
        .into_owned()
}

/// An immutable map of named string properties.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignerProperties {
    properties: BTreeMap<String, String>,
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SignerProperties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            properties: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl SignerProperties {
    /// Retrieve the unresolved value of a property.
    #[inline]
    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Resolve a property. Values that are empty after trimming, before or after reference resolution, are absent.
    pub fn get_optional<R>(&self, name: &str, resolve: &R) -> Option<String>
    where
        R: Fn(&str) -> Option<String>,
    {
        let value = self.get_raw(name)?.trim();
        if value.is_empty() {
            return None;
        }

        let value = resolve_variable_references(value, resolve);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Resolve a property that must be present.
    pub fn get_required<R>(&self, name: &str, resolve: &R) -> Result<String, SignatureError>
    where
        R: Fn(&str) -> Option<String>,
    {
        self.get_optional(name, resolve).ok_or_else(|| missing_field(name))
    }

    /// Resolve a boolean property. Only `true` (in any case) is true; anything else that resolves is false.
    pub fn get_bool<R>(&self, name: &str, resolve: &R, default: bool) -> bool
    where
        R: Fn(&str) -> Option<String>,
    {
        match self.get_optional(name, resolve) {
            Some(value) => value.eq_ignore_ascii_case("true"),
            None => default,
        }
    }

    /// Whether verbose diagnostics are requested.
    pub fn debug<R>(&self, resolve: &R) -> bool
    where
        R: Fn(&str) -> Option<String>,
    {
        self.get_bool(PROP_DEBUG, resolve, false)
    }

    /// Resolve the properties common to both signing modes.
    pub fn to_signing_config<R>(&self, resolve: &R) -> Result<SigningConfig, SignatureError>
    where
        R: Fn(&str) -> Option<String>,
    {
        let endpoint = Endpoint::from_str(&self.get_required(PROP_ENDPOINT, resolve)?)?;

        SigningConfig::builder()
            .endpoint(endpoint)
            .region(self.get_required(PROP_REGION, resolve)?)
            .service(self.get_required(PROP_SERVICE, resolve)?)
            .secret_key(self.get_required(PROP_SECRET_KEY, resolve)?)
            .access_key(self.get_required(PROP_ACCESS_KEY, resolve)?)
            .options(SignatureOptions {
                sign_content_sha256: self.get_bool(PROP_SIGN_CONTENT_SHA256, resolve, false),
                insure_trailing_slash: self.get_bool(PROP_INSURE_TRAILING_SLASH, resolve, false),
            })
            .build()
    }

    /// Resolve the presigned-URL properties. Absent ones stay absent; malformed ones are errors.
    pub fn to_presign_parameters<R>(&self, resolve: &R) -> Result<PresignParameters, SignatureError>
    where
        R: Fn(&str) -> Option<String>,
    {
        let mut builder = PresignParameters::builder();

        if let Some(verb) = self.get_optional(PROP_REQUEST_VERB, resolve) {
            builder.verb(verb);
        }

        if let Some(path) = self.get_optional(PROP_REQUEST_PATH, resolve) {
            builder.path(path);
        }

        if let Some(date) = self.get_optional(PROP_REQUEST_DATE, resolve) {
            builder.date(parse_signing_timestamp(&date, PROP_REQUEST_DATE).map_err(SignatureError::InvalidProperty)?);
        }

        if let Some(expiry) = self.get_optional(PROP_REQUEST_EXPIRY, resolve) {
            let seconds = u64::from_str(&expiry).map_err(|_| {
                SignatureError::InvalidProperty(format!(
                    "{} must be a non-negative number of seconds: {}",
                    PROP_REQUEST_EXPIRY, expiry
                ))
            })?;
            builder.expiry(seconds);
        }

        if let Some(output) = self.get_optional(PROP_OUTPUT, resolve) {
            builder.output(output);
        }

        builder.build().map_err(|e| SignatureError::InvalidProperty(e.to_string()))
    }
}

/// Resolve `properties` and run one signing invocation.
///
/// If the `source` property names a message, that message is signed in place. Otherwise a presigned URL is produced
/// from the `request-*` and `output` properties.
pub fn execute<R, M>(
    properties: &SignerProperties,
    resolve: &R,
    messages: &mut M,
    now: DateTime<Utc>,
) -> Result<SigningOutcome, SignatureError>
where
    R: Fn(&str) -> Option<String>,
    M: MessageLookup + ?Sized,
{
    let config = properties.to_signing_config(resolve)?;

    match properties.get_optional(PROP_SOURCE, resolve) {
        Some(source) => {
            let request = messages.message_mut(&source).ok_or_else(|| {
                debug!("Source '{}' is not a known message", source);
                SignatureError::UnresolvedSource(format!("source '{}' does not resolve to a request.", source))
            })?;
            sigv4_sign_at(&config, Some(request), &PresignParameters::default(), now)
        }
        None => {
            let presign = properties.to_presign_parameters(resolve)?;
            sigv4_sign_at(&config, None, &presign, now)
        }
    }
}

/// Like [execute], but also returns the diagnostic variables the host should expose.
pub fn execute_with_diagnostics<R, M>(
    properties: &SignerProperties,
    resolve: &R,
    messages: &mut M,
    now: DateTime<Utc>,
) -> (Result<SigningOutcome, SignatureError>, DiagnosticVariables)
where
    R: Fn(&str) -> Option<String>,
    M: MessageLookup + ?Sized,
{
    let debug = properties.debug(resolve);
    let result = execute(properties, resolve, messages, now);
    let variables = DiagnosticVariables::from_result(&result, debug);
    (result, variables)
}
