use {
    crate::{constants::*, encoding::latin1_to_string, SignatureError, SignedOutput, SigningOutcome},
    http::header::AUTHORIZATION,
    std::collections::BTreeMap,
};

/// Render multi-line text on one line, marking each line break with `↵`.
#[inline]
pub fn single_line(text: &str) -> String {
    text.replace('\n', DIAGNOSTIC_NEWLINE)
}

/// The named variables a host exposes after a signing invocation.
///
/// Names carry the `awsv4sig_` prefix, except for the presigned URL, which is published under the output slot name
/// exactly as configured. Secret keys and signing keys never appear here; the `Authorization` header only appears
/// when debugging is enabled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticVariables {
    variables: BTreeMap<String, String>,
}

impl DiagnosticVariables {
    /// Collect the variables for a successful invocation.
    pub fn from_outcome(outcome: &SigningOutcome, debug: bool) -> Self {
        let mut result = Self::default();
        result.set_prefixed("creq", single_line(outcome.canonical_request()));
        result.set_prefixed("sts", single_line(outcome.string_to_sign()));

        match outcome.output() {
            SignedOutput::Headers(headers) => {
                for (name, value) in headers.iter() {
                    if *name == AUTHORIZATION && !debug {
                        continue;
                    }

                    result.set_prefixed(&format!("header.{}", name.as_str()), latin1_to_string(value.as_bytes()));
                }
            }
            SignedOutput::PresignedUrl {
                slot,
                url,
            } => {
                result.variables.insert(slot.clone(), url.clone());
            }
        }

        result
    }

    /// Collect the variables for a failed invocation.
    pub fn from_error(error: &SignatureError) -> Self {
        let mut result = Self::default();
        let message = error.to_string().replace('\n', " ");
        result.set_prefixed("exception", format!("{}: {}", error.error_code(), message));
        result.set_prefixed("error", message);
        result.set_prefixed("error_kind", error.error_code().to_string());
        result
    }

    /// Collect the variables for either outcome of an invocation.
    pub fn from_result(result: &Result<SigningOutcome, SignatureError>, debug: bool) -> Self {
        match result {
            Ok(outcome) => Self::from_outcome(outcome, debug),
            Err(e) => Self::from_error(e),
        }
    }

    /// Retrieve a variable by its full name, e.g. `awsv4sig_creq`.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Iterate over all variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The number of variables.
    #[inline]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether there are no variables.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    fn set_prefixed(&mut self, name: &str, value: String) {
        self.variables.insert(format!("{}{}", VARIABLE_PREFIX, name), value);
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{single_line, DiagnosticVariables},
        crate::{sigv4_sign_at, Endpoint, PresignParameters, SignatureError, SigningConfig, SigningRequest},
        chrono::{TimeZone, Utc},
        std::str::FromStr,
    };

    fn config() -> SigningConfig {
        SigningConfig::builder()
            .region("us-east-1")
            .service("service")
            .access_key("AKIDEXAMPLE")
            .secret_key("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
            .endpoint(Endpoint::from_str("https://example.amazonaws.com").unwrap())
            .build()
            .unwrap()
    }

    #[test_log::test]
    fn test_single_line() {
        assert_eq!(single_line("GET\n/\n\nhost"), "GET↵/↵↵host");
        assert_eq!(single_line("no breaks"), "no breaks");
    }

    #[test_log::test]
    fn test_header_mode_variables() {
        let now = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap();
        let mut request = SigningRequest::builder().build().unwrap();
        let outcome = sigv4_sign_at(&config(), Some(&mut request), &PresignParameters::default(), now).unwrap();
        assert_eq!(outcome.signature(), "5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31");

        let vars = DiagnosticVariables::from_outcome(&outcome, false);
        assert_eq!(
            vars.get("awsv4sig_creq").unwrap(),
            "GET↵/↵↵host:example.amazonaws.com↵x-amz-date:20150830T123600Z↵↵host;x-amz-date↵e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert!(vars.get("awsv4sig_sts").unwrap().starts_with("AWS4-HMAC-SHA256↵20150830T123600Z↵"));
        assert_eq!(vars.get("awsv4sig_header.host").unwrap(), "example.amazonaws.com");
        assert_eq!(vars.get("awsv4sig_header.x-amz-date").unwrap(), "20150830T123600Z");
        assert_eq!(vars.get("awsv4sig_header.authorization"), None);
        assert_eq!(vars.len(), 4);
        assert!(vars.iter().all(|(_, v)| !v.contains("wJalrXUtnFEMI")));

        let vars = DiagnosticVariables::from_outcome(&outcome, true);
        assert!(vars.get("awsv4sig_header.authorization").unwrap().ends_with(outcome.signature()));
    }

    #[test_log::test]
    fn test_error_variables() {
        let vars = DiagnosticVariables::from_error(&SignatureError::MissingRequiredField(
            "neither source nor verb is specified.".to_string(),
        ));
        assert_eq!(vars.get("awsv4sig_error").unwrap(), "neither source nor verb is specified.");
        assert_eq!(vars.get("awsv4sig_error_kind").unwrap(), "MissingRequiredField");
        assert_eq!(
            vars.get("awsv4sig_exception").unwrap(),
            "MissingRequiredField: neither source nor verb is specified."
        );
        assert_eq!(vars.len(), 3);

        let vars = DiagnosticVariables::from_result(&Err(SignatureError::MalformedHeader("a\nb".to_string())), true);
        assert_eq!(vars.get("awsv4sig_error").unwrap(), "a b");
        assert_eq!(vars.get("awsv4sig_exception").unwrap(), "MalformedHeader: a b");
    }
}
