use {
    crate::{constants::*, crypto::hmac_sha256, SignatureError},
    chrono::NaiveDate,
    std::{
        convert::Infallible,
        fmt::{Debug, Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// A raw AWS secret key (`kSecret`).
#[derive(Clone, PartialEq, Eq)]
pub struct KSecretKey {
    /// The secret key, prefixed with "AWS4".
    prefixed_key: Vec<u8>,
}

/// The `kDate` key: `HMAC_SHA256("AWS4" + KSecretKey, "YYYYMMDD")`
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KDateKey {
    /// The raw key.
    key: [u8; SHA256_OUTPUT_LEN],
}

/// The `kRegion` key: an AWS `kDate` key, HMAC-SHA256 hashed with the region.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KRegionKey {
    /// The raw key.
    key: [u8; SHA256_OUTPUT_LEN],
}

/// The `kService` key: an AWS `kRegion` key, HMAC-SHA256 hashed with the service.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KServiceKey {
    /// The raw key.
    key: [u8; SHA256_OUTPUT_LEN],
}

/// The `kSigning` key: an AWS `kService` key, HMAC-SHA256 hashed with the "aws4_request" string.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KSigningKey {
    /// The resulting raw signing key.
    key: [u8; SHA256_OUTPUT_LEN],
}

impl AsRef<[u8]> for KSecretKey {
    fn as_ref(&self) -> &[u8] {
        // Remove the "AWS4" prefix.
        &self.prefixed_key[AWS4_KEY_PREFIX.len()..]
    }
}

impl AsRef<[u8; SHA256_OUTPUT_LEN]> for KDateKey {
    fn as_ref(&self) -> &[u8; SHA256_OUTPUT_LEN] {
        &self.key
    }
}

impl AsRef<[u8; SHA256_OUTPUT_LEN]> for KRegionKey {
    fn as_ref(&self) -> &[u8; SHA256_OUTPUT_LEN] {
        &self.key
    }
}

impl AsRef<[u8; SHA256_OUTPUT_LEN]> for KServiceKey {
    fn as_ref(&self) -> &[u8; SHA256_OUTPUT_LEN] {
        &self.key
    }
}

impl AsRef<[u8; SHA256_OUTPUT_LEN]> for KSigningKey {
    fn as_ref(&self) -> &[u8; SHA256_OUTPUT_LEN] {
        &self.key
    }
}

/// Debug and Display print only the type name so key material never reaches a log.
macro_rules! redacted_fmt {
    ($($ty:ident),*) => {
        $(
            impl Debug for $ty {
                fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                    f.write_str(stringify!($ty))
                }
            }

            impl Display for $ty {
                fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                    f.write_str(stringify!($ty))
                }
            }
        )*
    };
}

redacted_fmt!(KSecretKey, KDateKey, KRegionKey, KServiceKey, KSigningKey);

impl From<&str> for KSecretKey {
    /// Create a new `KSecretKey` from a raw AWS secret key.
    fn from(raw: &str) -> Self {
        let mut prefixed_key = Vec::with_capacity(AWS4_KEY_PREFIX.len() + raw.len());
        prefixed_key.extend_from_slice(AWS4_KEY_PREFIX.as_bytes());
        prefixed_key.extend_from_slice(raw.as_bytes());
        Self {
            prefixed_key,
        }
    }
}

impl FromStr for KSecretKey {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Infallible> {
        Ok(Self::from(raw))
    }
}

impl KSecretKey {
    /// Create a new `KDateKey` from this `KSecretKey` and a date.
    pub fn to_kdate(&self, date: NaiveDate) -> Result<KDateKey, SignatureError> {
        let date = date.format(ISO8601_DATE_FORMAT).to_string();
        Ok(KDateKey {
            key: hmac_sha256(self.prefixed_key.as_slice(), date.as_bytes())?,
        })
    }

    /// Create a new `KRegionKey` from this `KSecretKey`, a date, and a region.
    pub fn to_kregion(&self, date: NaiveDate, region: &str) -> Result<KRegionKey, SignatureError> {
        self.to_kdate(date)?.to_kregion(region)
    }

    /// Create a new `KServiceKey` from this `KSecretKey`, a date, a region, and a service.
    pub fn to_kservice(&self, date: NaiveDate, region: &str, service: &str) -> Result<KServiceKey, SignatureError> {
        self.to_kdate(date)?.to_kservice(region, service)
    }

    /// Create a new `KSigningKey` from this `KSecretKey`, a date, a region, and a service.
    pub fn to_ksigning(&self, date: NaiveDate, region: &str, service: &str) -> Result<KSigningKey, SignatureError> {
        self.to_kdate(date)?.to_ksigning(region, service)
    }
}

impl KDateKey {
    /// Create a new `KRegionKey` from this `KDateKey` and a region.
    pub fn to_kregion(&self, region: &str) -> Result<KRegionKey, SignatureError> {
        Ok(KRegionKey {
            key: hmac_sha256(self.key.as_slice(), region.as_bytes())?,
        })
    }

    /// Create a new `KServiceKey` from this `KDateKey`, a region, and a service.
    pub fn to_kservice(&self, region: &str, service: &str) -> Result<KServiceKey, SignatureError> {
        self.to_kregion(region)?.to_kservice(service)
    }

    /// Create a new `KSigningKey` from this `KDateKey`, a region, and a service.
    pub fn to_ksigning(&self, region: &str, service: &str) -> Result<KSigningKey, SignatureError> {
        self.to_kregion(region)?.to_ksigning(service)
    }
}

impl KRegionKey {
    /// Create a new `KServiceKey` from this `KRegionKey` and a service.
    pub fn to_kservice(&self, service: &str) -> Result<KServiceKey, SignatureError> {
        Ok(KServiceKey {
            key: hmac_sha256(self.key.as_slice(), service.as_bytes())?,
        })
    }

    /// Create a new `KSigningKey` from this `KRegionKey` and a service.
    pub fn to_ksigning(&self, service: &str) -> Result<KSigningKey, SignatureError> {
        self.to_kservice(service)?.to_ksigning()
    }
}

impl KServiceKey {
    /// Create a new `KSigningKey` from this `KServiceKey`.
    pub fn to_ksigning(&self) -> Result<KSigningKey, SignatureError> {
        Ok(KSigningKey {
            key: hmac_sha256(self.key.as_slice(), AWS4_REQUEST.as_bytes())?,
        })
    }
}

impl KSigningKey {
    /// Sign `string_to_sign` with this key, returning the lower-case hex signature.
    pub fn sign(&self, string_to_sign: &str) -> Result<String, SignatureError> {
        Ok(hex::encode(hmac_sha256(self.key.as_slice(), string_to_sign.as_bytes())?))
    }
}
