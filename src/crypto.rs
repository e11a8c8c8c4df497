use {
    crate::{constants::SHA256_OUTPUT_LEN, SignatureError},
    hmac::{Hmac, Mac},
    sha2::{Digest, Sha256},
};

type HmacSha256 = Hmac<Sha256>;

/// Wrapper function to form a HMAC-SHA256 operation.
#[inline]
pub(crate) fn hmac_sha256(key: &[u8], value: &[u8]) -> Result<[u8; SHA256_OUTPUT_LEN], SignatureError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| SignatureError::CryptoUnavailable(format!("HMAC-SHA256 rejected key: {}", e)))?;
    mac.update(value);
    let mut result = [0; SHA256_OUTPUT_LEN];
    result.copy_from_slice(mac.finalize().into_bytes().as_slice());
    Ok(result)
}

#[inline(always)]
pub(crate) fn sha256(value: &[u8]) -> [u8; SHA256_OUTPUT_LEN] {
    let mut result = [0; SHA256_OUTPUT_LEN];
    result.copy_from_slice(Sha256::digest(value).as_slice());
    result
}

#[inline(always)]
pub(crate) fn sha256_hex(value: &[u8]) -> String {
    hex::encode(sha256(value))
}
