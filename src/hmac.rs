use base64::{engine::general_purpose, Engine as _};
use hmac::{digest::KeyInit, Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use crate::errors::VerifyError;
use crate::validator_types::{DigestFormat, HashAlgorithm};

type HmacSha1 = Hmac<Sha1>;
type HmacSha224 = Hmac<Sha224>;
type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

fn mac_bytes<M: Mac + KeyInit>(secret: &[u8], message: &[u8]) -> Result<Vec<u8>, VerifyError> {
    let mut mac = <M as KeyInit>::new_from_slice(secret).map_err(|_| VerifyError::InvalidKey)?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

pub fn keyed_hash(algorithm: HashAlgorithm, secret: &[u8], message: &[u8]) -> Result<Vec<u8>, VerifyError> {
    match algorithm {
        HashAlgorithm::Sha1 => mac_bytes::<HmacSha1>(secret, message),
        HashAlgorithm::Sha224 => mac_bytes::<HmacSha224>(secret, message),
        HashAlgorithm::Sha256 => mac_bytes::<HmacSha256>(secret, message),
        HashAlgorithm::Sha384 => mac_bytes::<HmacSha384>(secret, message),
        HashAlgorithm::Sha512 => mac_bytes::<HmacSha512>(secret, message),
    }
}

pub fn render(bytes: &[u8], format: DigestFormat) -> String {
    match format {
        DigestFormat::Hex => hex::encode(bytes),
        DigestFormat::Base64 => general_purpose::STANDARD.encode(bytes),
    }
}

/// Computes the digest of `message` rendered in `format`.
pub fn compute_digest(
    algorithm: HashAlgorithm,
    format: DigestFormat,
    secret: &str,
    message: &str,
) -> Result<String, VerifyError> {
    let raw = keyed_hash(algorithm, secret.as_bytes(), message.as_bytes())?;
    Ok(render(&raw, format))
}

/// Constant time in content; differing lengths return early.
pub fn digests_match(computed: &str, expected: &str) -> bool {
    computed.as_bytes().ct_eq(expected.as_bytes()).into()
}
