use http::HeaderMap;
use ring::hmac;
use thiserror::Error as ThisError;

/// Signature headers, in order of preference
const SIGNATURE_HEADERS: &[&str] = &["X-Hub-Signature-256", "X-Hub-Signature"];

/// Why a signature was rejected
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("missing signature header")]
    Missing,
    #[error("malformed signature header")]
    Malformed,
    #[error("unsupported signature algorithm {0:?}")]
    UnsupportedAlgorithm(String),
    #[error("signature does not match the payload")]
    Mismatch,
}

/// Ensure that the provided signature from GitHub is valid
pub fn github(raw_body: &[u8], headers: &HeaderMap, secret: &[u8]) -> Result<(), Error> {
    // Get the most specific header value
    let raw_signature = SIGNATURE_HEADERS
        .iter()
        .find_map(|name| headers.get(*name))
        .ok_or(Error::Missing)?
        .to_str()
        .map_err(|_| Error::Malformed)?;

    // Split the `<algorithm>=<hex digest>` form
    let (name, signature_hex) = raw_signature.split_once('=').ok_or(Error::Malformed)?;
    let algorithm = match name {
        "sha256" => hmac::HMAC_SHA256,
        "sha1" => hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
        _ => return Err(Error::UnsupportedAlgorithm(name.to_owned())),
    };
    let signature = hex::decode(signature_hex).map_err(|_| Error::Malformed)?;

    let key = hmac::Key::new(algorithm, secret);

    // Display the expected signature in debug builds
    #[cfg(debug_assertions)]
    tracing::debug!(
        expected = %hex::encode(hmac::sign(&key, raw_body).as_ref()),
        got = signature_hex,
        "signature validation"
    );

    // Verify the signature
    hmac::verify(&key, raw_body, &signature).map_err(|_| Error::Mismatch)
}

/// Sign a payload the way GitHub does for the given header
#[cfg(test)]
pub(crate) fn sign(header: &str, raw_body: &[u8], secret: &[u8]) -> (&'static str, String) {
    let (name, prefix, algorithm) = match header {
        "X-Hub-Signature" => ("X-Hub-Signature", "sha1", hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY),
        _ => ("X-Hub-Signature-256", "sha256", hmac::HMAC_SHA256),
    };
    let key = hmac::Key::new(algorithm, secret);
    let signature = hmac::sign(&key, raw_body);

    (name, format!("{}={}", prefix, hex::encode(signature.as_ref())))
}
