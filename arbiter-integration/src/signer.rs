use md5::{Digest, Md5};
use std::collections::BTreeMap;

/// Sign a request parameter set for an authenticated command channel.
///
/// The canonical payload is the key-sorted `k=v&…` parameter string followed by
/// `&secret_key=<secret>`, digested with MD5 and rendered as uppercase hex. The secret only
/// ever enters the digest, never the transmitted frame.
pub fn sign_request(params: &BTreeMap<String, String>, secret: &str) -> String {
    let mut canonical = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    canonical.push_str("&secret_key=");
    canonical.push_str(secret);

    hex::encode_upper(Md5::digest(canonical.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_request_is_key_sorted_uppercase_hex() {
        let mut params = BTreeMap::new();
        params.insert("symbol".to_string(), "btc_usdt".to_string());
        params.insert("api_key".to_string(), "key".to_string());

        let signature = sign_request(&params, "secret");

        // Canonical payload: "api_key=key&symbol=btc_usdt&secret_key=secret"
        let expected = hex::encode_upper(Md5::digest(
            "api_key=key&symbol=btc_usdt&secret_key=secret".as_bytes(),
        ));
        assert_eq!(signature, expected);
        assert_eq!(signature.len(), 32);
        assert!(signature.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_sign_request_excludes_secret_from_parameters() {
        let mut params = BTreeMap::new();
        params.insert("api_key".to_string(), "key".to_string());

        let with_secret = sign_request(&params, "secret");
        let without_secret = sign_request(&params, "other");

        assert_ne!(with_secret, without_secret);
        assert!(!params.contains_key("secret_key"));
    }
}
