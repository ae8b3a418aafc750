//! Webhook signature helpers.
//!
//! Cashfree signs each webhook delivery with HMAC-SHA256 over the raw request body, keyed with the client secret,
//! and sends the hex-encoded digest in the `x-webhook-signature` header.
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Calculates the hex-encoded HMAC-SHA256 signature for `data`.
pub fn calculate_signature(secret: &str, data: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(data);
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a webhook signature in constant time. Returns `false` for malformed (non-hex) signatures.
pub fn verify_signature(secret: &str, data: &[u8], signature: &str) -> bool {
    let Ok(sig_bytes) = hex::decode(signature) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(data);
    mac.verify_slice(&sig_bytes).is_ok()
}

#[cfg(test)]
mod test {
    use super::{calculate_signature, verify_signature};

    const SECRET: &str = "cfsk_ma_test_cafebabe";
    const BODY: &[u8] = br#"{"event":"order.paid","order":{"order_id":"ORDER-1"}}"#;

    #[test]
    fn valid_signature_round_trips() {
        let sig = calculate_signature(SECRET, BODY);
        assert!(verify_signature(SECRET, BODY, &sig));
    }

    #[test]
    fn tampered_body_is_rejected() {
        let sig = calculate_signature(SECRET, BODY);
        let mut tampered = BODY.to_vec();
        tampered[20] ^= 1;
        assert!(!verify_signature(SECRET, &tampered, &sig));
    }

    #[test]
    fn wrong_key_is_rejected() {
        let sig = calculate_signature(SECRET, BODY);
        assert!(!verify_signature("other_secret", BODY, &sig));
    }

    #[test]
    fn malformed_signature_is_rejected() {
        assert!(!verify_signature(SECRET, BODY, "not hex at all"));
        assert!(!verify_signature(SECRET, BODY, ""));
    }
}
