//! Deterministic 6-digit code derivation
//!
//! The code a user types is not stored anywhere; it is recomputed on demand
//! from the server secret and the confirmation key, so the confirmation row
//! itself is the only persistent state a challenge needs.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length of a derived verification code
pub const CODE_LENGTH: usize = 6;

/// Derive the 6-digit verification code for a confirmation key
///
/// HMAC-SHA256 over the key, rendered as hex; the first six digit
/// characters of the digest form the code, left-padded with zeros when the
/// digest is digit-sparse. Total: any `(secret, identifier)` pair yields
/// exactly six ASCII digits, an empty identifier included.
pub fn derive_code(secret: &[u8], identifier: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(identifier.as_bytes());
    let digest = hex::encode(mac.finalize().into_bytes());

    let digits: String = digest
        .chars()
        .filter(char::is_ascii_digit)
        .take(CODE_LENGTH)
        .collect();
    format!("{:0>width$}", digits, width = CODE_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_is_deterministic() {
        let a = derive_code(b"server-secret", "confirmation-key-1");
        let b = derive_code(b"server-secret", "confirmation-key-1");
        assert_eq!(a, b);
    }

    #[test]
    fn test_derive_shape() {
        for identifier in ["", "k", "confirmation-key-1", "Zm9vYmFyYmF6"] {
            let code = derive_code(b"server-secret", identifier);
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_secret_changes_code() {
        let a = derive_code(b"secret-a", "confirmation-key-1");
        let b = derive_code(b"secret-b", "confirmation-key-1");
        assert_ne!(a, b);
    }

    #[test]
    fn test_identifier_changes_code() {
        let a = derive_code(b"server-secret", "confirmation-key-1");
        let b = derive_code(b"server-secret", "confirmation-key-2");
        assert_ne!(a, b);
    }
}
