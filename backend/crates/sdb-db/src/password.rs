use sha2::{Digest, Sha256};

const SALT_BYTES: usize = 16;

/// Fresh random salt, hex encoded
pub fn salt() -> String {
    hex(&rand::random::<[u8; SALT_BYTES]>())
}

/// Hex SHA-256 digest of `salt` followed by `pass`, stored in place of the
/// user's password
pub fn digest(salt: &str, pass: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(pass.as_bytes());
    hex(&hasher.finalize())
}

/// Compare `pass` against a stored salted digest without short-circuiting
/// on the first differing byte
pub fn verify(pass: &str, salt: &str, stored: &str) -> bool {
    let computed = digest(salt, pass);
    computed.len() == stored.len()
        && computed
            .bytes()
            .zip(stored.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_same_password_when_salted_twice_then_digests_differ() {
        let (first, second) = (salt(), salt());

        assert_ne!(first, second);
        assert_ne!(digest(&first, "secret"), digest(&second, "secret"));
    }

    #[test]
    fn given_matching_salt_and_password_when_verified_then_accepted() {
        let salt = salt();
        let stored = digest(&salt, "secret");

        assert!(verify("secret", &salt, &stored));
        assert!(!verify("guess", &salt, &stored));
        assert!(!verify("secret", "other-salt", &stored));
    }
}
