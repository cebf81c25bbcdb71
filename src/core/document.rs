use sha2::{Digest, Sha256};

/// Document parsers.
pub mod parser;

/// Return the hex encoded SHA-256 digest of `input`.
pub fn sha256(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    #[test]
    fn sha256_is_hex() {
        assert_eq!(
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
            super::sha256(b"hello world")
        );
    }
}
