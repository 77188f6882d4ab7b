//! Content fingerprints for cheap change detection.

use sha2::{Digest, Sha256};

/// SHA-256 digest of a document's text.
///
/// Only used to compare content; equal fingerprints are treated as equal
/// text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        Self(hasher.finalize().into())
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_text_equal_fingerprint() {
        assert_eq!(Fingerprint::of("# Title\n"), Fingerprint::of("# Title\n"));
    }

    #[test]
    fn test_single_character_change() {
        assert_ne!(Fingerprint::of("hello world"), Fingerprint::of("hello world!"));
        assert_ne!(Fingerprint::of("abc"), Fingerprint::of("abd"));
        assert_ne!(Fingerprint::of(""), Fingerprint::of("\n"));
    }

    #[test]
    fn test_display_is_sha256_hex() {
        assert_eq!(
            Fingerprint::of("").to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
