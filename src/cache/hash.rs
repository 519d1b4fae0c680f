//! Content hashing using blake3.

use std::fmt;

/// Tag mixed into every module hash; bumped when the artifact format changes.
const MODULE_FORMAT: &[u8] = b"veneer-layout/lua54/2\0";

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash a layout script's source.
    pub fn of_module(source: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(MODULE_FORMAT);
        hasher.update(source);
        Self(*hasher.finalize().as_bytes())
    }

    /// Convert to hex string.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Display first 16 chars of hex for brevity
        write!(f, "{}", &self.to_hex()[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_source_same_hash() {
        let a = ContentHash::of_module(b"return function(ctx) end");
        let b = ContentHash::of_module(b"return function(ctx) end");
        assert_eq!(a, b);
        assert_ne!(a, ContentHash::of_module(b"return function() end"));
    }

    #[test]
    fn test_hex_and_display() {
        let hash = ContentHash::of_module(b"x");
        let hex = hash.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.starts_with(&hash.to_string()));
        assert_eq!(hash.to_string().len(), 16);
    }
}
