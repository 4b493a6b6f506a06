use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Digest width in bytes.
pub const DIGEST_LEN: usize = 32;

/// Digest width in hex digits; the length of a full id on the command line.
pub const HEX_LEN: usize = DIGEST_LEN * 2;

/// A 256-bit BLAKE3 digest naming a blob or a commit.
///
/// Text forms are always lowercase hex, and so is the serde form, which keeps
/// commit records and `index.json` human-readable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; DIGEST_LEN]);

impl ObjectId {
    pub const fn from_hash(hash: [u8; DIGEST_LEN]) -> Self {
        Self(hash)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The first eight hex digits, as shown by `log --oneline`.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Whether the hex form begins with `prefix`, ignoring ASCII case.
    pub fn has_hex_prefix(&self, prefix: &str) -> bool {
        self.to_hex().starts_with(&prefix.to_ascii_lowercase())
    }

    /// Parse exactly [`HEX_LEN`] hex digits.
    pub fn from_hex(text: &str) -> Result<Self, TypeError> {
        let decoded = hex::decode(text).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let digest: [u8; DIGEST_LEN] =
            decoded
                .as_slice()
                .try_into()
                .map_err(|_| TypeError::InvalidLength {
                    expected: DIGEST_LEN,
                    actual: decoded.len(),
                })?;
        Ok(Self(digest))
    }
}

/// `true` for 1 to [`HEX_LEN`] hex digits, i.e. something that could
/// abbreviate an id.
pub fn is_hex_prefix(text: &str) -> bool {
    (1..=HEX_LEN).contains(&text.len()) && text.bytes().all(|b| b.is_ascii_hexdigit())
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectId").field(&self.short_hex()).finish()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = TypeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_hex(text)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_hex_is_8_chars() {
        let id = ObjectId::from_hash([0xab; 32]);
        assert_eq!(id.short_hex(), "abababab");
    }

    #[test]
    fn display_is_full_hex() {
        let id = ObjectId::from_hash([7; 32]);
        let display = format!("{id}");
        assert_eq!(display.len(), HEX_LEN);
        assert_eq!(display, id.to_hex());
    }

    #[test]
    fn from_hex_rejects_short_input() {
        let err = ObjectId::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 32,
                actual: 2
            }
        );
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        let err = ObjectId::from_hex("zz").unwrap_err();
        assert!(matches!(err, TypeError::InvalidHex(_)));
    }

    #[test]
    fn serializes_as_hex_string() {
        let id = ObjectId::from_hash([1; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.to_hex()));
        let parsed: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn prefix_matching_ignores_case() {
        let id = ObjectId::from_hash([0xab; 32]);
        assert!(id.has_hex_prefix("ABab"));
        assert!(id.has_hex_prefix(""));
        assert!(!id.has_hex_prefix("abc0"));
    }

    #[test]
    fn hex_prefix_validation() {
        assert!(is_hex_prefix("deadBEEF"));
        assert!(!is_hex_prefix(""));
        assert!(!is_hex_prefix("xyz"));
        assert!(!is_hex_prefix(&"a".repeat(HEX_LEN + 1)));
    }

    #[test]
    fn ordering_is_consistent() {
        let id1 = ObjectId::from_hash([0; 32]);
        let id2 = ObjectId::from_hash([1; 32]);
        assert!(id1 < id2);
    }

    proptest! {
        #[test]
        fn hex_text_form_parses_back(bytes in any::<[u8; 32]>()) {
            let id = ObjectId::from_hash(bytes);
            prop_assert_eq!(id.to_hex().parse::<ObjectId>().unwrap(), id);
            prop_assert!(id.has_hex_prefix(&id.short_hex()));
        }
    }
}
