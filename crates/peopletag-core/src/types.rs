//! Strong type definitions for PeopleTag.
//!
//! Identifiers are newtypes so an address can never be passed where a
//! content pointer is expected.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CoreError, Result};
use crate::validation::{is_valid_address, is_valid_content_id};

/// A 20-byte wallet address.
///
/// The canonical text form is lowercase hex with a `0x` prefix. Parsing
/// accepts any hex case, so checksummed input normalizes to the same value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WalletAddress(pub [u8; 20]);

impl WalletAddress {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Parse from `0x`-prefixed hex.
    pub fn parse(s: &str) -> Result<Self> {
        if !is_valid_address(s) {
            return Err(CoreError::InvalidAddress(s.to_string()));
        }
        let bytes = hex::decode(&s[2..]).map_err(|_| CoreError::InvalidAddress(s.to_string()))?;
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Canonical lowercase `0x` hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Case-insensitive comparison against a textual address.
    ///
    /// Malformed text never matches.
    pub fn matches(&self, other: &str) -> bool {
        WalletAddress::parse(other).map_or(false, |o| o == *self)
    }
}

impl fmt::Debug for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletAddress({})", self.to_hex())
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for WalletAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<[u8; 20]> for WalletAddress {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for WalletAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for WalletAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for WalletAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Pointer to an immutable blob in content-addressed storage.
///
/// Values handed back by the ledger are opaque and taken as-is via
/// [`ContentId::new`]. Writers should go through [`ContentId::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Wrap an identifier without checking its shape.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Wrap an identifier, rejecting anything that is not CID-shaped.
    pub fn parse(id: &str) -> Result<Self> {
        if is_valid_content_id(id) {
            Ok(Self(id.to_string()))
        } else {
            Err(CoreError::InvalidContentId(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render a timestamp as ISO-8601 UTC with millisecond precision.
///
/// `2024-05-01T12:00:00.000Z`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_address_normalizes_case() {
        let checksummed = WalletAddress::parse("0x2c7536E3605D9C16a7a3D7b1898e529396a65c23").unwrap();
        let lower = WalletAddress::parse("0x2c7536e3605d9c16a7a3d7b1898e529396a65c23").unwrap();

        assert_eq!(checksummed, lower);
        assert_eq!(
            checksummed.to_hex(),
            "0x2c7536e3605d9c16a7a3d7b1898e529396a65c23"
        );
    }

    #[test]
    fn test_address_rejects_malformed() {
        assert_eq!(
            WalletAddress::parse("0x1234"),
            Err(CoreError::InvalidAddress("0x1234".into()))
        );
        assert!("not-an-address".parse::<WalletAddress>().is_err());
    }

    #[test]
    fn test_address_matches_ignores_case() {
        let addr = WalletAddress::from_bytes([0xab; 20]);
        assert!(addr.matches("0xABABABABABABABABABABABABABABABABABABABAB"));
        assert!(!addr.matches("0xabababababababababababababababababababac"));
        assert!(!addr.matches("garbage"));
    }

    #[test]
    fn test_address_serde_as_string() {
        let addr = WalletAddress::from_bytes([0x01; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x0101010101010101010101010101010101010101\"");

        let back: WalletAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn test_content_id_parse() {
        assert!(ContentId::parse("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG").is_ok());
        assert!(matches!(
            ContentId::parse("nope"),
            Err(CoreError::InvalidContentId(_))
        ));
        // Opaque construction never fails.
        assert_eq!(ContentId::new("nope").as_str(), "nope");
    }

    #[test]
    fn test_format_timestamp_millis_z() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-05-01T12:00:00.000Z");
    }

    mod props {
        use proptest::prelude::*;

        use crate::types::WalletAddress;
        use crate::validation::is_valid_address;

        proptest! {
            #[test]
            fn test_address_text_roundtrip(bytes in any::<[u8; 20]>(), upper in any::<bool>()) {
                let addr = WalletAddress::from_bytes(bytes);
                let hex = addr.to_hex();
                let text = if upper {
                    format!("0x{}", hex[2..].to_uppercase())
                } else {
                    hex.clone()
                };

                prop_assert!(is_valid_address(&text));
                prop_assert_eq!(WalletAddress::parse(&text).unwrap(), addr);
                prop_assert!(addr.matches(&text));
            }

            #[test]
            fn test_address_rejects_wrong_length(s in "0x[0-9a-f]{0,39}") {
                prop_assert!(WalletAddress::parse(&s).is_err());
            }
        }
    }
}
