//! Syntactic checks for externally supplied identifiers.

/// Number of hex characters in an address (without the `0x` prefix).
const ADDRESS_HEX_LEN: usize = 40;

/// Length of a CIDv0 string: `Qm` followed by 44 base58 characters.
const CID_V0_LEN: usize = 46;

/// Check that `s` is `0x` followed by exactly 40 hex digits (any case).
pub fn is_valid_address(s: &str) -> bool {
    match s.strip_prefix("0x") {
        Some(rest) => rest.len() == ADDRESS_HEX_LEN && rest.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

/// Check that `s` has the shape of an IPFS CID.
///
/// Accepts CIDv0 (`Qm` + 44 base58btc characters) and base32 CIDv1
/// (`baf` + lowercase alphanumerics). This is a shape check only; the
/// multihash inside is not decoded.
pub fn is_valid_content_id(s: &str) -> bool {
    if let Some(rest) = s.strip_prefix("Qm") {
        return s.len() == CID_V0_LEN && rest.bytes().all(is_base58_char);
    }
    if let Some(rest) = s.strip_prefix("baf") {
        return !rest.is_empty()
            && rest
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
    }
    false
}

fn is_base58_char(b: u8) -> bool {
    matches!(b, b'1'..=b'9' | b'A'..=b'H' | b'J'..=b'N' | b'P'..=b'Z' | b'a'..=b'k' | b'm'..=b'z')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_addresses() {
        assert!(is_valid_address("0x2c7536e3605d9c16a7a3d7b1898e529396a65c23"));
        assert!(is_valid_address("0x2c7536E3605D9C16a7a3D7b1898e529396a65c23"));
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("0x"));
        assert!(!is_valid_address("2c7536e3605d9c16a7a3d7b1898e529396a65c23"));
        assert!(!is_valid_address("0X2c7536e3605d9c16a7a3d7b1898e529396a65c23"));
        assert!(!is_valid_address("0x2c7536e3605d9c16a7a3d7b1898e529396a65c2"));
        assert!(!is_valid_address("0x2c7536e3605d9c16a7a3d7b1898e529396a65c233"));
        assert!(!is_valid_address("0x2c7536e3605d9c16a7a3d7b1898e529396a65cgg"));
    }

    #[test]
    fn test_content_id_shapes() {
        assert!(is_valid_content_id(
            "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG"
        ));
        assert!(is_valid_content_id(
            "bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi"
        ));

        // Base58 excludes 0, O, I and l.
        assert!(!is_valid_content_id(
            "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbd0"
        ));
        assert!(!is_valid_content_id("QmTooShort"));
        assert!(!is_valid_content_id("baf"));
        assert!(!is_valid_content_id("bafyBEIG"));
        assert!(!is_valid_content_id("ipfs://whatever"));
    }
}
