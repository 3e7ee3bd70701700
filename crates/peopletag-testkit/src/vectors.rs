//! Golden test vectors for cross-implementation verification.
//!
//! Every value here was produced by an implementation independent of this
//! workspace. The browser client that encrypts private profiles must agree
//! with all of them bit for bit.

use peopletag_crypto::{
    decrypt_profile, derive_key, derive_key_from_bytes, personal_message_hash, recover_address,
    EncryptedEnvelope, EncryptionFormat, WalletSignature,
};

/// A personal-message signature and everything derived from it.
#[derive(Debug, Clone)]
pub struct SignatureVector {
    pub name: &'static str,
    /// Signer's secp256k1 secret key (hex).
    pub private_key: &'static str,
    /// Signer's address, lowercase.
    pub address: &'static str,
    pub message: &'static str,
    /// Keccak-256 of the prefixed message (hex).
    pub message_hash: &'static str,
    /// `r || s || v` (hex, `0x`-prefixed).
    pub signature: &'static str,
    /// HKDF output over the signature bytes (hex).
    pub derived_key: &'static str,
}

/// An HKDF input and its expected key.
#[derive(Debug, Clone)]
pub struct KdfVector {
    pub name: &'static str,
    pub ikm: Vec<u8>,
    pub expected_key: &'static str,
}

/// An envelope and the plaintext it opens to.
#[derive(Debug, Clone)]
pub struct EnvelopeVector {
    pub name: &'static str,
    /// Signature bytes the key is derived from.
    pub key_ikm: Vec<u8>,
    pub format: EncryptionFormat,
    pub nonce: &'static str,
    pub ciphertext: &'static str,
    pub plaintext: &'static str,
}

impl EnvelopeVector {
    pub fn envelope(&self) -> EncryptedEnvelope {
        EncryptedEnvelope {
            ciphertext: self.ciphertext.to_string(),
            nonce: self.nonce.to_string(),
            format: self.format,
        }
    }
}

/// Private profile document used by every envelope vector.
pub const PAYLOAD_PLAINTEXT: &str = r##"{"bio":"gm","birthDate":"1990-01-01","tagsList":["#DeFi","#Secret"],"socialLinks":["https://x.com/alice"]}"##;

/// The reference wallet.
pub const WALLET: SignatureVector = SignatureVector {
    name: "sign-in message",
    private_key: "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318",
    address: "0x2c7536e3605d9c16a7a3d7b1898e529396a65c23",
    message: "Sign in to PeopleTag",
    message_hash: "b919095cb67ab5b116f4997f37bea915ae076d46d5ba18cff15cb310a219d8c8",
    signature: "0xbb50e2d89a4ed70663d080659fe0ad4b9bc3e06c17a227433966cb59ceee020d33cd4d743eb24acc5fcb24c368487cc6a9e384f0b16b87f1438398f2a08783291c",
    derived_key: "664cb92550227e434ce7b5b5943fc2ad8da2f2cb353e76dea93491be2360d35a",
};

/// Get all KDF vectors.
pub fn kdf_vectors() -> Vec<KdfVector> {
    vec![
        KdfVector {
            name: "constant 0x11 signature",
            ikm: vec![0x11; 65],
            expected_key: "70a3c8342385b9d2d0d9fe6a0660a83dfa0c3d21d6643651daa97660f7b171de",
        },
        KdfVector {
            name: "counting bytes 0..65",
            ikm: (0u8..65).collect(),
            expected_key: "1886093df7e65c748c2bf49557722db6a86e4b7c9010a3938c0e13c60a2b857f",
        },
        KdfVector {
            name: "reference wallet signature",
            ikm: decode(WALLET.signature),
            expected_key: WALLET.derived_key,
        },
    ]
}

/// Get all envelope vectors.
pub fn envelope_vectors() -> Vec<EnvelopeVector> {
    vec![
        EnvelopeVector {
            name: "aes-256-gcm under the reference wallet key",
            key_ikm: decode(WALLET.signature),
            format: EncryptionFormat::Aes256Gcm,
            nonce: "a1a2a3a4a5a6a7a8a9aaabac",
            ciphertext: "9705d41bc00df556e236ca45c5bd7f1316a971e15c43c13cd70d2558aca1f145c50ec1641c54c19cdea3c8110b053fb929aa122f1e96c1d418df70faa4e79c6c7bc96893eaa6e5a99e1412e3398dd34cd02f4ec1353d412b06342deccb2f4e21c401b9c76912e2332b46de9ee4dda394b3c45075c04a2f017a8a",
            plaintext: PAYLOAD_PLAINTEXT,
        },
        EnvelopeVector {
            name: "aes-256-gcm under the 0x11 key",
            key_ikm: vec![0x11; 65],
            format: EncryptionFormat::Aes256Gcm,
            nonce: "000102030405060708090a0b",
            ciphertext: "a99ac0ebb27aca3d11e58d05b99a9a71a79c4cbead50412a30d95905500848646d840db05570e0830f46d5a4e677513f23c803c271013f16e0402f3f06b8e1e275926ecf0e8b87e8526a76485b4288c7d49f276522ceca6613236dee75495eb3ffc3cca79c8442ecc465f939a4d98386979e5f97fcfeaf001c6a",
            plaintext: PAYLOAD_PLAINTEXT,
        },
        EnvelopeVector {
            name: "chacha20-poly1305 under the 0x11 key",
            key_ikm: vec![0x11; 65],
            format: EncryptionFormat::ChaCha20Poly1305,
            nonce: "000102030405060708090a0b",
            ciphertext: "1513a9a7710e3202d098047f16474d4efa295d3f14edab23acdacbd85161aa44e7989afd4ce4a140b9cfb2621aa5ac9c1780718652f7768ca55c7173442f171035bc28da1e85c540958a80c972347539244c6b9436331d4c56cf3d86d4758a407b478a8efb139d7d340569ea746bd74ce17b071a284de7ae0e94",
            plaintext: PAYLOAD_PLAINTEXT,
        },
    ]
}

/// Check every vector against this implementation.
///
/// Returns `(name, matches)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool)> {
    let mut results = Vec::new();

    let hash_ok = hex::encode(personal_message_hash(WALLET.message.as_bytes())) == WALLET.message_hash;
    let recovered_ok = WalletSignature::from_hex(WALLET.signature)
        .and_then(|sig| recover_address(WALLET.message, &sig))
        .map_or(false, |addr| addr.to_hex() == WALLET.address);
    let key_ok = derive_key(WALLET.signature)
        .map(|k| hex::encode(k.as_bytes()) == WALLET.derived_key)
        .unwrap_or(false);
    results.push((
        WALLET.name.to_string(),
        hash_ok && recovered_ok && key_ok,
    ));

    for v in kdf_vectors() {
        let ok = derive_key_from_bytes(&v.ikm)
            .map(|k| hex::encode(k.as_bytes()) == v.expected_key)
            .unwrap_or(false);
        results.push((v.name.to_string(), ok));
    }

    for v in envelope_vectors() {
        let expected: Result<serde_json::Value, _> = serde_json::from_str(v.plaintext);
        let ok = derive_key_from_bytes(&v.key_ikm)
            .and_then(|key| decrypt_profile(&v.envelope(), key.as_bytes()))
            .ok()
            .and_then(|payload| serde_json::to_value(payload).ok())
            .zip(expected.ok())
            .map_or(false, |(got, want)| got == want);
        results.push((v.name.to_string(), ok));
    }

    results
}

fn decode(s: &str) -> Vec<u8> {
    hex::decode(s.trim_start_matches("0x")).unwrap_or_default()
}
