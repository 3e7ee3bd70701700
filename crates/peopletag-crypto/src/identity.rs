//! Caller authentication.
//!
//! A request carries three optional attributes: the claimed wallet address,
//! a message and a signature over it. [`Identity::authenticate`] turns them
//! into a [`Caller`].

use peopletag_core::WalletAddress;

use crate::error::{CryptoError, Result};
use crate::kdf::{derive_key, DerivedKey};
use crate::signature::verify_signature;

/// Identity proof as presented by a caller.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub address: String,
    pub message: Option<String>,
    pub signature: Option<String>,
}

impl Identity {
    /// Create an identity proof.
    pub fn new(address: &str, message: Option<&str>, signature: Option<&str>) -> Self {
        Self {
            address: address.to_string(),
            message: message.map(str::to_string),
            signature: signature.map(str::to_string),
        }
    }

    /// No proof at all.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Verify the proof.
    ///
    /// Missing parts mean public access, not an error. A proof that is
    /// present but does not check out is rejected.
    pub fn authenticate(&self) -> Result<Caller> {
        let (message, signature) = match (present(&self.message), present(&self.signature)) {
            (Some(m), Some(s)) if !self.address.trim().is_empty() => (m, s),
            _ => return Ok(Caller::Anonymous),
        };

        let address = WalletAddress::parse(self.address.trim())
            .map_err(|e| CryptoError::AuthenticationFailure(e.to_string()))?;

        if !verify_signature(&address.to_hex(), message, signature) {
            return Err(CryptoError::AuthenticationFailure(format!(
                "signature does not belong to {}",
                address
            )));
        }

        let key = match derive_key(signature) {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::warn!(%address, "key derivation failed, continuing without key: {}", e);
                None
            }
        };

        Ok(Caller::Verified(VerifiedCaller { address, key }))
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("address", &self.address)
            .field("message", &self.message)
            .field("signature", &self.signature.as_ref().map(|_| ".."))
            .finish()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Who is making a request.
#[derive(Debug, Clone)]
pub enum Caller {
    /// No identity proof was supplied.
    Anonymous,
    /// Proof verified for an address.
    Verified(VerifiedCaller),
}

impl Caller {
    /// The verified address, if any.
    pub fn address(&self) -> Option<&WalletAddress> {
        match self {
            Caller::Anonymous => None,
            Caller::Verified(v) => Some(&v.address),
        }
    }

    /// Whether this caller proved ownership of `address`.
    pub fn is_owner_of(&self, address: &WalletAddress) -> bool {
        self.address() == Some(address)
    }

    /// The derived key, only if this caller owns `address`.
    pub fn key_for(&self, address: &WalletAddress) -> Option<&DerivedKey> {
        match self {
            Caller::Verified(v) if v.address == *address => v.key.as_ref(),
            _ => None,
        }
    }
}

/// A caller whose signature checked out.
#[derive(Debug, Clone)]
pub struct VerifiedCaller {
    address: WalletAddress,
    key: Option<DerivedKey>,
}

impl VerifiedCaller {
    pub fn address(&self) -> &WalletAddress {
        &self.address
    }

    /// Key for this caller's private profile. Absent when derivation failed.
    pub fn key(&self) -> Option<&DerivedKey> {
        self.key.as_ref()
    }
}
