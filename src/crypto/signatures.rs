use crate::crypto::hash::Hash256;
use crate::crypto::keys::{PrivateKey, PublicKey};
use crate::{LedgerError, Result};
use secp256k1::{ecdsa::Signature as Secp256k1Signature, Message, Secp256k1};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Compact ECDSA signature over secp256k1.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
}

impl Signature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 64 {
            return Err(LedgerError::Crypto("Invalid signature length".to_string()));
        }
        
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        
        r.copy_from_slice(&bytes[0..32]);
        s.copy_from_slice(&bytes[32..64]);
        
        Ok(Self { r, s })
    }
    
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(64);
        bytes.extend_from_slice(&self.r);
        bytes.extend_from_slice(&self.s);
        bytes
    }
    
    pub fn from_secp256k1(signature: Secp256k1Signature) -> Self {
        let compact = signature.serialize_compact();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&compact[0..32]);
        s.copy_from_slice(&compact[32..64]);
        
        Self { r, s }
    }
    
    pub fn to_secp256k1(&self) -> Result<Secp256k1Signature> {
        Secp256k1Signature::from_compact(&self.to_bytes())
            .map_err(|e| LedgerError::Crypto(format!("Invalid signature: {}", e)))
    }
    
    pub fn to_der(&self) -> Result<Vec<u8>> {
        let secp_sig = self.to_secp256k1()?;
        Ok(secp_sig.serialize_der().to_vec())
    }
    
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let secp_sig = Secp256k1Signature::from_der(der)
            .map_err(|e| LedgerError::Crypto(format!("Invalid DER signature: {}", e)))?;
        
        Ok(Self::from_secp256k1(secp_sig))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", hex::encode(self.to_bytes()))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.to_bytes()))
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let hex_str = String::deserialize(deserializer)?;
        let bytes = hex::decode(&hex_str).map_err(serde::de::Error::custom)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

/// Signing and verification over arbitrary messages. The message is
/// reduced to its SHA-256 digest before it reaches the curve.
pub struct SignatureUtils;

impl SignatureUtils {
    pub fn sign(private_key: &PrivateKey, message: &[u8]) -> Result<Signature> {
        let secp = Secp256k1::signing_only();
        let digest = Hash256::hash(message);
        let message = Message::from_digest(*digest.as_bytes());
        
        let signature = secp.sign_ecdsa(&message, private_key.secret_key());
        Ok(Signature::from_secp256k1(signature))
    }
    
    /// `Ok(false)` for a well-formed signature that does not match; `Err` only
    /// when the key or signature bytes cannot be decoded at all.
    pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> Result<bool> {
        let secp = Secp256k1::verification_only();
        let digest = Hash256::hash(message);
        let message = Message::from_digest(*digest.as_bytes());
        
        let secp_public_key = public_key.to_secp256k1()?;
        let secp_signature = signature.to_secp256k1()?;
        
        match secp.verify_ecdsa(&message, &secp_signature, &secp_public_key) {
            Ok(()) => Ok(true),
            Err(_) => Ok(false),
        }
    }
}
