use crate::crypto::signatures::{Signature, SignatureUtils};
use crate::{LedgerError, Result};
use rand::{rngs::OsRng, RngCore};
use secp256k1::{PublicKey as Secp256k1PublicKey, Secp256k1, SecretKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Clone)]
pub struct PrivateKey {
    key: SecretKey,
}

/// Compressed SEC1 public key. Equality, ordering and hashing are by content,
/// so two independently decoded copies of one key are the same owner.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey {
    key: Vec<u8>,
}

#[derive(Clone)]
pub struct KeyPair {
    pub private_key: PrivateKey,
    pub public_key: PublicKey,
}

impl PrivateKey {
    pub fn new() -> Result<Self> {
        let mut rng = OsRng;
        let mut secret_bytes = [0u8; 32];
        rng.fill_bytes(&mut secret_bytes);
        
        let secret_key = SecretKey::from_slice(&secret_bytes)
            .map_err(|e| LedgerError::Crypto(format!("Failed to create private key: {}", e)))?;
        
        Ok(Self { key: secret_key })
    }
    
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(LedgerError::Crypto("Private key must be 32 bytes".to_string()));
        }
        
        let secret_key = SecretKey::from_slice(bytes)
            .map_err(|e| LedgerError::Crypto(format!("Invalid private key: {}", e)))?;
        
        Ok(Self { key: secret_key })
    }
    
    pub fn to_bytes(&self) -> [u8; 32] {
        self.key.secret_bytes()
    }
    
    pub fn public_key(&self) -> PublicKey {
        let secp = Secp256k1::signing_only();
        let public_key = Secp256k1PublicKey::from_secret_key(&secp, &self.key);
        
        PublicKey {
            key: public_key.serialize().to_vec(),
        }
    }
    
    pub(crate) fn secret_key(&self) -> &SecretKey {
        &self.key
    }
    
    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        SignatureUtils::sign(self, message)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let public_key = Secp256k1PublicKey::from_slice(bytes)
            .map_err(|e| LedgerError::Crypto(format!("Invalid public key: {}", e)))?;
        
        // Normalise uncompressed input so equality stays a byte comparison
        Ok(Self {
            key: public_key.serialize().to_vec(),
        })
    }
    
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| LedgerError::Crypto(format!("Invalid public key hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }
    
    pub fn to_bytes(&self) -> &[u8] {
        &self.key
    }
    
    pub fn to_hex(&self) -> String {
        hex::encode(&self.key)
    }
    
    pub(crate) fn to_secp256k1(&self) -> Result<Secp256k1PublicKey> {
        Secp256k1PublicKey::from_slice(&self.key)
            .map_err(|e| LedgerError::Crypto(format!("Invalid public key: {}", e)))
    }
    
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<bool> {
        SignatureUtils::verify(self, message, signature)
    }
}

impl KeyPair {
    pub fn generate() -> Result<Self> {
        let private_key = PrivateKey::new()?;
        Ok(Self::from_private_key(private_key))
    }
    
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        
        Self {
            private_key,
            public_key,
        }
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}
