//! Digest and signature primitives

pub mod keys;
pub mod signatures;
pub mod hash;

pub use keys::{PrivateKey, PublicKey, KeyPair};
pub use signatures::{Signature, SignatureUtils};
pub use hash::{Hash256, Hashable};
