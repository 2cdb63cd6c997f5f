//! Key material consumed by the signing methods
//!
//! Keys are supplied by an external key store. Each algorithm accepts exactly
//! one key kind, and a verifier pins its key kind in configuration, so a
//! public RSA key can never be fed to HMAC verification as a secret.
//! Secret material is zeroized on drop.

use std::fmt;

use zeroize::Zeroizing;

/// Elliptic curves a key may be defined on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcCurve {
    /// NIST P-256 (secp256r1)
    P256,
    /// NIST P-384 (secp384r1)
    P384,
    /// NIST P-521 (secp521r1)
    P521,
}

impl EcCurve {
    /// Curve size in bits
    #[must_use]
    pub fn bit_size(self) -> u32 {
        match self {
            Self::P256 => 256,
            Self::P384 => 384,
            Self::P521 => 521,
        }
    }
}

/// Symmetric HMAC secret
#[derive(Clone)]
pub struct HmacKey(Zeroizing<Vec<u8>>);

impl HmacKey {
    /// Wrap raw secret bytes
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(secret.into()))
    }

    /// Raw secret bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacKey")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

/// EC private key: curve plus the big-endian private scalar
#[derive(Clone)]
pub struct EcPrivateKey {
    curve: EcCurve,
    scalar: Zeroizing<Vec<u8>>,
}

impl EcPrivateKey {
    /// Private key from a curve and its raw scalar bytes
    #[must_use]
    pub fn new(curve: EcCurve, scalar: impl Into<Vec<u8>>) -> Self {
        Self {
            curve,
            scalar: Zeroizing::new(scalar.into()),
        }
    }

    /// P-256 private key from a `p256` signing key
    #[must_use]
    pub fn from_p256(key: &p256::ecdsa::SigningKey) -> Self {
        Self::new(EcCurve::P256, key.to_bytes().to_vec())
    }

    /// Curve the key is defined on
    pub fn curve(&self) -> EcCurve {
        self.curve
    }

    /// Raw private scalar
    pub fn scalar(&self) -> &[u8] {
        &self.scalar
    }
}

impl fmt::Debug for EcPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcPrivateKey")
            .field("curve", &self.curve)
            .finish_non_exhaustive()
    }
}

/// EC public key: curve plus the SEC1-encoded point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcPublicKey {
    curve: EcCurve,
    sec1: Vec<u8>,
}

impl EcPublicKey {
    /// Public key from a curve and its SEC1 point encoding
    #[must_use]
    pub fn new(curve: EcCurve, sec1: impl Into<Vec<u8>>) -> Self {
        Self {
            curve,
            sec1: sec1.into(),
        }
    }

    /// P-256 public key from a `p256` verifying key (uncompressed point)
    #[must_use]
    pub fn from_p256(key: &p256::ecdsa::VerifyingKey) -> Self {
        Self::new(EcCurve::P256, key.to_encoded_point(false).as_bytes().to_vec())
    }

    /// Curve the key is defined on
    pub fn curve(&self) -> EcCurve {
        self.curve
    }

    /// SEC1 point encoding
    pub fn sec1(&self) -> &[u8] {
        &self.sec1
    }
}

/// Key used to produce signatures
#[derive(Debug, Clone)]
pub enum SigningKey {
    /// HS256 shared secret
    Hmac(HmacKey),
    /// RS256 private key
    Rsa(Box<rsa::RsaPrivateKey>),
    /// ES256 private key
    Ec(EcPrivateKey),
}

impl SigningKey {
    /// HMAC signing key from raw secret bytes
    #[must_use]
    pub fn hmac(secret: impl Into<Vec<u8>>) -> Self {
        Self::Hmac(HmacKey::new(secret))
    }

    /// RSA signing key
    #[must_use]
    pub fn rsa(key: rsa::RsaPrivateKey) -> Self {
        Self::Rsa(Box::new(key))
    }

    /// Human-readable key kind, used in mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Hmac(_) => "HMAC secret",
            Self::Rsa(_) => "RSA private key",
            Self::Ec(_) => "EC private key",
        }
    }
}

impl From<EcPrivateKey> for SigningKey {
    fn from(key: EcPrivateKey) -> Self {
        Self::Ec(key)
    }
}

/// Key used to check signatures
#[derive(Debug, Clone)]
pub enum VerifyingKey {
    /// HS256 shared secret
    Hmac(HmacKey),
    /// RS256 public key
    Rsa(Box<rsa::RsaPublicKey>),
    /// ES256 public key
    Ec(EcPublicKey),
}

impl VerifyingKey {
    /// HMAC verifying key from raw secret bytes
    #[must_use]
    pub fn hmac(secret: impl Into<Vec<u8>>) -> Self {
        Self::Hmac(HmacKey::new(secret))
    }

    /// RSA verifying key
    #[must_use]
    pub fn rsa(key: rsa::RsaPublicKey) -> Self {
        Self::Rsa(Box::new(key))
    }

    /// Human-readable key kind, used in mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Hmac(_) => "HMAC secret",
            Self::Rsa(_) => "RSA public key",
            Self::Ec(_) => "EC public key",
        }
    }
}

impl From<EcPublicKey> for VerifyingKey {
    fn from(key: EcPublicKey) -> Self {
        Self::Ec(key)
    }
}
