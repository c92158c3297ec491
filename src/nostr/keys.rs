// ABOUTME: Keys - a secp256k1 keypair used to sign Nostr events with BIP-340
// ABOUTME: Schnorr signatures, loaded from hex or generated at random.

use rand::RngCore;
use secp256k1::{All, Keypair, Message, Secp256k1, SecretKey, XOnlyPublicKey, schnorr};

use crate::config::KeySetting;
use crate::error::NostrError;

/// A signing keypair. `Debug` never prints the secret half.
#[derive(Clone)]
pub struct Keys {
    secp: Secp256k1<All>,
    keypair: Keypair,
    public_key: XOnlyPublicKey,
}

impl Keys {
    /// Generate a fresh random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        loop {
            let mut bytes = [0u8; 32];
            rng.fill_bytes(&mut bytes);
            // Out-of-range scalars are astronomically rare; draw again.
            if let Ok(secret) = SecretKey::from_slice(&bytes) {
                return Self::from_secret_key(secret);
            }
        }
    }

    /// Parse a 64-character hex secret key. A leading `0x` is tolerated.
    pub fn from_hex(hex_key: &str) -> Result<Self, NostrError> {
        let trimmed = hex_key.trim();
        let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);

        let bytes = hex::decode(trimmed)
            .map_err(|e| NostrError::InvalidKey(format!("secret key is not hex: {e}")))?;
        if bytes.len() != 32 {
            return Err(NostrError::InvalidKey(format!(
                "secret key must be 32 bytes, got {}",
                bytes.len()
            )));
        }

        let secret =
            SecretKey::from_slice(&bytes).map_err(|e| NostrError::InvalidKey(e.to_string()))?;
        Ok(Self::from_secret_key(secret))
    }

    /// Load keys as described by the configuration.
    pub fn from_setting(setting: &KeySetting) -> Result<Self, NostrError> {
        match setting {
            KeySetting::Generate => Ok(Self::generate()),
            KeySetting::Hex(hex_key) => Self::from_hex(hex_key),
        }
    }

    fn from_secret_key(secret: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let keypair = Keypair::from_secret_key(&secp, &secret);
        let (public_key, _parity) = keypair.x_only_public_key();
        Self {
            secp,
            keypair,
            public_key,
        }
    }

    /// The x-only public key as 64 lowercase hex characters.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }

    /// The secret key as 64 lowercase hex characters.
    pub fn secret_key_hex(&self) -> String {
        hex::encode(self.keypair.secret_bytes())
    }

    /// Sign a 32-byte digest. Deterministic: no auxiliary randomness.
    pub fn sign_digest(&self, digest: [u8; 32]) -> schnorr::Signature {
        let message = Message::from_digest(digest);
        self.secp.sign_schnorr_no_aux_rand(&message, &self.keypair)
    }
}

impl std::fmt::Debug for Keys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keys")
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}
