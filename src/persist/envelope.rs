use super::{EnvelopeError, Result};
use sha2::{Digest, Sha256};

pub const ENVELOPE_VERSION: u32 = 1;
const DIGEST_LEN: usize = 32;
const HEADER_LEN: usize = 4 + 4 + DIGEST_LEN;

/// Versioned framing for binary blobs: magic, little-endian version, SHA-256 of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    magic: [u8; 4],
}

impl Envelope {
    /// Standalone preset files.
    pub const PRESET: Envelope = Envelope { magic: *b"GFXP" };
    /// Per-map light presets.
    pub const MAP_LIGHTS: Envelope = Envelope { magic: *b"GFXL" };
    /// Whole-scene payload exported for copy/paste between scenes.
    pub const SCENE: Envelope = Envelope { magic: *b"GFXS" };

    pub fn magic(&self) -> [u8; 4] {
        self.magic
    }

    pub fn seal(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
        out.extend_from_slice(&self.magic);
        out.extend_from_slice(&ENVELOPE_VERSION.to_le_bytes());
        out.extend_from_slice(&Sha256::digest(payload));
        out.extend_from_slice(payload);
        out
    }

    /// Validate the header and digest and return the payload slice.
    pub fn open<'a>(&self, bytes: &'a [u8]) -> Result<&'a [u8]> {
        if bytes.len() < HEADER_LEN {
            return Err(EnvelopeError::Truncated { len: bytes.len() });
        }
        let (header, payload) = bytes.split_at(HEADER_LEN);

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&header[0..4]);
        if magic != self.magic {
            return Err(EnvelopeError::BadMagic {
                expected: self.magic,
                found: magic,
            });
        }

        let mut version = [0u8; 4];
        version.copy_from_slice(&header[4..8]);
        let version = u32::from_le_bytes(version);
        if version != ENVELOPE_VERSION {
            return Err(EnvelopeError::UnsupportedVersion(version));
        }

        if Sha256::digest(payload).as_slice() != &header[8..HEADER_LEN] {
            return Err(EnvelopeError::DigestMismatch);
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_returns_sealed_payload() {
        let sealed = Envelope::PRESET.seal(b"payload");
        assert_eq!(Envelope::PRESET.open(&sealed).unwrap(), b"payload");
    }

    #[test]
    fn test_open_rejects_wrong_magic() {
        let sealed = Envelope::PRESET.seal(b"payload");
        match Envelope::SCENE.open(&sealed) {
            Err(EnvelopeError::BadMagic { found, .. }) => assert_eq!(&found, b"GFXP"),
            other => panic!("Expected BadMagic, got {:?}", other),
        }
    }

    #[test]
    fn test_open_rejects_truncated_and_corrupt_bytes() {
        assert!(matches!(
            Envelope::PRESET.open(b"GFXP"),
            Err(EnvelopeError::Truncated { len: 4 })
        ));

        let mut sealed = Envelope::PRESET.seal(b"payload");
        let last = sealed.len() - 1;
        sealed[last] ^= 0xFF;
        assert!(matches!(Envelope::PRESET.open(&sealed), Err(EnvelopeError::DigestMismatch)));
    }

    #[test]
    fn test_open_rejects_future_version() {
        let mut sealed = Envelope::PRESET.seal(b"payload");
        sealed[4..8].copy_from_slice(&2u32.to_le_bytes());
        assert!(matches!(
            Envelope::PRESET.open(&sealed),
            Err(EnvelopeError::UnsupportedVersion(2))
        ));
    }
}
