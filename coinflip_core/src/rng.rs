use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::Rng;
use sha2::Sha256;

use crate::face::Face;

pub type HmacSha256 = Hmac<Sha256>;

/// Supplies the outcome of each settle. Every draw is independent and
/// uniform over the two faces.
pub trait FaceSource {
    fn next_face(&mut self) -> Face;
}

/// Production source backed by the operating system's random generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFaceSource;

impl FaceSource for OsFaceSource {
    fn next_face(&mut self) -> Face {
        Face::from_heads(OsRng.gen::<bool>())
    }
}

pub fn derive_hash_hex(input: &[u8]) -> String {
    use sha2::Digest;
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

/// Maps the first four bytes of `bytes` (big endian) into [0, 1).
pub fn derive_unit_float(bytes: &[u8; 32]) -> f64 {
    let v = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    (v as f64) / (u32::MAX as f64 + 1.0)
}

// Verifiable source: server_seed (secret) + client_seed + nonce -> HMAC-SHA256 -> [0,1) -> face.
// The nonce advances after every draw so a session replays exactly.
#[derive(Debug, Clone)]
pub struct SeededFaceSource {
    pub server_seed: String, // secret
    pub client_seed: String,
    pub nonce: u64,
}

impl SeededFaceSource {
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
        }
    }

    pub fn server_seed_hash_hex(&self) -> String {
        derive_hash_hex(self.server_seed.as_bytes())
    }

    pub fn hmac_bytes(&self, nonce: u64) -> [u8; 32] {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.server_seed.as_bytes())
            .expect("HMAC takes keys of any length");
        let msg = format!("{}:{}", self.client_seed, nonce);
        mac.update(msg.as_bytes());
        let res = mac.finalize().into_bytes();
        let mut out = [0u8; 32];
        out.copy_from_slice(&res);
        out
    }

    /// The face this source yields for `nonce`, without advancing.
    pub fn face_at(&self, nonce: u64) -> Face {
        Face::from_heads(derive_unit_float(&self.hmac_bytes(nonce)) < 0.5)
    }
}

impl FaceSource for SeededFaceSource {
    fn next_face(&mut self) -> Face {
        let face = self.face_at(self.nonce);
        self.nonce = self.nonce.wrapping_add(1);
        face
    }
}

/// Recomputes the face a seeded session produced for `nonce`.
pub fn verify_flip(server_seed: &str, client_seed: &str, nonce: u64, claimed: Face) -> bool {
    SeededFaceSource::new(server_seed, client_seed, nonce).face_at(nonce) == claimed
}

/// Cycles through a fixed list of faces. Meant for deterministic tests.
#[derive(Debug, Clone)]
pub struct FixedFaceSource {
    faces: Vec<Face>,
    cursor: usize,
}

impl FixedFaceSource {
    pub fn new(faces: impl Into<Vec<Face>>) -> Self {
        let faces = faces.into();
        assert!(!faces.is_empty(), "fixed face source needs at least one face");
        Self { faces, cursor: 0 }
    }

    pub fn always(face: Face) -> Self {
        Self::new(vec![face])
    }
}

impl FaceSource for FixedFaceSource {
    fn next_face(&mut self) -> Face {
        let face = self.faces[self.cursor % self.faces.len()];
        self.cursor += 1;
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let rng1 = SeededFaceSource::new("server", "client", 1);
        let rng2 = SeededFaceSource::new("server", "client", 1);
        assert_eq!(rng1.server_seed_hash_hex(), rng2.server_seed_hash_hex());
        assert_eq!(rng1.hmac_bytes(1).to_vec(), rng2.hmac_bytes(1).to_vec());
        assert_eq!(rng1.face_at(7), rng2.face_at(7));
    }

    #[test]
    fn seeded_source_advances_nonce() {
        let mut rng = SeededFaceSource::new("server", "client", 10);
        let expected: Vec<Face> = (10..15).map(|n| rng.face_at(n)).collect();
        let drawn: Vec<Face> = (0..5).map(|_| rng.next_face()).collect();
        assert_eq!(drawn, expected);
        assert_eq!(rng.nonce, 15);
    }

    #[test]
    fn verify_accepts_only_the_drawn_face() {
        let rng = SeededFaceSource::new("s", "c", 3);
        let face = rng.face_at(3);
        assert!(verify_flip("s", "c", 3, face));
        assert!(!verify_flip("s", "c", 3, face.flipped()));
    }

    #[test]
    fn unit_float_stays_below_one() {
        assert_eq!(derive_unit_float(&[0u8; 32]), 0.0);
        assert!(derive_unit_float(&[0xff; 32]) < 1.0);
    }

    #[test]
    fn fixed_source_cycles() {
        let mut src = FixedFaceSource::new(vec![Face::Tails, Face::Heads]);
        let drawn: Vec<Face> = (0..3).map(|_| src.next_face()).collect();
        assert_eq!(drawn, vec![Face::Tails, Face::Heads, Face::Tails]);
    }
}
