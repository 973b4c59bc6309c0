use crate::{CardCatalog, CardId, GameConfig};

/// 64-bit FNV-1a. Stable across builds and platforms, unlike `DefaultHasher`.
struct Fnv64(u64);

impl Fnv64 {
    fn new() -> Self {
        Self(0xcbf29ce484222325)
    }

    fn update(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 ^= u64::from(*byte);
            self.0 = self.0.wrapping_mul(0x100000001b3);
        }
    }

    fn finish(self) -> u64 {
        self.0
    }
}

/// Fingerprint of the rules a save was made under: the whole configuration
/// plus every card in identity order. Saves from another game, or from an
/// edited one, carry a different signature.
pub fn content_signature(config: &GameConfig, catalog: &CardCatalog) -> String {
    let mut hasher = Fnv64::new();
    hasher.update(b"wretched-save-signature-v1");
    // plain structs and vecs only, so the encoding is deterministic
    if let Ok(body) = serde_json::to_vec(config) {
        hasher.update(&(body.len() as u64).to_le_bytes());
        hasher.update(&body);
    }
    for id in CardId::all() {
        hasher.update(id.to_string().as_bytes());
        hasher.update(&[0]);
        match catalog.get(id).map(serde_json::to_vec) {
            Some(Ok(body)) => {
                hasher.update(&(body.len() as u64).to_le_bytes());
                hasher.update(&body);
            }
            _ => hasher.update(&[0xff]),
        }
    }
    format!("{:016x}", hasher.finish())
}
