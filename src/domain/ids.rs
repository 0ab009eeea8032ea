// src/domain/ids.rs
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

pub const LEAD_ID_BYTES: usize = 12;

/// Fresh opaque lead id from the OS RNG.
pub fn new_lead_id() -> String {
    let mut rng = OsRng;
    generate_id(&mut rng, LEAD_ID_BYTES)
}

/// URL-safe base64 (no padding) of `nbytes` random bytes.
/// 12 bytes -> 16 chars, safe in paths and form values.
pub fn generate_id<R: RngCore>(rng: &mut R, nbytes: usize) -> String {
    let mut buf = vec![0u8; nbytes];
    rng.fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&buf)
}
