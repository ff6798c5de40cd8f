//! Prefixed random identifiers.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

/// Generate an identifier like `row-3q2YhGrX…`: a short prefix naming the
/// entity kind plus 128 bits of url-safe entropy.
pub fn new_id(prefix: &str) -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let random_bytes: Vec<u8> = (0..16).map(|_| rng.random()).collect();
    format!("{}-{}", prefix, URL_SAFE_NO_PAD.encode(random_bytes))
}
