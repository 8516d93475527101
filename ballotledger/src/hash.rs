use crate::*;
use digest::Digest;

/// SHA-256 of the concatenation of `parts`
pub fn hash_parts(parts: &[&[u8]]) -> Hash32 {
    let mut hasher = sha2::Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    Hash32(out)
}

/// Hash two sibling nodes into their parent: `H(left || right)`
pub fn hash_pair(left: &Hash32, right: &Hash32) -> Hash32 {
    hash_parts(&[left.as_bytes(), right.as_bytes()])
}
