use crate::*;
use digest::Digest;
use ed25519_dalek::PublicKey;
use rand::Rng;

hex_bytes32! {
    /// Election identifier
    ///
    /// Every per-election structure (accumulator, nullifier registry, tally)
    /// is scoped to exactly one of these.
    ElectionId
}

hex_bytes32! {
    /// Wallet identity of a voter or an election authority
    Wallet
}

hex_bytes32! {
    /// Reference to an externally issued attestation
    AttestationRef
}

hex_bytes32! {
    /// A SHA-256 output: accumulator leaves, interior nodes and roots
    Hash32
}

impl ElectionId {
    /// Create a new random election identifier
    pub fn new() -> Self {
        let mut csprng = rand::rngs::OsRng {};
        let bytes: [u8; 32] = csprng.gen();
        ElectionId(bytes)
    }

    /// Derive a deterministic identifier from the authority and a seed.
    ///
    /// The same authority can run several elections by varying the seed.
    pub fn for_authority(authority: &Wallet, seed: u64) -> Self {
        let mut hasher = sha2::Sha256::new();
        hasher.update(b"election");
        hasher.update(authority.as_bytes());
        hasher.update(&seed.to_le_bytes());
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        ElectionId(out)
    }
}

impl From<PublicKey> for Wallet {
    fn from(public: PublicKey) -> Self {
        Wallet(public.to_bytes())
    }
}

impl From<&PublicKey> for Wallet {
    fn from(public: &PublicKey) -> Self {
        Wallet(public.to_bytes())
    }
}
