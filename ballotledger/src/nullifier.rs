use crate::*;
use std::collections::BTreeSet;

hex_bytes32! {
    /// One-time anti-replay token for a voter in an election
    Nullifier
}

impl Nullifier {
    /// Nonce used by single-choice elections
    pub const SINGLE_CHOICE_NONCE: u64 = 0;

    /// Derive the nullifier as `H(wallet || election || nonce (u64 LE))`.
    ///
    /// Distinct nonces leave room for several questions per election.
    pub fn derive(wallet: &Wallet, election: &ElectionId, nonce: u64) -> Self {
        let hash = hash_parts(&[wallet.as_bytes(), election.as_bytes(), &nonce.to_le_bytes()]);
        Nullifier(hash.to_bytes())
    }

    /// Nullifier for a single-choice vote
    pub fn for_vote(wallet: &Wallet, election: &ElectionId) -> Self {
        Self::derive(wallet, election, Self::SINGLE_CHOICE_NONCE)
    }
}

/// Set of spent nullifiers for one election.
///
/// Entries are never removed. Only membership can be queried.
#[derive(Default, Clone, Debug)]
pub struct NullifierRegistry {
    used: BTreeSet<Nullifier>,
}

impl NullifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_used(&self, nullifier: &Nullifier) -> bool {
        self.used.contains(nullifier)
    }

    /// Fail with `AlreadyVoted` if the nullifier is spent
    pub fn check_unused(&self, nullifier: &Nullifier) -> Result<(), ValidationError> {
        if self.is_used(nullifier) {
            Err(ValidationError::AlreadyVoted)
        } else {
            Ok(())
        }
    }

    /// Spend a nullifier.
    ///
    /// Callers pair this with the matching tally increment; see
    /// [`ElectionContext::cast_vote`].
    pub fn mark_used(&mut self, nullifier: Nullifier) -> Result<(), ValidationError> {
        if !self.used.insert(nullifier) {
            return Err(ValidationError::AlreadyVoted);
        }
        Ok(())
    }

    /// Number of spent nullifiers
    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
