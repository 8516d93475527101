use crate::*;
use log::{debug, warn};
use std::collections::BTreeSet;

/// One vote attempt inside a batch
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BatchEntry {
    pub wallet: Wallet,
    pub choice: u8,
    pub evidence: EligibilityEvidence,
}

impl BatchEntry {
    pub fn new(wallet: Wallet, choice: u8, evidence: EligibilityEvidence) -> Self {
        BatchEntry {
            wallet,
            choice,
            evidence,
        }
    }
}

impl ElectionContext {
    /// Cast several votes as one unit.
    ///
    /// Entries are checked in order against the election state plus the
    /// entries before them. The first failing entry rejects the whole batch
    /// and nothing is committed. Returns the spent nullifiers in entry order.
    pub fn cast_batch(
        &mut self,
        entries: &[BatchEntry],
        now: Timestamp,
        max_batch_size: usize,
    ) -> Result<Vec<Nullifier>, ValidationError> {
        if entries.is_empty() || entries.len() > max_batch_size {
            return Err(ValidationError::InvalidBatch(max_batch_size));
        }

        let mut staged = BTreeSet::new();
        let mut nullifiers = Vec::with_capacity(entries.len());
        let mut choices = Vec::with_capacity(entries.len());

        for (i, entry) in entries.iter().enumerate() {
            let checked = self
                .check_vote(&entry.wallet, entry.choice, &entry.evidence, now)
                .and_then(|nullifier| {
                    // Spent earlier in this same batch
                    if staged.insert(nullifier) {
                        Ok(nullifier)
                    } else {
                        Err(ValidationError::AlreadyVoted)
                    }
                });

            match checked {
                Ok(nullifier) => {
                    nullifiers.push(nullifier);
                    choices.push(entry.choice);
                }
                Err(e) => {
                    warn!(
                        "Rejected batch of {} votes for election {}: entry {} failed: {}",
                        entries.len(),
                        self.id(),
                        i,
                        e
                    );
                    return Err(e);
                }
            }
        }

        self.commit_votes(&choices, &nullifiers)?;
        self.refresh(now);

        debug!(
            "Counted batch of {} votes in election {}",
            entries.len(),
            self.id()
        );
        Ok(nullifiers)
    }
}
