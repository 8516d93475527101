use crate::*;
use indexmap::IndexMap;

/// Per-candidate vote counters for one election
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TallyStore {
    vote_counts: Vec<u64>,
    total_votes: u64,
    frozen: bool,
}

impl TallyStore {
    pub fn new(num_candidates: usize) -> Self {
        TallyStore {
            vote_counts: vec![0; num_candidates],
            total_votes: 0,
            frozen: false,
        }
    }

    pub fn vote_counts(&self) -> &[u64] {
        &self.vote_counts
    }

    pub fn total_votes(&self) -> u64 {
        self.total_votes
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Stop accepting votes. Irreversible.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Check that a vote for `choice` could be recorded
    pub fn check_choice(&self, choice: u8) -> Result<(), ValidationError> {
        if self.frozen {
            return Err(ValidationError::ElectionEnded);
        }
        if choice as usize >= self.vote_counts.len() {
            return Err(ValidationError::InvalidChoice(choice));
        }
        Ok(())
    }

    /// Record one vote
    pub fn record(&mut self, choice: u8) -> Result<(), ValidationError> {
        self.record_many(&[choice])
    }

    /// Record several votes at once. Either every vote is counted or none is.
    pub fn record_many(&mut self, choices: &[u8]) -> Result<(), ValidationError> {
        let mut vote_counts = self.vote_counts.clone();
        let mut total_votes = self.total_votes;

        for &choice in choices {
            self.check_choice(choice)?;
            let slot = &mut vote_counts[choice as usize];
            *slot = slot
                .checked_add(1)
                .ok_or(ValidationError::ArithmeticOverflow)?;
            total_votes = total_votes
                .checked_add(1)
                .ok_or(ValidationError::ArithmeticOverflow)?;
        }

        self.vote_counts = vote_counts;
        self.total_votes = total_votes;
        Ok(())
    }
}

/// Public view of an election's results
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Results {
    pub election: ElectionId,
    pub status: ElectionStatus,
    pub total_votes: u64,
    /// Candidate label to vote count, in ballot order
    pub totals: IndexMap<String, u64>,
}

impl Results {
    pub fn new(election: &Election, status: ElectionStatus) -> Self {
        let mut totals = IndexMap::new();
        for (candidate, count) in election.candidates.iter().zip(election.vote_counts()) {
            totals.insert(candidate.clone(), *count);
        }

        Results {
            election: election.id,
            status,
            total_votes: election.total_votes(),
            totals,
        }
    }

    /// Count for a candidate label
    pub fn count(&self, candidate: &str) -> Option<u64> {
        self.totals.get(candidate).copied()
    }
}
