use crate::*;
use log::{debug, info};
use std::collections::BTreeSet;
use std::fmt;

/// Most candidates any election can list; a choice is a single byte
pub const MAX_CHOICES: usize = 256;

/// Lifecycle state of an election
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ElectionStatus {
    Pending,
    Active,
    Ended,
    Cancelled,
}

impl fmt::Display for ElectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElectionStatus::Pending => "pending",
            ElectionStatus::Active => "active",
            ElectionStatus::Ended => "ended",
            ElectionStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// Everything the authority chooses when creating an election
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ElectionParams {
    pub candidates: Vec<String>,
    pub start: Timestamp,
    pub end: Timestamp,
    pub compression: CompressionMode,

    /// Maximum number of voters. Fixes the accumulator depth.
    pub capacity: u32,
}

impl ElectionParams {
    pub fn new(candidates: &[&str], start: Timestamp, end: Timestamp) -> Self {
        ElectionParams {
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
            start,
            end,
            compression: CompressionMode::Compressed,
            capacity: 1024,
        }
    }

    pub fn compression(mut self, compression: CompressionMode) -> Self {
        self.compression = compression;
        self
    }

    pub fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Check the parameters against the configured limits
    pub fn validate(&self, config: &LedgerConfig) -> Result<(), ValidationError> {
        let max_candidates = config.max_candidates.min(MAX_CHOICES);
        if self.candidates.is_empty() || self.candidates.len() > max_candidates {
            return Err(ValidationError::TooManyCandidates(max_candidates));
        }
        let mut seen = BTreeSet::new();
        for candidate in self.candidates.iter() {
            if candidate.is_empty() || candidate.len() > config.max_candidate_name_len {
                return Err(ValidationError::InvalidCandidateName(
                    config.max_candidate_name_len,
                ));
            }
            if !seen.insert(candidate.as_str()) {
                return Err(ValidationError::DuplicateCandidate(candidate.clone()));
            }
        }
        if self.start >= self.end {
            return Err(ValidationError::InvalidTimeRange);
        }
        if depth_for_capacity(self.capacity).is_none() {
            return Err(ValidationError::InvalidCapacity(MAX_CAPACITY));
        }
        Ok(())
    }
}

/// The public election record.
///
/// Serialized for publication only. State is never rebuilt from it.
#[derive(Serialize, Clone, Debug)]
pub struct Election {
    pub id: ElectionId,

    /// Wallet that created the election. Only it may close or cancel.
    pub authority: Wallet,

    /// Candidate labels in ballot order. A vote's choice indexes into this list.
    pub candidates: Vec<String>,

    pub start: Timestamp,
    pub end: Timestamp,
    pub compression: CompressionMode,
    pub capacity: u32,

    /// Current accumulator root. Legacy elections have none.
    pub accumulator_root: Option<Hash32>,

    /// Number of admitted voters
    pub accumulated_count: u32,

    /// Set when the authority closes the election
    pub closed_at: Option<Timestamp>,

    status: ElectionStatus,
    tally: TallyStore,
}

impl Election {
    /// Status as last persisted
    pub fn stored_status(&self) -> ElectionStatus {
        self.status
    }

    /// Status derived from the stored status and the current time.
    ///
    /// Reads never persist this. Operations persist it through
    /// [`ElectionContext::refresh`] once they have succeeded.
    pub fn effective_status(&self, now: Timestamp) -> ElectionStatus {
        match self.status {
            ElectionStatus::Cancelled => ElectionStatus::Cancelled,
            ElectionStatus::Ended => ElectionStatus::Ended,
            _ if self.closed_at.is_some() => ElectionStatus::Ended,
            _ if now >= self.end => ElectionStatus::Ended,
            _ if now >= self.start => ElectionStatus::Active,
            _ => ElectionStatus::Pending,
        }
    }

    /// Whether `now` falls inside `[start, end)`
    pub fn in_window(&self, now: Timestamp) -> bool {
        self.start <= now && now < self.end
    }

    /// Whether a vote cast at `now` would pass the lifecycle checks
    pub fn voting_permitted(&self, now: Timestamp) -> bool {
        self.check_voting_window(now).is_ok()
    }

    pub fn vote_counts(&self) -> &[u64] {
        self.tally.vote_counts()
    }

    pub fn total_votes(&self) -> u64 {
        self.tally.total_votes()
    }

    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }

    fn check_voting_window(&self, now: Timestamp) -> Result<(), ValidationError> {
        match self.effective_status(now) {
            ElectionStatus::Pending => Err(ValidationError::ElectionNotStarted),
            ElectionStatus::Ended => Err(ValidationError::ElectionEnded),
            ElectionStatus::Cancelled => Err(ValidationError::ElectionCancelled),
            ElectionStatus::Active if now < self.start => Err(ValidationError::ElectionNotStarted),
            ElectionStatus::Active if now >= self.end => Err(ValidationError::ElectionEnded),
            ElectionStatus::Active => Ok(()),
        }
    }
}

/// One election together with the registries scoped to it.
///
/// All operations on an election go through its context. The host must
/// serialize calls on the same context; distinct contexts share nothing.
#[derive(Clone, Debug)]
pub struct ElectionContext {
    election: Election,
    voters: VoterRegistry,
    nullifiers: NullifierRegistry,
}

impl ElectionContext {
    /// Create a new election owned by `authority`
    pub fn create(
        id: ElectionId,
        authority: Wallet,
        params: ElectionParams,
        now: Timestamp,
        config: &LedgerConfig,
    ) -> Result<Self, ValidationError> {
        params.validate(config)?;

        let voters = VoterRegistry::new(
            params.compression,
            params.capacity,
            config.root_history_size,
        )?;

        let status = if params.start <= now {
            ElectionStatus::Active
        } else {
            ElectionStatus::Pending
        };

        let election = Election {
            id,
            authority,
            tally: TallyStore::new(params.candidates.len()),
            candidates: params.candidates,
            start: params.start,
            end: params.end,
            compression: params.compression,
            capacity: params.capacity,
            accumulator_root: voters.root(),
            accumulated_count: 0,
            closed_at: None,
            status,
        };

        info!(
            "Created election {} with {} candidates, status {}",
            id,
            election.candidates.len(),
            status
        );

        Ok(ElectionContext {
            election,
            voters,
            nullifiers: NullifierRegistry::new(),
        })
    }

    pub fn id(&self) -> ElectionId {
        self.election.id
    }

    pub fn election(&self) -> &Election {
        &self.election
    }

    pub fn effective_status(&self, now: Timestamp) -> ElectionStatus {
        self.election.effective_status(now)
    }

    pub fn voting_permitted(&self, now: Timestamp) -> bool {
        self.election.voting_permitted(now)
    }

    /// Persist the time-derived status. Status only ever moves forward.
    pub fn refresh(&mut self, now: Timestamp) -> ElectionStatus {
        let status = self.election.effective_status(now);
        if status != self.election.status {
            debug!(
                "Election {} moved from {} to {}",
                self.election.id, self.election.status, status
            );
            self.election.status = status;
        }
        status
    }

    /// Admit `wallet` on the strength of an external attestation
    pub fn register_voter<R: AttestationReader>(
        &mut self,
        attestations: &R,
        wallet: Wallet,
        attestation: AttestationRef,
        now: Timestamp,
    ) -> Result<Registration, ValidationError> {
        match self.election.effective_status(now) {
            ElectionStatus::Pending | ElectionStatus::Active => {}
            ElectionStatus::Ended => return Err(ValidationError::ElectionEnded),
            ElectionStatus::Cancelled => return Err(ValidationError::ElectionCancelled),
        }

        attestations.validate_for(&attestation, &wallet, now)?;

        let admission = VoterAdmission {
            wallet,
            election: self.election.id,
            attestation,
            registered_at: now,
        };
        let registration = self.voters.admit(admission)?;

        self.election.accumulator_root = self.voters.root();
        self.election.accumulated_count = self.voters.len();
        self.refresh(now);

        debug!(
            "Admitted voter {} to election {} ({} of {})",
            wallet, self.election.id, self.election.accumulated_count, self.election.capacity
        );

        Ok(registration)
    }

    /// Run every precondition of a vote without touching any state.
    ///
    /// Checks run in a fixed order: lifecycle, choice, eligibility, replay.
    /// Returns the nullifier the vote would spend.
    pub fn check_vote(
        &self,
        wallet: &Wallet,
        choice: u8,
        evidence: &EligibilityEvidence,
        now: Timestamp,
    ) -> Result<Nullifier, ValidationError> {
        self.election.check_voting_window(now)?;
        self.election.tally.check_choice(choice)?;
        self.voters
            .verify_eligibility(&self.election.id, wallet, evidence)?;

        let nullifier = Nullifier::for_vote(wallet, &self.election.id);
        self.nullifiers.check_unused(&nullifier)?;
        Ok(nullifier)
    }

    /// Cast a single vote.
    ///
    /// On success the candidate counter, the total and the nullifier are all
    /// updated. On failure none of them are.
    pub fn cast_vote(
        &mut self,
        wallet: &Wallet,
        choice: u8,
        evidence: &EligibilityEvidence,
        now: Timestamp,
    ) -> Result<Nullifier, ValidationError> {
        let nullifier = self.check_vote(wallet, choice, evidence, now)?;
        self.commit_votes(&[choice], &[nullifier])?;
        self.refresh(now);

        debug!("Counted vote in election {}", self.election.id);
        Ok(nullifier)
    }

    /// End the election, freeze the tally and produce the result summary
    pub fn close(&mut self, caller: &Wallet, now: Timestamp) -> Result<ResultSummary, ValidationError> {
        if *caller != self.election.authority {
            return Err(ValidationError::Unauthorized);
        }
        if self.election.status == ElectionStatus::Cancelled {
            return Err(ValidationError::ElectionCancelled);
        }
        if self.election.closed_at.is_some() {
            return Err(ValidationError::AlreadyClosed);
        }

        let summary = ResultSummary::new(&self.election, now)?;

        self.election.status = ElectionStatus::Ended;
        self.election.closed_at = Some(now);
        self.election.tally.freeze();

        info!(
            "Closed election {}: choice {} won with {} of {} votes",
            self.election.id, summary.winning_choice, summary.winning_votes, summary.total_votes
        );
        Ok(summary)
    }

    /// Abort an election that has not started yet
    pub fn cancel(&mut self, caller: &Wallet, now: Timestamp) -> Result<(), ValidationError> {
        if *caller != self.election.authority {
            return Err(ValidationError::Unauthorized);
        }
        match self.election.effective_status(now) {
            ElectionStatus::Pending => {}
            ElectionStatus::Active => return Err(ValidationError::ElectionAlreadyStarted),
            ElectionStatus::Ended => return Err(ValidationError::AlreadyClosed),
            ElectionStatus::Cancelled => return Err(ValidationError::ElectionCancelled),
        }

        self.election.status = ElectionStatus::Cancelled;
        self.election.tally.freeze();

        info!("Cancelled election {}", self.election.id);
        Ok(())
    }

    /// Public view of the results as of `now`
    pub fn results(&self, now: Timestamp) -> Results {
        Results::new(&self.election, self.effective_status(now))
    }

    /// Fresh membership proof for an admitted leaf. Compressed elections only.
    pub fn membership_proof(&self, leaf_index: u32) -> Option<MembershipProof> {
        self.voters.proof(leaf_index)
    }

    /// Whether `wallet` has a vote counted in this election
    pub fn has_voted(&self, wallet: &Wallet) -> bool {
        self.nullifiers
            .is_used(&Nullifier::for_vote(wallet, &self.election.id))
    }

    pub fn is_registered(&self, wallet: &Wallet) -> bool {
        self.voters.is_registered(wallet)
    }

    /// Discrete admission record. Legacy elections only.
    pub fn admission_record(&self, wallet: &Wallet) -> Option<&VoterAdmission> {
        self.voters.record(wallet)
    }

    /// Apply already-checked votes. The tally update is all-or-nothing and the
    /// nullifiers were checked unused, so either everything lands or nothing does.
    pub(crate) fn commit_votes(
        &mut self,
        choices: &[u8],
        nullifiers: &[Nullifier],
    ) -> Result<(), ValidationError> {
        self.election.tally.record_many(choices)?;
        for nullifier in nullifiers {
            self.nullifiers.mark_used(*nullifier)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: Timestamp = 1_000;
    const END: Timestamp = 2_000;

    struct Fixture {
        ctx: ElectionContext,
        authority: Wallet,
        attestations: MemAttestations,
    }

    fn fixture(compression: CompressionMode, now: Timestamp) -> Fixture {
        let authority = Wallet([0xaa; 32]);
        let params = ElectionParams::new(&["Yes", "No"], START, END)
            .compression(compression)
            .capacity(4);
        let ctx = ElectionContext::create(
            ElectionId::for_authority(&authority, 0),
            authority,
            params,
            now,
            &LedgerConfig::default(),
        )
        .unwrap();

        Fixture {
            ctx,
            authority,
            attestations: MemAttestations::default(),
        }
    }

    fn register(fx: &mut Fixture, wallet: Wallet, now: Timestamp) -> EligibilityEvidence {
        let reference = fx
            .attestations
            .issue(wallet, AttestationKind::Humanity, END * 10);
        match fx
            .ctx
            .register_voter(&fx.attestations, wallet, reference, now)
            .unwrap()
        {
            Registration::Compressed {
                leaf_index,
                registered_at,
                ..
            } => EligibilityEvidence::MembershipProof {
                attestation: reference,
                registered_at,
                proof: fx.ctx.membership_proof(leaf_index).unwrap(),
            },
            Registration::Legacy(_) => EligibilityEvidence::DirectRecord,
        }
    }

    #[test]
    fn create_validation() {
        let config = LedgerConfig::default();
        let authority = Wallet([1; 32]);
        let create = |params: ElectionParams| {
            ElectionContext::create(ElectionId::new(), authority, params, 0, &config).map(|_| ())
        };

        let eleven: Vec<String> = (0..11).map(|n| format!("c{}", n)).collect();
        let eleven: Vec<&str> = eleven.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            create(ElectionParams::new(&eleven, 1, 2)),
            Err(ValidationError::TooManyCandidates(10))
        );
        assert_eq!(
            create(ElectionParams::new(&[], 1, 2)),
            Err(ValidationError::TooManyCandidates(10))
        );
        assert_eq!(
            create(ElectionParams::new(&["ok", ""], 1, 2)),
            Err(ValidationError::InvalidCandidateName(50))
        );
        let long = "x".repeat(51);
        assert_eq!(
            create(ElectionParams::new(&[long.as_str()], 1, 2)),
            Err(ValidationError::InvalidCandidateName(50))
        );
        assert_eq!(
            create(ElectionParams::new(&["a"], 2, 2)),
            Err(ValidationError::InvalidTimeRange)
        );
        assert_eq!(
            create(ElectionParams::new(&["a"], 1, 2).capacity(0)),
            Err(ValidationError::InvalidCapacity(MAX_CAPACITY))
        );
        assert_eq!(
            create(ElectionParams::new(&["a"], 1, 2).capacity(MAX_CAPACITY + 1)),
            Err(ValidationError::InvalidCapacity(MAX_CAPACITY))
        );

        assert_eq!(
            create(ElectionParams::new(&["Yes", "No", "Yes"], 1, 2)),
            Err(ValidationError::DuplicateCandidate("Yes".to_string()))
        );

        let fifty = "y".repeat(50);
        let ten: Vec<&str> = eleven[..10].to_vec();
        assert!(create(ElectionParams::new(&ten, 1, 2)).is_ok());
        assert!(create(ElectionParams::new(&[fifty.as_str()], 1, 2)).is_ok());
    }

    #[test]
    fn candidate_cap_is_one_byte() {
        let config = LedgerConfig {
            max_candidates: 300,
            ..LedgerConfig::default()
        };
        let names: Vec<String> = (0..MAX_CHOICES + 1).map(|n| format!("c{}", n)).collect();
        let mut names: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        let create = |names: &[&str]| {
            let params = ElectionParams::new(names, 1, 2);
            ElectionContext::create(ElectionId::new(), Wallet([1; 32]), params, 0, &config)
                .map(|_| ())
        };

        assert_eq!(
            create(&names),
            Err(ValidationError::TooManyCandidates(MAX_CHOICES))
        );
        names.pop();
        assert!(create(&names).is_ok());
    }

    #[test]
    fn initial_state() {
        let fx = fixture(CompressionMode::Compressed, START - 10);
        let election = fx.ctx.election();
        assert_eq!(election.stored_status(), ElectionStatus::Pending);
        assert_eq!(election.vote_counts(), &[0, 0]);
        assert_eq!(election.total_votes(), 0);
        assert_eq!(election.accumulated_count, 0);
        assert_eq!(election.accumulator_root, Some(empty_root(10)));

        let fx = fixture(CompressionMode::Legacy, START);
        assert_eq!(fx.ctx.election().stored_status(), ElectionStatus::Active);
        assert_eq!(fx.ctx.election().accumulator_root, None);
    }

    #[test]
    fn status_is_time_derived() {
        let mut fx = fixture(CompressionMode::Compressed, 0);
        assert_eq!(fx.ctx.effective_status(START - 1), ElectionStatus::Pending);
        assert_eq!(fx.ctx.effective_status(START), ElectionStatus::Active);
        assert_eq!(fx.ctx.effective_status(END - 1), ElectionStatus::Active);
        assert_eq!(fx.ctx.effective_status(END), ElectionStatus::Ended);

        // Reads do not persist
        assert_eq!(fx.ctx.election().stored_status(), ElectionStatus::Pending);
        assert_eq!(fx.ctx.refresh(START + 1), ElectionStatus::Active);
        assert_eq!(fx.ctx.election().stored_status(), ElectionStatus::Active);

        assert!(!fx.ctx.voting_permitted(START - 1));
        assert!(fx.ctx.voting_permitted(START));
        assert!(!fx.ctx.voting_permitted(END));
    }

    #[test]
    fn vote_window_boundaries() {
        let mut fx = fixture(CompressionMode::Compressed, 0);
        let voter = Wallet([1; 32]);
        let evidence = register(&mut fx, voter, START - 5);

        assert_eq!(
            fx.ctx.cast_vote(&voter, 0, &evidence, START - 1),
            Err(ValidationError::ElectionNotStarted)
        );
        assert_eq!(
            fx.ctx.cast_vote(&voter, 0, &evidence, END),
            Err(ValidationError::ElectionEnded)
        );
        fx.ctx.cast_vote(&voter, 0, &evidence, START).unwrap();
        assert_eq!(fx.ctx.election().vote_counts(), &[1, 0]);
    }

    #[test]
    fn rejected_calls_leave_status_alone() {
        let mut fx = fixture(CompressionMode::Compressed, 0);
        let voter = Wallet([1; 32]);
        let late = Wallet([2; 32]);
        let evidence = register(&mut fx, voter, START - 5);
        let late_ref = fx
            .attestations
            .issue(late, AttestationKind::Humanity, END * 10);

        assert_eq!(
            fx.ctx.register_voter(&fx.attestations, late, late_ref, END),
            Err(ValidationError::ElectionEnded)
        );
        assert_eq!(
            fx.ctx.cast_vote(&voter, 0, &evidence, END + 1),
            Err(ValidationError::ElectionEnded)
        );
        assert_eq!(fx.ctx.election().stored_status(), ElectionStatus::Pending);

        // A host clock that went backwards still sees an open election
        fx.ctx.cast_vote(&voter, 1, &evidence, START + 1).unwrap();
        assert_eq!(fx.ctx.election().stored_status(), ElectionStatus::Active);
        assert_eq!(fx.ctx.election().vote_counts(), &[0, 1]);
    }

    #[test]
    fn vote_check_order() {
        let mut fx = fixture(CompressionMode::Compressed, START);
        let voter = Wallet([1; 32]);
        let stranger = Wallet([2; 32]);
        let evidence = register(&mut fx, voter, START);

        // Choice is checked before eligibility
        assert_eq!(
            fx.ctx.cast_vote(&stranger, 7, &evidence, START),
            Err(ValidationError::InvalidChoice(7))
        );
        assert_eq!(
            fx.ctx.cast_vote(&stranger, 1, &evidence, START),
            Err(ValidationError::InvalidMerkleProof)
        );

        let nullifier = fx.ctx.cast_vote(&voter, 1, &evidence, START).unwrap();
        assert_eq!(nullifier, Nullifier::for_vote(&voter, &fx.ctx.id()));
        assert!(fx.ctx.has_voted(&voter));
        assert!(!fx.ctx.has_voted(&stranger));

        assert_eq!(
            fx.ctx.cast_vote(&voter, 0, &evidence, START + 1),
            Err(ValidationError::AlreadyVoted)
        );
        assert_eq!(fx.ctx.election().vote_counts(), &[0, 1]);
        assert_eq!(fx.ctx.election().total_votes(), 1);
    }

    #[test]
    fn legacy_votes() {
        let mut fx = fixture(CompressionMode::Legacy, START);
        let voter = Wallet([1; 32]);
        let evidence = register(&mut fx, voter, START);
        assert_eq!(evidence, EligibilityEvidence::DirectRecord);
        assert_eq!(
            fx.ctx.admission_record(&voter).unwrap().registered_at,
            START
        );

        assert_eq!(
            fx.ctx.cast_vote(&Wallet([2; 32]), 0, &evidence, START),
            Err(ValidationError::NotRegistered)
        );
        fx.ctx.cast_vote(&voter, 0, &evidence, START).unwrap();
        assert_eq!(fx.ctx.election().total_votes(), 1);
    }

    #[test]
    fn registration_updates_root_and_count() {
        let mut fx = fixture(CompressionMode::Compressed, 0);
        let before = fx.ctx.election().accumulator_root;
        register(&mut fx, Wallet([1; 32]), 10);
        assert_ne!(fx.ctx.election().accumulator_root, before);
        assert_eq!(fx.ctx.election().accumulated_count, 1);
        assert!(fx.ctx.is_registered(&Wallet([1; 32])));
    }

    #[test]
    fn registration_checks() {
        let mut fx = fixture(CompressionMode::Compressed, 0);
        let alice = Wallet([1; 32]);
        let bob = Wallet([2; 32]);
        let alice_ref = fx.attestations.issue(alice, AttestationKind::Kyc, 500);

        assert_eq!(
            fx.ctx.register_voter(&fx.attestations, bob, alice_ref, 10),
            Err(ValidationError::AttestationMismatch)
        );
        assert_eq!(
            fx.ctx.register_voter(&fx.attestations, alice, alice_ref, 500),
            Err(ValidationError::ExpiredAttestation)
        );
        fx.ctx
            .register_voter(&fx.attestations, alice, alice_ref, 10)
            .unwrap();
        assert_eq!(
            fx.ctx.register_voter(&fx.attestations, alice, alice_ref, 11),
            Err(ValidationError::DuplicateRegistration)
        );
        assert_eq!(fx.ctx.election().accumulated_count, 1);

        let bob_ref = fx.attestations.issue(bob, AttestationKind::Kyc, END * 10);
        assert_eq!(
            fx.ctx.register_voter(&fx.attestations, bob, bob_ref, END),
            Err(ValidationError::ElectionEnded)
        );
    }

    #[test]
    fn close_rules() {
        let mut fx = fixture(CompressionMode::Compressed, START);
        let voter = Wallet([1; 32]);
        let evidence = register(&mut fx, voter, START);

        assert_eq!(
            fx.ctx.close(&voter, START + 1),
            Err(ValidationError::Unauthorized)
        );
        let authority = fx.authority;
        let summary = fx.ctx.close(&authority, START + 1).unwrap();
        assert_eq!(summary.total_votes, 0);
        assert!(!summary.passed_threshold);
        assert_eq!(fx.ctx.election().closed_at, Some(START + 1));
        assert_eq!(fx.ctx.effective_status(START + 2), ElectionStatus::Ended);

        assert_eq!(
            fx.ctx.cast_vote(&voter, 0, &evidence, START + 2),
            Err(ValidationError::ElectionEnded)
        );
        assert_eq!(
            fx.ctx.close(&authority, START + 3),
            Err(ValidationError::AlreadyClosed)
        );
    }

    #[test]
    fn lapsed_election_closes_once() {
        let mut fx = fixture(CompressionMode::Compressed, START);
        let authority = fx.authority;
        fx.ctx.close(&authority, END + 100).unwrap();
        assert_eq!(
            fx.ctx.close(&authority, END + 200),
            Err(ValidationError::AlreadyClosed)
        );
    }

    #[test]
    fn cancel_rules() {
        let mut fx = fixture(CompressionMode::Compressed, 0);
        let authority = fx.authority;
        assert_eq!(
            fx.ctx.cancel(&Wallet([1; 32]), 10),
            Err(ValidationError::Unauthorized)
        );
        fx.ctx.cancel(&authority, 10).unwrap();
        assert_eq!(fx.ctx.effective_status(START), ElectionStatus::Cancelled);
        assert_eq!(
            fx.ctx.cancel(&authority, 11),
            Err(ValidationError::ElectionCancelled)
        );
        assert_eq!(
            fx.ctx.close(&authority, 12),
            Err(ValidationError::ElectionCancelled)
        );

        let reference = fx
            .attestations
            .issue(Wallet([1; 32]), AttestationKind::Humanity, END);
        assert_eq!(
            fx.ctx
                .register_voter(&fx.attestations, Wallet([1; 32]), reference, 20),
            Err(ValidationError::ElectionCancelled)
        );

        let mut fx = fixture(CompressionMode::Compressed, 0);
        let authority = fx.authority;
        assert_eq!(
            fx.ctx.cancel(&authority, START),
            Err(ValidationError::ElectionAlreadyStarted)
        );
        assert_eq!(
            fx.ctx.cancel(&authority, END),
            Err(ValidationError::AlreadyClosed)
        );
    }

    #[test]
    fn results_view() {
        let mut fx = fixture(CompressionMode::Compressed, START);
        let voter = Wallet([1; 32]);
        let evidence = register(&mut fx, voter, START);
        fx.ctx.cast_vote(&voter, 1, &evidence, START).unwrap();

        let results = fx.ctx.results(START + 1);
        assert_eq!(results.status, ElectionStatus::Active);
        assert_eq!(results.total_votes, 1);
        assert_eq!(results.count("Yes"), Some(0));
        assert_eq!(results.count("No"), Some(1));
        assert_eq!(results.count("Maybe"), None);
    }

    #[test]
    fn status_display() {
        assert_eq!(ElectionStatus::Cancelled.to_string(), "cancelled");
        assert_eq!(
            serde_json::to_string(&ElectionStatus::Active).unwrap(),
            "\"active\""
        );
    }
}
