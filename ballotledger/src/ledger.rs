use crate::*;
use std::collections::BTreeMap;

/// Hosts many independent elections.
///
/// The clock is read once at the start of each operation. Every operation
/// takes `&mut self`, which gives each election the single writer it needs.
pub struct Ledger<A: AttestationReader, C: Clock> {
    config: LedgerConfig,
    attestations: A,
    clock: C,
    elections: BTreeMap<ElectionId, ElectionContext>,

    /// Elections created per authority, used to derive election ids
    created: BTreeMap<Wallet, u64>,
    sinks: Vec<Box<dyn ResultSink>>,
}

impl<A: AttestationReader, C: Clock> Ledger<A, C> {
    /// Fails when `config` holds limits outside their allowed range
    pub fn new(config: LedgerConfig, attestations: A, clock: C) -> Result<Self, Error> {
        config.validate()?;
        Ok(Ledger {
            config,
            attestations,
            clock,
            elections: BTreeMap::new(),
            created: BTreeMap::new(),
            sinks: Vec::new(),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn attestations(&self) -> &A {
        &self.attestations
    }

    pub fn attestations_mut(&mut self) -> &mut A {
        &mut self.attestations
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Register a consumer of result summaries
    pub fn add_sink<S: ResultSink + 'static>(&mut self, sink: S) {
        self.sinks.push(Box::new(sink));
    }

    /// Create an election; the caller becomes its authority
    pub fn create_election(
        &mut self,
        authority: Wallet,
        params: ElectionParams,
    ) -> Result<ElectionId, ValidationError> {
        let now = self.clock.now();
        let seed = self.created.get(&authority).copied().unwrap_or(0);
        let id = ElectionId::for_authority(&authority, seed);

        let ctx = ElectionContext::create(id, authority, params, now, &self.config)?;

        self.created.insert(authority, seed + 1);
        self.elections.insert(id, ctx);
        Ok(id)
    }

    pub fn register_voter(
        &mut self,
        election: ElectionId,
        wallet: Wallet,
        attestation: AttestationRef,
    ) -> Result<Registration, ValidationError> {
        let now = self.clock.now();
        let ctx = self
            .elections
            .get_mut(&election)
            .ok_or(ValidationError::ElectionNotFound(election))?;
        ctx.register_voter(&self.attestations, wallet, attestation, now)
    }

    pub fn cast_vote(
        &mut self,
        election: ElectionId,
        wallet: Wallet,
        choice: u8,
        evidence: &EligibilityEvidence,
    ) -> Result<Nullifier, ValidationError> {
        let now = self.clock.now();
        self.context_mut(election)?
            .cast_vote(&wallet, choice, evidence, now)
    }

    pub fn cast_batch(
        &mut self,
        election: ElectionId,
        entries: &[BatchEntry],
    ) -> Result<Vec<Nullifier>, ValidationError> {
        let now = self.clock.now();
        let max_batch_size = self.config.max_batch_size;
        self.context_mut(election)?
            .cast_batch(entries, now, max_batch_size)
    }

    /// Close an election and hand its summary to every sink
    pub fn close_election(
        &mut self,
        election: ElectionId,
        caller: Wallet,
    ) -> Result<ResultSummary, ValidationError> {
        let now = self.clock.now();
        let summary = self.context_mut(election)?.close(&caller, now)?;
        deliver_summary(&mut self.sinks, &summary);
        Ok(summary)
    }

    pub fn cancel_election(
        &mut self,
        election: ElectionId,
        caller: Wallet,
    ) -> Result<(), ValidationError> {
        let now = self.clock.now();
        self.context_mut(election)?.cancel(&caller, now)
    }

    pub fn results(&self, election: ElectionId) -> Result<Results, ValidationError> {
        let now = self.clock.now();
        Ok(self.context(election)?.results(now))
    }

    pub fn membership_proof(
        &self,
        election: ElectionId,
        leaf_index: u32,
    ) -> Result<Option<MembershipProof>, ValidationError> {
        Ok(self.context(election)?.membership_proof(leaf_index))
    }

    pub fn election(&self, election: ElectionId) -> Result<&Election, ValidationError> {
        Ok(self.context(election)?.election())
    }

    pub fn context(&self, election: ElectionId) -> Result<&ElectionContext, ValidationError> {
        self.elections
            .get(&election)
            .ok_or(ValidationError::ElectionNotFound(election))
    }

    fn context_mut(&mut self, election: ElectionId) -> Result<&mut ElectionContext, ValidationError> {
        self.elections
            .get_mut(&election)
            .ok_or(ValidationError::ElectionNotFound(election))
    }
}
