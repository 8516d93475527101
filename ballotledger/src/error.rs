use thiserror::Error;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("ballotledger: invalid identifier - invalid hexidecimal")]
    BadHex,

    #[error("ballotledger: invalid identifier - expected 32 bytes, found {0}")]
    BadLength(usize),

    #[error("ballotledger: CBOR error: {0}")]
    Cbor(#[from] serde_cbor::Error),

    #[error("ballotledger: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ballotledger: invalid configuration value for {0}: {1}")]
    Config(&'static str, String),
}

/// Broad classes of ledger failures
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed caller input, rejected before any state is touched
    Validation,
    /// Wrong caller identity
    Authorization,
    /// Operation outside its legal time window or lifecycle state
    Temporal,
    /// Voter admission or membership failure
    Eligibility,
    /// Nullifier already spent
    Replay,
    /// Invariant breach that should be unreachable
    Fatal,
}

/// Ledger operation errors
///
/// Every operation checks all of its preconditions before mutating anything,
/// so receiving one of these means no state changed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ballotledger validation: must have between 1 and {0} candidates")]
    TooManyCandidates(usize),

    #[error("ballotledger validation: candidate name must be between 1 and {0} bytes")]
    InvalidCandidateName(usize),

    #[error("ballotledger validation: candidate {0:?} is listed more than once")]
    DuplicateCandidate(String),

    #[error("ballotledger validation: invalid time range (end must be after start)")]
    InvalidTimeRange,

    #[error("ballotledger validation: voter capacity must be between 1 and {0}")]
    InvalidCapacity(u32),

    #[error("ballotledger validation: invalid candidate choice {0}")]
    InvalidChoice(u8),

    #[error("ballotledger validation: batch must contain between 1 and {0} votes")]
    InvalidBatch(usize),

    #[error("ballotledger validation: only the election authority can perform this action")]
    Unauthorized,

    #[error("ballotledger validation: election has not started yet")]
    ElectionNotStarted,

    #[error("ballotledger validation: election has ended")]
    ElectionEnded,

    #[error("ballotledger validation: election has already been closed")]
    AlreadyClosed,

    #[error("ballotledger validation: election has been cancelled")]
    ElectionCancelled,

    #[error("ballotledger validation: election has already started")]
    ElectionAlreadyStarted,

    #[error("ballotledger validation: election {0} not found")]
    ElectionNotFound(crate::ElectionId),

    #[error("ballotledger validation: invalid attestation")]
    InvalidAttestation,

    #[error("ballotledger validation: attestation has expired")]
    ExpiredAttestation,

    #[error("ballotledger validation: attestation does not match voter")]
    AttestationMismatch,

    #[error("ballotledger validation: voter is already registered for this election")]
    DuplicateRegistration,

    #[error("ballotledger validation: voter registry is full ({0} voters)")]
    CapacityExceeded(u32),

    #[error("ballotledger validation: invalid merkle proof")]
    InvalidMerkleProof,

    #[error("ballotledger validation: voter is not registered for this election")]
    NotRegistered,

    #[error("ballotledger validation: voter has already voted in this election")]
    AlreadyVoted,

    #[error("ballotledger: arithmetic overflow")]
    ArithmeticOverflow,
}

impl ValidationError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        use ValidationError::*;

        match self {
            TooManyCandidates(_) | InvalidCandidateName(_) | DuplicateCandidate(_) | InvalidTimeRange
            | InvalidCapacity(_) | InvalidChoice(_) | InvalidBatch(_) | ElectionNotFound(_) => {
                ErrorKind::Validation
            }
            Unauthorized => ErrorKind::Authorization,
            ElectionNotStarted | ElectionEnded | AlreadyClosed | ElectionCancelled
            | ElectionAlreadyStarted => ErrorKind::Temporal,
            InvalidAttestation | ExpiredAttestation | AttestationMismatch
            | DuplicateRegistration | CapacityExceeded(_) | InvalidMerkleProof | NotRegistered => {
                ErrorKind::Eligibility
            }
            AlreadyVoted => ErrorKind::Replay,
            ArithmeticOverflow => ErrorKind::Fatal,
        }
    }
}
