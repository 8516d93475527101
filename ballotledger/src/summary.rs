use crate::*;
use log::warn;
use std::convert::TryFrom;

/// Outbound message emitted once an election is closed.
///
/// This is what external hook executors and private-tally layers consume.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ResultSummary {
    pub election: ElectionId,
    pub winning_choice: u8,
    pub winning_votes: u64,
    pub total_votes: u64,

    /// Simple majority: the winner holds more than half of all votes
    pub passed_threshold: bool,
    pub timestamp: Timestamp,
}

impl ResultSummary {
    /// Summarize an election's tally.
    ///
    /// The winner is the highest count; on a tie the later candidate wins.
    pub fn new(election: &Election, timestamp: Timestamp) -> Result<Self, ValidationError> {
        let (winning_index, winning_votes) = election
            .vote_counts()
            .iter()
            .enumerate()
            .max_by_key(|(_, count)| **count)
            .map(|(choice, count)| (choice, *count))
            .unwrap_or((0, 0));
        let winning_choice =
            u8::try_from(winning_index).map_err(|_| ValidationError::ArithmeticOverflow)?;
        let total_votes = election.total_votes();

        Ok(ResultSummary {
            election: election.id,
            winning_choice,
            winning_votes,
            total_votes,
            passed_threshold: total_votes > 0 && winning_votes > total_votes / 2,
            timestamp,
        })
    }

    /// Pack into CBOR bytes
    pub fn as_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_cbor::to_vec(self)?)
    }

    /// Unpack from CBOR, or from JSON if the bytes start with `{`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.first() == Some(&b'{') {
            Ok(serde_json::from_slice(bytes)?)
        } else {
            Ok(serde_cbor::from_slice(bytes)?)
        }
    }
}

/// Error returned by a result sink
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Receives result summaries after an election closes.
///
/// Delivery is fire-and-forget: the ledger never retries a sink and a failing
/// sink never undoes the close.
pub trait ResultSink {
    fn deliver(&mut self, summary: &ResultSummary) -> Result<(), SinkError>;
}

/// Collects summaries in memory
impl ResultSink for Vec<ResultSummary> {
    fn deliver(&mut self, summary: &ResultSummary) -> Result<(), SinkError> {
        self.push(summary.clone());
        Ok(())
    }
}

/// Hand a summary to every sink, logging failures
pub fn deliver_summary(sinks: &mut [Box<dyn ResultSink>], summary: &ResultSummary) {
    for (i, sink) in sinks.iter_mut().enumerate() {
        if let Err(e) = sink.deliver(summary) {
            warn!(
                "Result sink {} failed for election {}: {}",
                i, summary.election, e
            );
        }
    }
}
