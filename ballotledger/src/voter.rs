use crate::*;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// How admitted voters are stored
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompressionMode {
    /// Voters exist only as leaves folded into the accumulator
    Compressed,
    /// Every voter gets a discrete, directly queryable record
    Legacy,
}

/// One voter's admission to one election. Immutable once created.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VoterAdmission {
    pub wallet: Wallet,
    pub election: ElectionId,
    pub attestation: AttestationRef,
    pub registered_at: Timestamp,
}

impl VoterAdmission {
    /// Encoded size of the leaf preimage
    pub const SIZE: usize = 104;

    /// Fixed byte layout hashed into the accumulator leaf:
    /// `wallet || election || attestation || registered_at (i64 LE)`.
    ///
    /// Clients regenerate leaves from this exact layout, so it must never change.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..32].copy_from_slice(self.wallet.as_bytes());
        bytes[32..64].copy_from_slice(self.election.as_bytes());
        bytes[64..96].copy_from_slice(self.attestation.as_bytes());
        bytes[96..104].copy_from_slice(&self.registered_at.to_le_bytes());
        bytes
    }

    /// Accumulator leaf for this admission
    pub fn leaf(&self) -> Hash32 {
        hash_parts(&[&self.to_bytes()])
    }
}

/// Outcome of a successful registration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Registration {
    Compressed {
        leaf_index: u32,
        root: Hash32,
        registered_at: Timestamp,
    },
    Legacy(VoterAdmission),
}

/// What a voter presents to prove they were admitted
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EligibilityEvidence {
    /// Compressed mode: the admission inputs plus a path to the accumulator root.
    ///
    /// The leaf is rebuilt from the voting wallet and these inputs, so a proof
    /// can only ever vouch for the wallet it was issued to.
    MembershipProof {
        attestation: AttestationRef,
        registered_at: Timestamp,
        proof: MembershipProof,
    },
    /// Legacy mode: look up the discrete record of the voting wallet
    DirectRecord,
}

/// Per-election store of admitted voters
#[derive(Clone, Debug)]
pub enum VoterRegistry {
    Compressed {
        accumulator: Accumulator,
        /// Wallets already folded into the accumulator. The tree itself cannot
        /// reject a second leaf for the same wallet.
        admitted: BTreeSet<Wallet>,
    },
    Legacy {
        capacity: u32,
        records: BTreeMap<Wallet, VoterAdmission>,
    },
}

impl VoterRegistry {
    pub fn new(
        mode: CompressionMode,
        capacity: u32,
        root_history_size: usize,
    ) -> Result<Self, ValidationError> {
        Ok(match mode {
            CompressionMode::Compressed => VoterRegistry::Compressed {
                accumulator: Accumulator::new(capacity, root_history_size)?,
                admitted: BTreeSet::new(),
            },
            CompressionMode::Legacy => {
                depth_for_capacity(capacity).ok_or(ValidationError::InvalidCapacity(MAX_CAPACITY))?;
                VoterRegistry::Legacy {
                    capacity,
                    records: BTreeMap::new(),
                }
            }
        })
    }

    pub fn mode(&self) -> CompressionMode {
        match self {
            VoterRegistry::Compressed { .. } => CompressionMode::Compressed,
            VoterRegistry::Legacy { .. } => CompressionMode::Legacy,
        }
    }

    /// Number of admitted voters
    pub fn len(&self) -> u32 {
        match self {
            VoterRegistry::Compressed { accumulator, .. } => accumulator.len(),
            VoterRegistry::Legacy { records, .. } => records.len() as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_registered(&self, wallet: &Wallet) -> bool {
        match self {
            VoterRegistry::Compressed { admitted, .. } => admitted.contains(wallet),
            VoterRegistry::Legacy { records, .. } => records.contains_key(wallet),
        }
    }

    /// Check that `admission` could be admitted, without admitting it
    pub fn check_admit(&self, admission: &VoterAdmission) -> Result<(), ValidationError> {
        if self.is_registered(&admission.wallet) {
            return Err(ValidationError::DuplicateRegistration);
        }
        match self {
            VoterRegistry::Compressed { accumulator, .. } if accumulator.is_full() => {
                Err(ValidationError::CapacityExceeded(accumulator.capacity()))
            }
            VoterRegistry::Legacy { capacity, records } if records.len() as u32 >= *capacity => {
                Err(ValidationError::CapacityExceeded(*capacity))
            }
            _ => Ok(()),
        }
    }

    /// Admit a voter
    pub fn admit(&mut self, admission: VoterAdmission) -> Result<Registration, ValidationError> {
        self.check_admit(&admission)?;

        match self {
            VoterRegistry::Compressed {
                accumulator,
                admitted,
            } => {
                let (leaf_index, root) = accumulator.append(admission.leaf())?;
                admitted.insert(admission.wallet);
                Ok(Registration::Compressed {
                    leaf_index,
                    root,
                    registered_at: admission.registered_at,
                })
            }
            VoterRegistry::Legacy { records, .. } => {
                records.insert(admission.wallet, admission.clone());
                Ok(Registration::Legacy(admission))
            }
        }
    }

    /// Check that `wallet` presents valid evidence of admission to `election`
    pub fn verify_eligibility(
        &self,
        election: &ElectionId,
        wallet: &Wallet,
        evidence: &EligibilityEvidence,
    ) -> Result<(), ValidationError> {
        match self {
            VoterRegistry::Compressed { accumulator, .. } => match evidence {
                EligibilityEvidence::MembershipProof {
                    attestation,
                    registered_at,
                    proof,
                } => {
                    let leaf = VoterAdmission {
                        wallet: *wallet,
                        election: *election,
                        attestation: *attestation,
                        registered_at: *registered_at,
                    }
                    .leaf();
                    if accumulator.verify(&leaf, proof) {
                        Ok(())
                    } else {
                        Err(ValidationError::InvalidMerkleProof)
                    }
                }
                EligibilityEvidence::DirectRecord => Err(ValidationError::InvalidMerkleProof),
            },
            VoterRegistry::Legacy { records, .. } => match evidence {
                EligibilityEvidence::DirectRecord => match records.get(wallet) {
                    Some(record) if record.election == *election => Ok(()),
                    _ => Err(ValidationError::NotRegistered),
                },
                EligibilityEvidence::MembershipProof { .. } => Err(ValidationError::NotRegistered),
            },
        }
    }

    /// Accumulator root; legacy registries have none
    pub fn root(&self) -> Option<Hash32> {
        match self {
            VoterRegistry::Compressed { accumulator, .. } => Some(accumulator.root()),
            VoterRegistry::Legacy { .. } => None,
        }
    }

    /// Fresh membership proof for an admitted leaf (compressed mode only)
    pub fn proof(&self, leaf_index: u32) -> Option<MembershipProof> {
        match self {
            VoterRegistry::Compressed { accumulator, .. } => accumulator.proof(leaf_index),
            VoterRegistry::Legacy { .. } => None,
        }
    }

    /// Discrete admission record (legacy mode only)
    pub fn record(&self, wallet: &Wallet) -> Option<&VoterAdmission> {
        match self {
            VoterRegistry::Compressed { .. } => None,
            VoterRegistry::Legacy { records, .. } => records.get(wallet),
        }
    }
}
