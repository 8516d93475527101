use crate::*;
use num_enum::TryFromPrimitive;
use std::collections::BTreeMap;

/// Kind of eligibility claim carried by an attestation
#[derive(
    Serialize, Deserialize, TryFromPrimitive, Copy, Debug, Clone, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum AttestationKind {
    Humanity = 1,
    Kyc = 2,
    Membership = 3,
    Revoked = 255,
}

/// An externally issued, time-bounded eligibility claim.
///
/// The ledger only reads attestations; issuing and revoking them is the
/// issuer's business.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Attestation {
    pub reference: AttestationRef,
    pub subject: Wallet,
    pub kind: AttestationKind,
    pub expires_at: Timestamp,
}

impl Attestation {
    /// Check the attestation for use by `wallet` at time `now`
    pub fn validate(&self, wallet: &Wallet, now: Timestamp) -> Result<(), ValidationError> {
        if self.kind == AttestationKind::Revoked {
            return Err(ValidationError::InvalidAttestation);
        }
        if self.subject != *wallet {
            return Err(ValidationError::AttestationMismatch);
        }
        if now >= self.expires_at {
            return Err(ValidationError::ExpiredAttestation);
        }
        Ok(())
    }
}

/// Read access to attestations issued elsewhere
pub trait AttestationReader {
    /// Look up an attestation by reference
    fn attestation(&self, reference: &AttestationRef) -> Option<Attestation>;

    /// Resolve and validate an attestation for `wallet` in one step
    fn validate_for(
        &self,
        reference: &AttestationRef,
        wallet: &Wallet,
        now: Timestamp,
    ) -> Result<Attestation, ValidationError> {
        let attestation = self
            .attestation(reference)
            .ok_or(ValidationError::InvalidAttestation)?;
        attestation.validate(wallet, now)?;
        Ok(attestation)
    }
}

impl<R: AttestationReader + ?Sized> AttestationReader for &R {
    fn attestation(&self, reference: &AttestationRef) -> Option<Attestation> {
        (**self).attestation(reference)
    }
}

/// A simple attestation reader backed by an in-memory BTreeMap
#[derive(Default, Clone, Debug)]
pub struct MemAttestations {
    inner: BTreeMap<AttestationRef, Attestation>,
}

impl MemAttestations {
    pub fn set(&mut self, attestation: Attestation) {
        self.inner.insert(attestation.reference, attestation);
    }

    /// Issue a fresh attestation for `subject` and return its reference
    pub fn issue(
        &mut self,
        subject: Wallet,
        kind: AttestationKind,
        expires_at: Timestamp,
    ) -> AttestationRef {
        let seq = self.inner.len() as u64;
        let reference = AttestationRef(
            hash_parts(&[b"attestation", subject.as_bytes(), &seq.to_le_bytes()]).to_bytes(),
        );
        self.set(Attestation {
            reference,
            subject,
            kind,
            expires_at,
        });
        reference
    }
}

impl AttestationReader for MemAttestations {
    fn attestation(&self, reference: &AttestationRef) -> Option<Attestation> {
        self.inner.get(reference).cloned()
    }
}

impl From<Vec<Attestation>> for MemAttestations {
    fn from(items: Vec<Attestation>) -> Self {
        let mut store = MemAttestations::default();
        for attestation in items {
            store.set(attestation);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn kind_from_wire_byte() {
        assert_eq!(
            AttestationKind::try_from(2u8).unwrap(),
            AttestationKind::Kyc
        );
        assert_eq!(
            AttestationKind::try_from(255u8).unwrap(),
            AttestationKind::Revoked
        );
        assert!(AttestationKind::try_from(9u8).is_err());
    }

    #[test]
    fn validation_order() {
        let alice = Wallet([1; 32]);
        let bob = Wallet([2; 32]);
        let mut store = MemAttestations::default();
        let valid = store.issue(alice, AttestationKind::Humanity, 1_000);
        let revoked = store.issue(alice, AttestationKind::Revoked, 1_000);

        assert!(store.validate_for(&valid, &alice, 999).is_ok());
        assert_eq!(
            store.validate_for(&valid, &bob, 10),
            Err(ValidationError::AttestationMismatch)
        );
        assert_eq!(
            store.validate_for(&valid, &alice, 1_000),
            Err(ValidationError::ExpiredAttestation)
        );
        assert_eq!(
            store.validate_for(&revoked, &alice, 10),
            Err(ValidationError::InvalidAttestation)
        );
        assert_eq!(
            store.validate_for(&AttestationRef([7; 32]), &alice, 10),
            Err(ValidationError::InvalidAttestation)
        );
    }

    #[test]
    fn issue_gives_distinct_references() {
        let alice = Wallet([1; 32]);
        let mut store = MemAttestations::default();
        let first = store.issue(alice, AttestationKind::Kyc, 10);
        let second = store.issue(alice, AttestationKind::Kyc, 10);
        assert_ne!(first, second);
        assert_eq!(store.attestation(&first).unwrap().subject, alice);
    }
}
