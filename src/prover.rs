use crate::credential::{
    credential_context, Credential, CredentialDefinitionPublic, CredentialRequest, IssuedCredential,
};
use crate::error::Error;
use crate::knox::accumulator::cks::{DeltaKind, RevocationBlinding, Witness};
use crate::knox::cl::BlindingFactor;
use crate::revocation_registry::DeltaFeed;
use crate::ClResult;
use blsful::inner_types::Scalar;
use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};
use std::sync::Arc;

/// The secrets a holder keeps between requesting and receiving a credential
#[derive(Clone, Debug)]
pub struct HolderBlinding {
    v_prime: BlindingFactor,
    vr_prime: RevocationBlinding,
}

impl HolderBlinding {
    /// The blinding for a credential issued without holder contribution
    pub fn unblinded() -> Self {
        Self {
            v_prime: BlindingFactor(BigUint::zero()),
            vr_prime: RevocationBlinding(Scalar::ZERO),
        }
    }
}

/// A credential holder for one credential definition
#[derive(Clone, Debug)]
pub struct Prover {
    holder_id: String,
    definition: Arc<CredentialDefinitionPublic>,
}

impl Prover {
    /// Create a holder `holder_id` of credentials under `definition`
    pub fn new(holder_id: impl Into<String>, definition: Arc<CredentialDefinitionPublic>) -> Self {
        Self {
            holder_id: holder_id.into(),
            definition,
        }
    }

    /// The holder id
    pub fn holder_id(&self) -> &str {
        &self.holder_id
    }

    /// The credential definition this holder uses
    pub fn definition(&self) -> &CredentialDefinitionPublic {
        &self.definition
    }

    /// Commit to fresh v' and vr' and build the request for the issuer
    pub fn blind(&self, mut rng: impl RngCore + CryptoRng) -> (CredentialRequest, HolderBlinding) {
        let (u, v_prime) = BlindingFactor::new(
            &self.definition.primary_key,
            self.definition.params.v_prime_bits,
            &mut rng,
        );
        let (ur, vr_prime) = RevocationBlinding::new(&self.definition.revocation_key, &mut rng);
        (
            CredentialRequest {
                holder_id: self.holder_id.clone(),
                u,
                ur,
            },
            HolderBlinding { v_prime, vr_prime },
        )
    }

    /// Complete an issued credential with the holder's blinding and check it
    pub fn process_credential(
        &self,
        issued: IssuedCredential,
        blinding: &HolderBlinding,
    ) -> ClResult<Credential> {
        let definition = &self.definition;
        if issued.definition != definition.id {
            return Err(Error::InvalidInput(
                "credential was issued under another definition",
            ));
        }
        let signature = issued.signature.to_unblinded(&blinding.v_prime.0);
        if !signature.verify(&definition.primary_key, &issued.attributes)? {
            return Err(Error::InvalidInput("primary signature does not verify"));
        }
        let non_revocation = issued.non_revocation.to_unblinded(&blinding.vr_prime);
        let witness = issued.witness;
        if non_revocation.i != witness.index
            || non_revocation.g_i != witness.g_i
            || non_revocation.m2 != credential_context(&self.holder_id, witness.index)
        {
            return Err(Error::InvalidInput(
                "non-revocation credential does not match the witness",
            ));
        }
        if !non_revocation.verify(&definition.revocation_key) {
            return Err(Error::InvalidInput(
                "non-revocation signature does not verify",
            ));
        }
        if !witness.verify_signature(&definition.revocation_key) {
            return Err(Error::InvalidInput("witness signature does not verify"));
        }
        debug!(
            "{} accepted {} at index {}",
            self.holder_id, definition.id, witness.index
        );
        Ok(Credential {
            definition: issued.definition,
            attributes: issued.attributes,
            signature,
            non_revocation,
            witness,
        })
    }

    /// Bring the credential's witness up to date with `feed`
    pub fn refresh(&self, feed: &impl DeltaFeed, credential: &mut Credential) -> ClResult<()> {
        credential.witness = update_witness(&self.definition, feed, &credential.witness)?;
        Ok(())
    }

    /// Synchronize then self-check the credential before it goes into a proof.
    ///
    /// Fails with [`Error::StaleWitness`] if the feed moved on between the
    /// update and the check, the caller retries.
    pub fn prepare_presentation(
        &self,
        feed: &impl DeltaFeed,
        credential: &mut Credential,
    ) -> ClResult<()> {
        self.refresh(feed, credential)?;
        if !credential.non_revocation.verify(&self.definition.revocation_key)
            || credential.non_revocation.g_i != credential.witness.g_i
        {
            return Err(Error::InvalidInput(
                "non-revocation credential does not match the witness",
            ));
        }
        if check_consistency(&self.definition, feed, &credential.witness)? {
            Ok(())
        } else {
            Err(Error::StaleWitness)
        }
    }
}

/// Replay every delta event newer than the witness.
///
/// Returns the witness unchanged when nothing happened since it was last
/// synchronized, and [`Error::RevokedCredential`] once its own index is gone.
pub fn update_witness(
    definition: &CredentialDefinitionPublic,
    feed: &impl DeltaFeed,
    witness: &Witness,
) -> ClResult<Witness> {
    let events = feed.events_since(witness.seq_no)?;
    if events.is_empty() {
        debug!("witness {} already at seq_no {}", witness.index, witness.seq_no);
        return Ok(witness.clone());
    }
    if events
        .iter()
        .any(|e| e.index == witness.index && e.kind == DeltaKind::Revoke)
    {
        debug!("witness {} was revoked", witness.index);
        return Err(Error::RevokedCredential {
            index: witness.index,
        });
    }
    let mut updated = witness.clone();
    for event in &events {
        if event.seq_no != updated.seq_no + 1 {
            return Err(Error::InvalidInput("delta log is not contiguous"));
        }
        updated.apply_event(event, &definition.tails)?;
    }
    debug!(
        "witness {} moved from seq_no {} to {} over {} events",
        witness.index,
        witness.seq_no,
        updated.seq_no,
        events.len()
    );
    Ok(updated)
}

/// Check the witness against the published accumulator.
///
/// True only when the witness is synchronized and its index is still
/// active. A stale witness yields false, never an error.
pub fn check_consistency(
    definition: &CredentialDefinitionPublic,
    feed: &impl DeltaFeed,
    witness: &Witness,
) -> ClResult<bool> {
    let state = feed.state()?;
    if !state.active.contains(&witness.index) || !witness.v.contains(&witness.index) {
        debug!("witness {} is not an active member", witness.index);
        return Ok(false);
    }
    if witness.seq_no != state.seq_no || witness.v != state.active {
        debug!(
            "witness {} is stale, seq_no {} published {}",
            witness.index, witness.seq_no, state.seq_no
        );
        return Ok(false);
    }
    let consistent = witness.verify_membership(
        &state.accumulator,
        &definition.revocation_key,
        &definition.accumulator_key,
    ) && witness.verify_signature(&definition.revocation_key);
    debug!("witness {} consistency {}", witness.index, consistent);
    Ok(consistent)
}
