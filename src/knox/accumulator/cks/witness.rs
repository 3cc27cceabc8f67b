use super::{
    gamma_pow, Accumulator, AccumulatorPublicKey, AccumulatorSecretKey, DeltaEvent, DeltaKind,
    Error, RevocationPublicKey, RevocationSecretKey, TailsAccessor,
};
use blsful::inner_types::{
    multi_miller_loop, Curve, G1Projective, G2Prepared, G2Projective, Group, Scalar,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use subtle::ConstantTimeEq;

/// A non-revocation witness for credential index `index`.
///
/// `omega` accumulates every member of `v` except `index` itself, so the
/// witness is fresh exactly when `v` equals the published active set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    /// The credential index i
    pub index: u32,
    /// The last delta log sequence number folded into this witness
    pub seq_no: u64,
    /// g'·(1/(sk + γ^i))
    pub sigma_i: G2Projective,
    /// u·γ^i
    pub u_i: G2Projective,
    /// g_i, the tail at i
    pub g_i: G1Projective,
    /// Σ_{j∈V, j≠i} g'_{L+1-j+i}
    pub omega: G2Projective,
    /// The active indices V this witness was computed against
    pub v: BTreeSet<u32>,
}

impl Witness {
    /// Issue a witness for index `i` that joins the already `active` indices.
    pub fn new(
        i: u32,
        seq_no: u64,
        active: &BTreeSet<u32>,
        tails: &impl TailsAccessor,
        pk: &RevocationPublicKey,
        sk: &RevocationSecretKey,
        gamma: &AccumulatorSecretKey,
    ) -> Result<Self, Error> {
        if i == 0 || i > tails.max_credentials() {
            return Err(Error::from_msg(
                Error::TAIL_OUT_OF_RANGE,
                "credential index must be in 1..=L",
            ));
        }
        let gamma_i = gamma_pow(&gamma.0, i);
        let denominator = Option::<Scalar>::from((sk.sk + gamma_i).invert())
            .ok_or_else(|| Error::from_msg(Error::NOT_INVERTIBLE, "sk + γ^i is not invertible"))?;
        let mut omega = G2Projective::IDENTITY;
        for j in active.iter().filter(|j| **j != i) {
            omega += tails.witness_tail(i, *j)?;
        }
        let mut v = active.clone();
        v.insert(i);
        Ok(Self {
            index: i,
            seq_no,
            sigma_i: pk.g_dash * denominator,
            u_i: pk.u * gamma_i,
            g_i: tails.tail(i)?,
            omega,
            v,
        })
    }

    /// Fold one delta event concerning another index into this witness.
    ///
    /// Events for this witness's own index are rejected, events must be
    /// applied in sequence order.
    pub fn apply_event(
        &mut self,
        event: &DeltaEvent,
        tails: &impl TailsAccessor,
    ) -> Result<(), Error> {
        if event.index == self.index {
            return Err(Error::from_msg(
                Error::INVALID_EVENT,
                "event concerns the witness's own index",
            ));
        }
        if event.seq_no <= self.seq_no {
            return Err(Error::from_msg(
                Error::INVALID_EVENT,
                "event is older than the witness",
            ));
        }
        match event.kind {
            DeltaKind::Assign => {
                if self.v.insert(event.index) {
                    self.omega += tails.witness_tail(self.index, event.index)?;
                }
            }
            DeltaKind::Revoke => {
                if self.v.remove(&event.index) {
                    self.omega -= tails.witness_tail(self.index, event.index)?;
                }
            }
        }
        self.seq_no = event.seq_no;
        Ok(())
    }

    /// e(g_i, acc) == e(g, ω)·z
    pub fn verify_membership(
        &self,
        accumulator: &Accumulator,
        pk: &RevocationPublicKey,
        acc_pk: &AccumulatorPublicKey,
    ) -> bool {
        let lhs = multi_miller_loop(&[
            (
                &self.g_i.to_affine(),
                &G2Prepared::from(accumulator.0.to_affine()),
            ),
            (
                &(-pk.g).to_affine(),
                &G2Prepared::from(self.omega.to_affine()),
            ),
        ])
        .final_exponentiation();
        lhs.ct_eq(&acc_pk.0).unwrap_u8() == 1
    }

    /// e(pk + g_i, σ_i) == e(g, g') and e(g_i, u) == e(g, u_i)
    pub fn verify_signature(&self, pk: &RevocationPublicKey) -> bool {
        let neg_g = (-pk.g).to_affine();
        let sigma_ok = multi_miller_loop(&[
            (
                &(pk.pk + self.g_i).to_affine(),
                &G2Prepared::from(self.sigma_i.to_affine()),
            ),
            (&neg_g, &G2Prepared::from(pk.g_dash.to_affine())),
        ])
        .final_exponentiation()
        .is_identity();
        let u_ok = multi_miller_loop(&[
            (&self.g_i.to_affine(), &G2Prepared::from(pk.u.to_affine())),
            (&neg_g, &G2Prepared::from(self.u_i.to_affine())),
        ])
        .final_exponentiation()
        .is_identity();
        (sigma_ok & u_ok).unwrap_u8() == 1
    }
}
