mod util;

use clcred::prelude::*;
use rand::thread_rng;
use std::collections::BTreeSet;
use util::*;

#[test]
fn revoke_sole_member_empties_accumulator() {
    let (mut issuer, definition) = setup_issuer(8);
    let (_, credential) = issue(&mut issuer, &definition, "alice");

    let state = issuer.accumulator_state(&definition.id).unwrap();
    assert!(!state.accumulator.is_identity());
    issuer.revoke(&definition.id, credential.index()).unwrap();

    let state = issuer.accumulator_state(&definition.id).unwrap();
    assert!(state.accumulator.is_identity());
    assert_eq!(state.accumulator, Accumulator::default());
    assert!(state.active.is_empty());

    issue(&mut issuer, &definition, "bob");
    let state = issuer.accumulator_state(&definition.id).unwrap();
    assert!(!state.accumulator.is_identity());
}

#[test]
fn revoke_unknown_index() {
    let (mut issuer, definition) = setup_issuer(8);
    issue(&mut issuer, &definition, "alice");
    assert_eq!(
        issuer.revoke(&definition.id, 2),
        Err(Error::InvalidRevocationIndex(2))
    );
    issuer.revoke(&definition.id, 1).unwrap();
    assert_eq!(
        issuer.revoke(&definition.id, 1),
        Err(Error::InvalidRevocationIndex(1))
    );
    let other = CredentialDefinitionId::new("other", "1.0");
    assert!(matches!(
        issuer.revoke(&other, 1),
        Err(Error::LookupFailed(_))
    ));
}

#[test]
fn capacity_eight_scenario() {
    let (mut issuer, definition) = setup_issuer(8);
    let tails = &definition.tails;

    let (alice, mut alice_cred) = issue(&mut issuer, &definition, "alice");
    assert_eq!(alice_cred.index(), 1);
    let state = issuer.accumulator_state(&definition.id).unwrap();
    assert_eq!(state.accumulator.0, tails.accumulator_tail(1).unwrap());

    issuer.revoke(&definition.id, 1).unwrap();
    let state = issuer.accumulator_state(&definition.id).unwrap();
    assert!(state.accumulator.is_identity());

    let (bob, bob_cred) = issue(&mut issuer, &definition, "bob");
    assert_eq!(bob_cred.index(), 2);
    let state = issuer.accumulator_state(&definition.id).unwrap();
    assert_eq!(state.accumulator.0, tails.accumulator_tail(2).unwrap());
    assert_eq!(bob_cred.witness.omega, G2Projective::IDENTITY);
    assert_eq!(bob_cred.witness.v, BTreeSet::from([2]));

    let feed = issuer.publish(&definition.id).unwrap();
    assert!(check_consistency(bob.definition(), &feed, &bob_cred.witness).unwrap());
    assert!(!check_consistency(alice.definition(), &feed, &alice_cred.witness).unwrap());
    assert_eq!(
        alice.refresh(&feed, &mut alice_cred),
        Err(Error::RevokedCredential { index: 1 })
    );
}

#[test]
fn synchronizing_twice_is_a_no_op() {
    let (mut issuer, definition) = setup_issuer(8);
    let (alice, alice_cred) = issue(&mut issuer, &definition, "alice");
    issue(&mut issuer, &definition, "bob");
    let feed = issuer.publish(&definition.id).unwrap();

    let once = update_witness(alice.definition(), &feed, &alice_cred.witness).unwrap();
    let twice = update_witness(alice.definition(), &feed, &once).unwrap();
    assert_eq!(once, twice);
    assert_eq!(once.omega, twice.omega);
    assert_eq!(once.v, twice.v);
}

#[test]
fn synchronizing_converges_on_the_accumulator() {
    let (mut issuer, definition) = setup_issuer(8);
    let (alice, mut alice_cred) = issue(&mut issuer, &definition, "alice");
    let before = alice_cred.witness.clone();

    // nothing happened yet
    let feed = issuer.publish(&definition.id).unwrap();
    alice.refresh(&feed, &mut alice_cred).unwrap();
    assert_eq!(alice_cred.witness, before);
    assert!(check_consistency(alice.definition(), &feed, &alice_cred.witness).unwrap());

    let (_, bob_cred) = issue(&mut issuer, &definition, "bob");
    issue(&mut issuer, &definition, "carol");
    issuer.revoke(&definition.id, bob_cred.index()).unwrap();
    let feed = issuer.publish(&definition.id).unwrap();

    // stale is reported as false, not as an error
    assert!(!check_consistency(alice.definition(), &feed, &alice_cred.witness).unwrap());

    alice.refresh(&feed, &mut alice_cred).unwrap();
    let state = feed.state().unwrap();
    assert_ne!(alice_cred.witness.omega, before.omega);
    assert_eq!(alice_cred.witness.v, state.active);
    assert_eq!(alice_cred.witness.seq_no, state.seq_no);
    assert_eq!(
        alice_cred.witness.omega,
        definition.tails.witness_tail(1, 3).unwrap()
    );
    assert!(check_consistency(alice.definition(), &feed, &alice_cred.witness).unwrap());
}

#[test]
fn revoked_witness_never_recovers() {
    let (mut issuer, definition) = setup_issuer(8);
    let (alice, mut alice_cred) = issue(&mut issuer, &definition, "alice");
    issue(&mut issuer, &definition, "bob");
    issuer.revoke(&definition.id, alice_cred.index()).unwrap();
    issue(&mut issuer, &definition, "carol");
    let feed = issuer.publish(&definition.id).unwrap();

    for _ in 0..2 {
        assert_eq!(
            update_witness(alice.definition(), &feed, &alice_cred.witness),
            Err(Error::RevokedCredential { index: 1 })
        );
    }
    assert_eq!(
        alice.prepare_presentation(&feed, &mut alice_cred),
        Err(Error::RevokedCredential { index: 1 })
    );
    assert!(!check_consistency(alice.definition(), &feed, &alice_cred.witness).unwrap());
}

#[test]
fn prepare_presentation_synchronizes() {
    let (mut issuer, definition) = setup_issuer(8);
    let (alice, mut alice_cred) = issue(&mut issuer, &definition, "alice");
    for holder in ["bob", "carol", "dave"] {
        issue(&mut issuer, &definition, holder);
    }
    issuer.revoke(&definition.id, 3).unwrap();

    // an outdated snapshot leaves the witness behind the issuer
    let old_feed = issuer.publish(&definition.id).unwrap();
    issuer.revoke(&definition.id, 2).unwrap();
    alice.prepare_presentation(&old_feed, &mut alice_cred).unwrap();
    let live = issuer.publish(&definition.id).unwrap();
    assert!(!check_consistency(alice.definition(), &live, &alice_cred.witness).unwrap());

    alice.prepare_presentation(&live, &mut alice_cred).unwrap();
    assert!(check_consistency(alice.definition(), &live, &alice_cred.witness).unwrap());
    assert_eq!(alice_cred.witness.v, BTreeSet::from([1, 4]));
}

#[test]
fn holders_synchronize_concurrently() {
    let (mut issuer, definition) = setup_issuer(8);
    let holders: Vec<(Prover, Credential)> = ["alice", "bob", "carol", "dave", "erin"]
        .into_iter()
        .map(|h| issue(&mut issuer, &definition, h))
        .collect();
    issuer.revoke(&definition.id, 2).unwrap();
    issuer.revoke(&definition.id, 4).unwrap();
    let feed = issuer.publish(&definition.id).unwrap();

    let results: Vec<ClResult<bool>> = std::thread::scope(|s| {
        let handles: Vec<_> = holders
            .iter()
            .map(|(prover, credential)| {
                let feed = feed.clone();
                s.spawn(move || {
                    let witness = update_witness(prover.definition(), &feed, &credential.witness)?;
                    check_consistency(prover.definition(), &feed, &witness)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect()
    });

    for ((_, credential), result) in holders.iter().zip(results) {
        match credential.index() {
            2 | 4 => assert_eq!(
                result,
                Err(Error::RevokedCredential {
                    index: credential.index()
                })
            ),
            _ => assert_eq!(result, Ok(true)),
        }
    }
}

#[test]
fn witness_survives_serialization() {
    let (mut issuer, definition) = setup_issuer(4);
    let (alice, credential) = issue(&mut issuer, &definition, "alice");
    issue(&mut issuer, &definition, "bob");
    let feed = issuer.publish(&definition.id).unwrap();

    let json = serde_json::to_string(&credential).unwrap();
    let restored: Credential = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, credential);
    let witness = update_witness(alice.definition(), &feed, &restored.witness).unwrap();
    assert!(check_consistency(alice.definition(), &feed, &witness).unwrap());

    let deltas = serde_json::to_string(&feed.events_since(0).unwrap()).unwrap();
    let events: Vec<DeltaEvent> = serde_json::from_str(&deltas).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].kind, DeltaKind::Assign);
}
