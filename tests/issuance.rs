mod util;

use clcred::prelude::*;
use maplit::btreemap;
use rand::thread_rng;
use std::sync::Arc;
use util::*;

#[test]
fn blind_issuance_verifies() {
    let (mut issuer, definition) = setup_issuer(8);
    let (prover, credential) = issue(&mut issuer, &definition, "alice");

    assert_eq!(credential.index(), 1);
    assert_eq!(credential.attributes, holder_attributes("alice").encoded());
    assert!(credential
        .signature
        .verify(&definition.primary_key, &credential.attributes)
        .unwrap());
    assert!(credential.non_revocation.verify(&definition.revocation_key));

    // Z == Rx · S^v · A^e with a tampered attribute must fail
    let mut forged = credential.attributes.clone();
    forged.insert("age".to_string(), BigUint::from(29u32));
    assert!(!credential
        .signature
        .verify(&definition.primary_key, &forged)
        .unwrap());

    let feed = issuer.publish(&definition.id).unwrap();
    assert!(check_consistency(prover.definition(), &feed, &credential.witness).unwrap());
}

#[test]
fn signing_exponent_and_blinding_sizes() {
    let (mut issuer, definition) = setup_issuer(4);
    let prover = Prover::new("alice", definition.clone());
    let (request, _) = prover.blind(thread_rng());
    let issued = issuer
        .issue(&definition.id, &request, &holder_attributes("alice"), thread_rng())
        .unwrap();
    let params = definition.params;
    let e_start = BigUint::from(1u32) << params.e_start_bits;
    let e_end = &e_start + (BigUint::from(1u32) << params.e_range_bits);
    assert!(issued.signature.e >= e_start);
    assert!(issued.signature.e < e_end);
    assert_eq!(issued.signature.v_prime_prime.bits(), params.v_prime_prime_bits);
}

#[test]
fn non_revocation_blinding_is_recomposed() {
    let (mut issuer, definition) = setup_issuer(4);
    let prover = Prover::new("alice", definition.clone());
    let (request, blinding) = prover.blind(thread_rng());
    let issued = issuer
        .issue(&definition.id, &request, &holder_attributes("alice"), thread_rng())
        .unwrap();
    let vr_prime_prime = issued.non_revocation.vr_prime_prime;
    let credential = prover.process_credential(issued.clone(), &blinding).unwrap();
    assert_ne!(credential.non_revocation.vr, vr_prime_prime);

    assert!(credential.non_revocation.verify(&definition.revocation_key));

    // another vr' cannot complete the signature
    let (_, other) = RevocationBlinding::new(&definition.revocation_key, thread_rng());
    let wrong = issued.non_revocation.to_unblinded(&other);
    assert!(!wrong.verify(&definition.revocation_key));
}

#[test]
fn unblinded_issuance() {
    let (mut issuer, definition) = setup_issuer(4);
    let prover = Prover::new("bob", definition.clone());
    let issued = issuer
        .issue_unblinded(&definition.id, "bob", &holder_attributes("bob"), thread_rng())
        .unwrap();
    let credential = prover
        .process_credential(issued, &HolderBlinding::unblinded())
        .unwrap();
    assert!(credential
        .signature
        .verify(&definition.primary_key, &credential.attributes)
        .unwrap());
}

#[test]
fn zero_commitment_is_rejected() {
    let (mut issuer, definition) = setup_issuer(4);
    let prover = Prover::new("alice", definition.clone());
    let (mut request, _) = prover.blind(thread_rng());
    request.u = BigUint::from(0u32);
    let res = issuer.issue(&definition.id, &request, &holder_attributes("alice"), thread_rng());
    assert!(matches!(res, Err(Error::InvalidInput(_))));
    assert_eq!(issuer.accumulator_state(&definition.id).unwrap().seq_no, 0);
}

#[test]
fn attribute_mismatch_leaves_no_trace() {
    let (mut issuer, definition) = setup_issuer(4);
    let prover = Prover::new("alice", definition.clone());
    let (request, _) = prover.blind(thread_rng());
    let partial: Attributes = [("age", "28"), ("name", "alice")].into_iter().collect();
    let res = issuer.issue(&definition.id, &request, &partial, thread_rng());
    assert!(matches!(res, Err(Error::InvalidInput(_))));

    let state = issuer.accumulator_state(&definition.id).unwrap();
    assert_eq!(state, AccumulatorState::default());

    // the next successful issuance still gets the first index
    let (_, credential) = issue(&mut issuer, &definition, "alice");
    assert_eq!(credential.index(), 1);
}

#[test]
fn capacity_exceeded() {
    let (mut issuer, definition) = setup_issuer(2);
    issue(&mut issuer, &definition, "alice");
    issue(&mut issuer, &definition, "bob");
    let prover = Prover::new("carol", definition.clone());
    let (request, _) = prover.blind(thread_rng());
    let res = issuer.issue(&definition.id, &request, &holder_attributes("carol"), thread_rng());
    assert_eq!(res, Err(Error::CapacityExceeded { capacity: 2 }));

    // revoking does not free an index
    issuer.revoke(&definition.id, 1).unwrap();
    let res = issuer.issue(&definition.id, &request, &holder_attributes("carol"), thread_rng());
    assert_eq!(res, Err(Error::CapacityExceeded { capacity: 2 }));
}

#[test]
fn lookup_by_id_and_attributes() {
    init_logger();
    let mut issuer = Issuer::new(test_params(4));
    let first = issuer
        .add_credential_definition("gvt", "1.0", &ATTRIBUTES, thread_rng())
        .unwrap();
    let second = issuer
        .add_credential_definition("gvt", "2.0", &["sex", "name", "height", "age"], thread_rng())
        .unwrap();

    assert_eq!(issuer.credential_definition("gvt", "1.0").unwrap().id(), &first.id);
    assert!(matches!(
        issuer.credential_definition("gvt", "3.0"),
        Err(Error::LookupFailed(_))
    ));
    assert!(matches!(
        issuer.add_credential_definition("gvt", "1.0", &["age"], thread_rng()),
        Err(Error::InvalidInput(_))
    ));

    // the latest definition over the same attribute set wins
    let found = issuer
        .find_credential_definition(&["name", "age", "sex", "height"])
        .unwrap();
    assert_eq!(found.id(), &second.id);
    assert!(matches!(
        issuer.find_credential_definition(&["name", "age"]),
        Err(Error::LookupFailed(_))
    ));
}

#[test]
fn create_credential_from_repository() {
    init_logger();
    let repository = Arc::new(InMemoryAttributeRepository::new());
    repository
        .insert("alice", holder_attributes("alice"))
        .unwrap();
    let mut issuer = Issuer::with_repository(test_params(4), repository.clone());
    let old = issuer
        .add_credential_definition(NAME, "1.0", &ATTRIBUTES, thread_rng())
        .unwrap();
    let latest = issuer
        .add_credential_definition(NAME, "1.1", &ATTRIBUTES, thread_rng())
        .unwrap();

    let prover = Prover::new("alice", old.clone());
    let (request, blinding) = prover.blind(thread_rng());
    let issued = issuer
        .create_credential(NAME, "1.0", &request, thread_rng())
        .unwrap();
    assert_eq!(issued.definition, old.id);
    let credential = prover.process_credential(issued, &blinding).unwrap();
    assert_eq!(credential.attributes["name"], encode_value("alice"));

    let prover = Prover::new("alice", latest.clone());
    let (request, blinding) = prover.blind(thread_rng());
    let issued = issuer
        .create_credential_for_attributes(&request, thread_rng())
        .unwrap();
    assert_eq!(issued.definition, latest.id);
    prover.process_credential(issued, &blinding).unwrap();

    let prover = Prover::new("mallory", latest.clone());
    let (request, _) = prover.blind(thread_rng());
    assert!(matches!(
        issuer.create_credential(NAME, "1.1", &request, thread_rng()),
        Err(Error::LookupFailed(_))
    ));
    assert!(matches!(
        issuer.create_credential(NAME, "9.9", &request, thread_rng()),
        Err(Error::LookupFailed(_))
    ));
}

#[test]
fn credential_for_another_holder_is_refused() {
    let (mut issuer, definition) = setup_issuer(4);
    let alice = Prover::new("alice", definition.clone());
    let (request, blinding) = alice.blind(thread_rng());
    let issued = issuer
        .issue(&definition.id, &request, &holder_attributes("alice"), thread_rng())
        .unwrap();
    let bob = Prover::new("bob", definition.clone());
    assert!(matches!(
        bob.process_credential(issued, &blinding),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn definition_from_known_factors() {
    init_logger();
    let mut issuer = Issuer::new(test_params(4));
    let definition = issuer
        .add_credential_definition_with_factors(
            NAME,
            VERSION,
            &ATTRIBUTES,
            BigUint::from(1019u32),
            BigUint::from(1031u32),
            thread_rng(),
        )
        .unwrap();
    assert_eq!(definition.primary_key.n, BigUint::from(2039u32 * 2063u32));
    let (_, credential) = issue(&mut issuer, &definition, "alice");
    assert!(credential
        .signature
        .verify(&definition.primary_key, &credential.attributes)
        .unwrap());

    // 1021 is prime but 2043 is not
    assert!(matches!(
        issuer.add_credential_definition_with_factors(
            NAME,
            "2.0",
            &ATTRIBUTES,
            BigUint::from(1021u32),
            BigUint::from(1031u32),
            thread_rng(),
        ),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn parameters_from_json() {
    let params = CredentialParameters::from_json(r#"{"prime_bits": 256, "max_credentials": 16}"#)
        .unwrap();
    assert_eq!(params.prime_bits, 256);
    assert_eq!(params.max_credentials, 16);
    assert_eq!(params.e_start_bits, 596);

    let bad = btreemap! { "e_start_bits" => 100, "e_range_bits" => 120 };
    let json = serde_json::to_string(&bad).unwrap();
    assert!(matches!(
        CredentialParameters::from_json(&json),
        Err(Error::InvalidParameters(_))
    ));
}
