#![allow(dead_code)]

use clcred::prelude::*;
use rand::thread_rng;
use std::sync::Arc;
use std::time::Instant;

pub const NAME: &str = "gvt";
pub const VERSION: &str = "1.0";
pub const ATTRIBUTES: [&str; 4] = ["age", "height", "name", "sex"];

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Small primes keep key generation fast, every other size is the default
pub fn test_params(max_credentials: u32) -> CredentialParameters {
    CredentialParameters {
        prime_bits: 128,
        max_credentials,
        ..Default::default()
    }
}

pub fn holder_attributes(name: &str) -> Attributes {
    [
        ("age", "28"),
        ("height", "175"),
        ("name", name),
        ("sex", "male"),
    ]
    .into_iter()
    .collect()
}

pub fn setup_issuer(max_credentials: u32) -> (Issuer, Arc<CredentialDefinitionPublic>) {
    init_logger();
    let mut issuer = Issuer::new(test_params(max_credentials));
    let before = Instant::now();
    let public = issuer
        .add_credential_definition(NAME, VERSION, &ATTRIBUTES, thread_rng())
        .unwrap();
    println!("key generation time = {:?}", before.elapsed());
    (issuer, public)
}

pub fn issue(
    issuer: &mut Issuer,
    definition: &Arc<CredentialDefinitionPublic>,
    holder_id: &str,
) -> (Prover, Credential) {
    let prover = Prover::new(holder_id, definition.clone());
    let (request, blinding) = prover.blind(thread_rng());
    let issued = issuer
        .issue(
            &definition.id,
            &request,
            &holder_attributes(holder_id),
            thread_rng(),
        )
        .unwrap();
    let credential = prover.process_credential(issued, &blinding).unwrap();
    (prover, credential)
}
