use crate::error::ContractError;
use crate::types::{Proof, ProofSignature, WeightedSigner, WeightedSigners};

use soroban_sdk::{
    testutils::{Address as _, BytesN as _, Ledger},
    vec, Address, BytesN, Env, Vec, U256,
};

use gateway_std::{assert_err, assert_ok};

use crate::{
    auth,
    contract::MultisigGatewayClient,
    testutils::{
        self, deploy_gateway, generate_proof, generate_signers_set,
        generate_signers_set_with_weights, message_hash_to_sign, randint, setup_gateway, sign,
        TestSignerSet,
    },
};

fn setup_env<'a>(
    previous_signers_retention: u32,
    num_signers: u32,
) -> (Env, TestSignerSet, MultisigGatewayClient<'a>) {
    let env = Env::default();
    env.mock_all_auths();

    let (signers, client) = setup_gateway(&env, previous_signers_retention, num_signers);

    (env, signers, client)
}

/// Gateway with the genesis set `{5, 6, 7}` and threshold 10.
fn setup_env_with_fixed_weights<'a>() -> (Env, TestSignerSet, MultisigGatewayClient<'a>) {
    let env = Env::default();
    env.mock_all_auths();

    let signers = generate_signers_set_with_weights(&env, &[5, 6, 7], 10, BytesN::random(&env));
    let client = deploy_gateway(
        &env,
        &Address::generate(&env),
        &Address::generate(&env),
        &signers.domain_separator,
        0,
        1,
        vec![&env, signers.signers.clone()],
    );

    (env, signers, client)
}

#[test]
fn initialize_registers_genesis_signers() {
    let (env, signers, client) = setup_env(randint(1, 10), randint(1, 10));
    let signers_hash = signers.signers.hash(&env);

    env.as_contract(&client.address, || {
        assert_eq!(auth::epoch(&env), 1);
        assert_eq!(auth::signers_hash_by_epoch(&env, 1), Some(signers_hash.clone()));
        assert_eq!(auth::epoch_by_signers_hash(&env, signers_hash.clone()), Some(1));
        assert!(auth::is_latest(&env, &signers_hash));
    });
}

#[test]
fn initialize_with_multiple_signer_sets() {
    let env = Env::default();
    let domain_separator: BytesN<32> = BytesN::random(&env);
    let first = generate_signers_set(&env, randint(1, 10), domain_separator.clone());
    let second = generate_signers_set(&env, randint(1, 10), domain_separator.clone());

    let client = deploy_gateway(
        &env,
        &Address::generate(&env),
        &Address::generate(&env),
        &domain_separator,
        0,
        2,
        vec![&env, first.signers.clone(), second.signers.clone()],
    );

    env.as_contract(&client.address, || {
        assert_eq!(auth::epoch(&env), 2);
        assert_eq!(
            auth::epoch_by_signers_hash(&env, first.signers.hash(&env)),
            Some(1)
        );
        assert_eq!(
            auth::epoch_by_signers_hash(&env, second.signers.hash(&env)),
            Some(2)
        );
    });
}

#[test]
fn initialize_without_signers() {
    let env = Env::default();
    let domain_separator: BytesN<32> = BytesN::random(&env);

    let client = deploy_gateway(
        &env,
        &Address::generate(&env),
        &Address::generate(&env),
        &domain_separator,
        0,
        1,
        Vec::<WeightedSigners>::new(&env),
    );

    env.as_contract(&client.address, || {
        assert_eq!(auth::epoch(&env), 0);
        assert_eq!(auth::signers_hash_by_epoch(&env, 1), None);
    });
}

#[test]
fn validate_proof() {
    let (env, signers, client) = setup_env(randint(1, 10), randint(1, 10));

    let msg_hash: BytesN<32> = BytesN::random(&env);
    let proof = generate_proof(&env, msg_hash.clone(), signers);

    env.as_contract(&client.address, || {
        assert!(assert_ok!(auth::validate_proof(&env, &msg_hash, &proof)));
    });
}

#[test]
fn fail_validate_proof_unregistered_signers() {
    let (env, signers, client) = setup_env(randint(1, 10), randint(1, 10));

    let different_signers =
        generate_signers_set(&env, randint(1, 10), signers.domain_separator.clone());

    let msg_hash: BytesN<32> = BytesN::random(&env);
    let proof = generate_proof(&env, msg_hash.clone(), different_signers);

    env.as_contract(&client.address, || {
        assert_err!(
            auth::validate_proof(&env, &msg_hash, &proof),
            ContractError::InvalidSigners
        );
    });
}

#[test]
fn fail_validate_proof_modified_signer_set() {
    let (env, signers, client) = setup_env(randint(1, 10), randint(1, 10));

    let msg_hash: BytesN<32> = BytesN::random(&env);
    let mut proof = generate_proof(&env, msg_hash.clone(), signers);

    // changes the hash, so the set is no longer registered
    proof.signers.threshold = proof.signers.threshold.add(&U256::from_u32(&env, 1));

    env.as_contract(&client.address, || {
        assert_err!(
            auth::validate_proof(&env, &msg_hash, &proof),
            ContractError::InvalidSigners
        );
    });
}

#[test]
fn fail_validate_proof_wrong_data_hash() {
    let (env, signers, client) = setup_env(randint(1, 10), randint(1, 10));

    let msg_hash: BytesN<32> = BytesN::random(&env);
    let proof = generate_proof(&env, msg_hash, signers);

    let different_msg_hash: BytesN<32> = BytesN::random(&env);

    env.as_contract(&client.address, || {
        assert_err!(
            auth::validate_proof(&env, &different_msg_hash, &proof),
            ContractError::InvalidSignature
        );
    });
}

#[test]
fn fail_validate_proof_signed_for_other_domain() {
    let (env, mut signers, client) = setup_env(randint(1, 10), randint(1, 10));

    let msg_hash: BytesN<32> = BytesN::random(&env);
    signers.domain_separator = BytesN::random(&env);
    let proof = generate_proof(&env, msg_hash.clone(), signers);

    env.as_contract(&client.address, || {
        assert_err!(
            auth::validate_proof(&env, &msg_hash, &proof),
            ContractError::InvalidSignature
        );
    });
}

#[test]
fn fail_validate_proof_empty_signatures() {
    let (env, signers, client) = setup_env(randint(1, 10), randint(1, 10));

    let msg_hash: BytesN<32> = BytesN::random(&env);
    let mut proof = generate_proof(&env, msg_hash.clone(), signers);

    let mut unsigned = Vec::new(&env);
    for _ in proof.signatures.iter() {
        unsigned.push_back(ProofSignature::Unsigned);
    }
    proof.signatures = unsigned;

    env.as_contract(&client.address, || {
        assert_err!(
            auth::validate_proof(&env, &msg_hash, &proof),
            ContractError::LowSignaturesWeight
        );
    });
}

#[test]
fn fail_validate_proof_signature_count_mismatch() {
    let (env, signers, client) = setup_env(randint(1, 10), randint(1, 10));

    let msg_hash: BytesN<32> = BytesN::random(&env);
    let mut proof = generate_proof(&env, msg_hash.clone(), signers);

    proof.signatures.push_back(ProofSignature::Unsigned);

    env.as_contract(&client.address, || {
        assert_err!(
            auth::validate_proof(&env, &msg_hash, &proof),
            ContractError::LowSignaturesWeight
        );
    });
}

#[test]
fn fail_validate_proof_threshold_not_met() {
    let (env, signers, client) = setup_env_with_fixed_weights();

    let msg_hash: BytesN<32> = BytesN::random(&env);
    let mut proof = generate_proof(&env, msg_hash.clone(), signers);

    // weight 5 + 0 + 0 < 10
    proof.signatures.set(1, ProofSignature::Unsigned);
    proof.signatures.set(2, ProofSignature::Unsigned);

    env.as_contract(&client.address, || {
        assert_err!(
            auth::validate_proof(&env, &msg_hash, &proof),
            ContractError::LowSignaturesWeight
        );
    });
}

#[test]
fn validate_proof_ignores_signatures_after_quorum() {
    let (env, signers, client) = setup_env_with_fixed_weights();

    let msg_hash: BytesN<32> = BytesN::random(&env);
    let outsider = generate_signers_set(&env, 1, signers.domain_separator.clone());
    let digest = message_hash_to_sign(&env, &signers, &msg_hash);
    let mut proof = generate_proof(&env, msg_hash.clone(), signers);

    // 5 + 6 reaches the threshold, the last signature is never checked
    proof.signatures.set(
        2,
        ProofSignature::Signed(sign(&env, &digest, &outsider.signer_keys[0])),
    );

    env.as_contract(&client.address, || {
        assert!(assert_ok!(auth::validate_proof(&env, &msg_hash, &proof)));
    });
}

#[test]
fn fail_validate_proof_invalid_signature_before_quorum() {
    let (env, signers, client) = setup_env_with_fixed_weights();

    let msg_hash: BytesN<32> = BytesN::random(&env);
    let outsider = generate_signers_set(&env, 1, signers.domain_separator.clone());
    let digest = message_hash_to_sign(&env, &signers, &msg_hash);
    let mut proof = generate_proof(&env, msg_hash.clone(), signers);

    proof.signatures.set(1, ProofSignature::Unsigned);
    proof.signatures.set(
        2,
        ProofSignature::Signed(sign(&env, &digest, &outsider.signer_keys[0])),
    );

    env.as_contract(&client.address, || {
        assert_err!(
            auth::validate_proof(&env, &msg_hash, &proof),
            ContractError::InvalidSignature
        );
    });
}

#[test]
fn validate_proof_accepts_ethereum_recovery_ids() {
    let (env, signers, client) = setup_env(randint(1, 10), randint(1, 10));

    let msg_hash: BytesN<32> = BytesN::random(&env);
    let mut proof = generate_proof(&env, msg_hash.clone(), signers);

    let mut signatures = Vec::new(&env);
    for signature in proof.signatures.iter() {
        let ProofSignature::Signed(signature) = signature else {
            panic!("generated proofs are fully signed");
        };
        let mut bytes = signature.to_array();
        bytes[64] += 27;
        signatures.push_back(ProofSignature::Signed(BytesN::from_array(&env, &bytes)));
    }
    proof.signatures = signatures;

    env.as_contract(&client.address, || {
        assert!(assert_ok!(auth::validate_proof(&env, &msg_hash, &proof)));
    });
}

#[test]
fn fail_validate_proof_invalid_recovery_id() {
    let (env, signers, client) = setup_env(randint(1, 10), randint(1, 10));

    let msg_hash: BytesN<32> = BytesN::random(&env);
    let mut proof = generate_proof(&env, msg_hash.clone(), signers);

    let ProofSignature::Signed(signature) = proof.signatures.get_unchecked(0) else {
        panic!("generated proofs are fully signed");
    };
    let mut bytes = signature.to_array();
    bytes[64] = 5;
    proof
        .signatures
        .set(0, ProofSignature::Signed(BytesN::from_array(&env, &bytes)));

    env.as_contract(&client.address, || {
        assert_err!(
            auth::validate_proof(&env, &msg_hash, &proof),
            ContractError::InvalidSignature
        );
    });
}

/// Replaces the first signature of a fully signed proof with `f(signature)`.
fn tamper_first_signature(
    env: &Env,
    proof: &mut Proof,
    f: impl FnOnce([u8; 65]) -> [u8; 65],
) {
    let ProofSignature::Signed(signature) = proof.signatures.get_unchecked(0) else {
        panic!("generated proofs are fully signed");
    };
    proof.signatures.set(
        0,
        ProofSignature::Signed(BytesN::from_array(env, &f(signature.to_array()))),
    );
}

#[test]
fn fail_validate_proof_zeroed_signature() {
    let (env, signers, client) = setup_env(randint(1, 10), randint(1, 10));

    let msg_hash: BytesN<32> = BytesN::random(&env);
    let mut proof = generate_proof(&env, msg_hash.clone(), signers);
    tamper_first_signature(&env, &mut proof, |_| [0u8; 65]);

    env.as_contract(&client.address, || {
        assert_err!(
            auth::validate_proof(&env, &msg_hash, &proof),
            ContractError::InvalidSignature
        );
    });
}

#[test]
fn fail_validate_proof_scalar_above_group_order() {
    let (env, signers, client) = setup_env(randint(1, 10), randint(1, 10));

    let msg_hash: BytesN<32> = BytesN::random(&env);
    let mut proof = generate_proof(&env, msg_hash.clone(), signers);
    tamper_first_signature(&env, &mut proof, |mut bytes| {
        bytes[..32].fill(0xff);
        bytes
    });

    env.as_contract(&client.address, || {
        assert_err!(
            auth::validate_proof(&env, &msg_hash, &proof),
            ContractError::InvalidSignature
        );
    });
}

#[test]
fn fail_validate_proof_high_s_signature() {
    const ORDER: [u8; 32] = [
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xfe, 0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36,
        0x41, 0x41,
    ];

    let (env, signers, client) = setup_env(randint(1, 10), randint(1, 10));

    let msg_hash: BytesN<32> = BytesN::random(&env);
    let mut proof = generate_proof(&env, msg_hash.clone(), signers);

    // (r, n - s) with the flipped recovery id recovers the same key
    tamper_first_signature(&env, &mut proof, |mut bytes| {
        let mut borrow = 0u16;
        for i in (0..32).rev() {
            let diff = ORDER[i] as u16 + 0x100 - bytes[32 + i] as u16 - borrow;
            bytes[32 + i] = diff as u8;
            borrow = if diff < 0x100 { 1 } else { 0 };
        }
        bytes[64] ^= 1;
        bytes
    });

    env.as_contract(&client.address, || {
        assert_err!(
            auth::validate_proof(&env, &msg_hash, &proof),
            ContractError::InvalidSignature
        );
    });
}

#[test]
fn validate_proof_with_weights_beyond_u128() {
    let env = Env::default();
    let mut signers = generate_signers_set_with_weights(&env, &[1, 1], 1, BytesN::random(&env));

    let max = U256::from_u128(&env, u128::MAX);
    for i in 0..signers.signers.signers.len() {
        let mut signer = signers.signers.signers.get_unchecked(i);
        signer.weight = max.clone();
        signers.signers.signers.set(i, signer);
    }
    signers.signers.threshold = max.add(&U256::from_u32(&env, 1));

    let client = deploy_gateway(
        &env,
        &Address::generate(&env),
        &Address::generate(&env),
        &signers.domain_separator,
        0,
        1,
        vec![&env, signers.signers.clone()],
    );

    let msg_hash: BytesN<32> = BytesN::random(&env);
    let proof = generate_proof(&env, msg_hash.clone(), signers);

    env.as_contract(&client.address, || {
        assert!(assert_ok!(auth::validate_proof(&env, &msg_hash, &proof)));
    });
}

#[test]
fn rotate_signers() {
    let (env, signers, client) = setup_env(1, randint(1, 10));

    let msg_hash: BytesN<32> = BytesN::random(&env);
    let new_signers = generate_signers_set(&env, randint(1, 10), signers.domain_separator.clone());

    testutils::rotate_signers(&env, &client.address, new_signers.clone());

    let proof = generate_proof(&env, msg_hash.clone(), new_signers.clone());
    let new_signers_hash = new_signers.signers.hash(&env);

    env.as_contract(&client.address, || {
        assert!(assert_ok!(auth::validate_proof(&env, &msg_hash, &proof)));
        assert_eq!(auth::epoch(&env), 2);
        assert_eq!(auth::signers_hash_by_epoch(&env, 2), Some(new_signers_hash.clone()));
        assert_eq!(auth::epoch_by_signers_hash(&env, new_signers_hash), Some(2));
    });
}

#[test]
fn rotate_signers_records_timestamp() {
    let (env, signers, client) = setup_env(1, randint(1, 10));

    env.ledger().with_mut(|li| li.timestamp = 1_000);

    let new_signers = generate_signers_set(&env, randint(1, 10), signers.domain_separator);
    testutils::rotate_signers(&env, &client.address, new_signers);

    env.as_contract(&client.address, || {
        assert_eq!(auth::last_rotation_timestamp(&env), 1_000);
    });
}

#[test]
fn rotate_signers_fail_empty_signers() {
    let (env, _, client) = setup_env(1, randint(1, 10));

    let empty_signers = WeightedSigners {
        signers: Vec::<WeightedSigner>::new(&env),
        threshold: U256::from_u32(&env, 0),
        nonce: BytesN::random(&env),
    };

    env.as_contract(&client.address, || {
        assert_err!(
            auth::rotate_signers(&env, &empty_signers, false),
            ContractError::InvalidSigners
        );
    });
}

#[test]
fn rotate_signers_fail_zero_weight() {
    let (env, _, client) = setup_env(1, randint(1, 10));

    let mut new_signers = generate_signers_set(&env, randint(1, 10), BytesN::random(&env));

    let last_index = new_signers.signers.signers.len() - 1;
    let mut last_signer = new_signers.signers.signers.get_unchecked(last_index);
    last_signer.weight = U256::from_u32(&env, 0);
    new_signers.signers.signers.set(last_index, last_signer);

    env.as_contract(&client.address, || {
        assert_err!(
            auth::rotate_signers(&env, &new_signers.signers, false),
            ContractError::InvalidWeights
        );
    });
}

#[test]
fn rotate_signers_fail_total_weight_overflow() {
    let (env, _, client) = setup_env(1, randint(1, 10));

    let mut new_signers = generate_signers_set_with_weights(&env, &[1, 1], 1, BytesN::random(&env));

    let max = U256::from_parts(&env, u64::MAX, u64::MAX, u64::MAX, u64::MAX);
    for i in 0..new_signers.signers.signers.len() {
        let mut signer = new_signers.signers.signers.get_unchecked(i);
        signer.weight = max.clone();
        new_signers.signers.signers.set(i, signer);
    }

    env.as_contract(&client.address, || {
        assert_err!(
            auth::rotate_signers(&env, &new_signers.signers, false),
            ContractError::InvalidWeights
        );
        assert_eq!(auth::epoch(&env), 1);
    });
}

#[test]
fn rotate_signers_fail_unsorted_signers() {
    let (env, _, client) = setup_env(1, randint(1, 10));

    let mut new_signers = generate_signers_set(&env, randint(2, 10), BytesN::random(&env));

    let first = new_signers.signers.signers.get_unchecked(0);
    let second = new_signers.signers.signers.get_unchecked(1);
    new_signers.signers.signers.set(0, second);
    new_signers.signers.signers.set(1, first);

    env.as_contract(&client.address, || {
        assert_err!(
            auth::rotate_signers(&env, &new_signers.signers, false),
            ContractError::InvalidWeights
        );
    });
}

#[test]
fn rotate_signers_fail_duplicated_signer_key() {
    let (env, _, client) = setup_env(1, randint(1, 10));

    let mut new_signers = generate_signers_set(&env, randint(2, 10), BytesN::random(&env));

    let first = new_signers.signers.signers.get_unchecked(0);
    new_signers.signers.signers.set(1, first);

    env.as_contract(&client.address, || {
        assert_err!(
            auth::rotate_signers(&env, &new_signers.signers, false),
            ContractError::InvalidWeights
        );
    });
}

#[test]
fn rotate_signers_fail_zero_threshold() {
    let (env, _, client) = setup_env(1, randint(1, 10));

    let mut new_signers = generate_signers_set(&env, randint(1, 10), BytesN::random(&env));
    new_signers.signers.threshold = U256::from_u32(&env, 0);

    env.as_contract(&client.address, || {
        assert_err!(
            auth::rotate_signers(&env, &new_signers.signers, false),
            ContractError::InvalidThreshold
        );
    });
}

#[test]
fn rotate_signers_fail_threshold_above_total_weight() {
    let (env, _, client) = setup_env(1, randint(1, 10));

    let mut new_signers =
        generate_signers_set_with_weights(&env, &[1, 2, 3], 6, BytesN::random(&env));
    new_signers.signers.threshold = U256::from_u32(&env, 7);

    env.as_contract(&client.address, || {
        assert_err!(
            auth::rotate_signers(&env, &new_signers.signers, false),
            ContractError::InvalidThreshold
        );
    });
}

#[test]
fn rotate_signers_fail_duplicated_signers() {
    let (env, signers, client) = setup_env(1, randint(1, 10));

    let new_signers = generate_signers_set(&env, randint(1, 10), signers.domain_separator.clone());
    testutils::rotate_signers(&env, &client.address, new_signers);

    // the genesis set is no longer the latest, but stays registered
    env.as_contract(&client.address, || {
        assert_err!(
            auth::rotate_signers(&env, &signers.signers, false),
            ContractError::DuplicateSigners
        );
    });
}

#[test]
fn rotate_signers_fail_insufficient_rotation_delay() {
    let env = Env::default();
    let signers = generate_signers_set(&env, randint(1, 10), BytesN::random(&env));
    let minimum_rotation_delay = 100;

    env.ledger().with_mut(|li| li.timestamp = 1_000);

    let client = deploy_gateway(
        &env,
        &Address::generate(&env),
        &Address::generate(&env),
        &signers.domain_separator,
        minimum_rotation_delay,
        1,
        vec![&env, signers.signers.clone()],
    );

    let new_signers = generate_signers_set(&env, randint(1, 10), signers.domain_separator.clone());

    env.ledger().with_mut(|li| li.timestamp = 1_099);

    env.as_contract(&client.address, || {
        assert_err!(
            auth::rotate_signers(&env, &new_signers.signers, true),
            ContractError::InsufficientRotationDelay
        );
    });

    env.ledger().with_mut(|li| li.timestamp = 1_100);

    env.as_contract(&client.address, || {
        assert_ok!(auth::rotate_signers(&env, &new_signers.signers, true));
        assert_eq!(auth::epoch(&env), 2);
    });
}

#[test]
fn previous_signers_stay_valid_within_retention() {
    let previous_signers_retention = 2;
    let (env, signers, client) = setup_env(previous_signers_retention, randint(1, 10));

    let msg_hash: BytesN<32> = BytesN::random(&env);
    let proof = generate_proof(&env, msg_hash.clone(), signers.clone());

    let second = generate_signers_set(&env, randint(1, 10), signers.domain_separator.clone());
    testutils::rotate_signers(&env, &client.address, second);

    // epoch 2 - 1 < 2
    env.as_contract(&client.address, || {
        let is_latest = assert_ok!(auth::validate_proof(&env, &msg_hash, &proof));
        assert!(!is_latest);
    });

    let third = generate_signers_set(&env, randint(1, 10), signers.domain_separator.clone());
    testutils::rotate_signers(&env, &client.address, third);

    // epoch 3 - 1 >= 2
    env.as_contract(&client.address, || {
        assert!(!auth::is_valid_for_verification(
            &env,
            &signers.signers.hash(&env)
        ));
        assert_err!(
            auth::validate_proof(&env, &msg_hash, &proof),
            ContractError::InvalidSigners
        );
    });
}

#[test]
fn epoch_history_is_consistent_after_rotations() {
    let (env, signers, client) = setup_env(10, randint(1, 10));
    let rotations = randint(1, 5) as u64;

    let mut hashes = std::vec![signers.signers.hash(&env)];
    for _ in 0..rotations {
        let new_signers =
            generate_signers_set(&env, randint(1, 10), signers.domain_separator.clone());
        hashes.push(new_signers.signers.hash(&env));
        testutils::rotate_signers(&env, &client.address, new_signers);
    }

    env.as_contract(&client.address, || {
        assert_eq!(auth::epoch(&env), 1 + rotations);

        for (i, hash) in hashes.iter().enumerate() {
            let epoch = i as u64 + 1;
            assert_eq!(auth::signers_hash_by_epoch(&env, epoch), Some(hash.clone()));
            assert_eq!(auth::epoch_by_signers_hash(&env, hash.clone()), Some(epoch));
        }
    });
}
