#![cfg(any(test, feature = "testutils"))]
extern crate std;

use crate::auth;
use crate::contract::{MultisigGateway, MultisigGatewayClient};
use crate::types::{
    self, Message, Proof, ProofSignature, WeightedSigner, WeightedSigners,
};
use gateway_std::{assert_ok, traits::IntoVec};
use rand::Rng;
use secp256k1::{Message as SecpMessage, PublicKey, Secp256k1, SecretKey};
use soroban_sdk::{
    testutils::{Address as _, BytesN as _},
    vec, Address, Bytes, BytesN, Env, String, Vec, U256,
};

const SOURCE_CHAIN: &str = "ethereum";
const SOURCE_ADDRESS: &str = "0x4EFE356BEDeCC817cb89B4E9b796dB8bC188DC59";

#[derive(Clone, Debug)]
pub struct TestSignerSet {
    /// Secret keys aligned with `signers.signers`
    pub signer_keys: std::vec::Vec<SecretKey>,
    pub signers: WeightedSigners,
    pub domain_separator: BytesN<32>,
}

pub fn randint(a: u32, b: u32) -> u32 {
    rand::thread_rng().gen_range(a..b)
}

/// Random signer set with weights in `1..10` and a random reachable threshold.
pub fn generate_signers_set(
    env: &Env,
    num_signers: u32,
    domain_separator: BytesN<32>,
) -> TestSignerSet {
    let weights: std::vec::Vec<u32> = (0..num_signers).map(|_| randint(1, 10)).collect();
    let total_weight: u32 = weights.iter().sum();
    let threshold = randint(1, total_weight + 1);

    generate_signers_set_with_weights(env, &weights, threshold, domain_separator)
}

/// Signer set whose `i`-th signer in ascending key order carries `weights[i]`.
pub fn generate_signers_set_with_weights(
    env: &Env,
    weights: &[u32],
    threshold: u32,
    domain_separator: BytesN<32>,
) -> TestSignerSet {
    let secp = Secp256k1::new();
    let mut rng = rand::thread_rng();

    let mut keypairs: std::vec::Vec<(SecretKey, [u8; 33])> = weights
        .iter()
        .map(|_| {
            let sk = SecretKey::new(&mut rng);
            let pk = PublicKey::from_secret_key(&secp, &sk).serialize();
            (sk, pk)
        })
        .collect();

    keypairs.sort_by(|(_, pk1), (_, pk2)| pk1.cmp(pk2));

    let signers: std::vec::Vec<WeightedSigner> = keypairs
        .iter()
        .zip(weights)
        .map(|((_, pk), weight)| WeightedSigner {
            signer: BytesN::from_array(env, pk),
            weight: U256::from_u32(env, *weight),
        })
        .collect();

    TestSignerSet {
        signer_keys: keypairs.into_iter().map(|(sk, _)| sk).collect(),
        signers: WeightedSigners {
            signers: signers.into_vec(env),
            threshold: U256::from_u32(env, threshold),
            nonce: BytesN::random(env),
        },
        domain_separator,
    }
}

/// Digest the signers of `signers` sign for `data_hash`.
pub fn message_hash_to_sign(
    env: &Env,
    signers: &TestSignerSet,
    data_hash: &BytesN<32>,
) -> BytesN<32> {
    let mut msg: Bytes = signers.domain_separator.clone().into();
    msg.extend_from_array(&signers.signers.hash(env).to_array());
    msg.extend_from_array(&data_hash.to_array());

    env.crypto().keccak256(&msg).into()
}

/// Recoverable signature `r || s || v` over `digest`.
pub fn sign(env: &Env, digest: &BytesN<32>, signer_key: &SecretKey) -> BytesN<65> {
    let secp = Secp256k1::new();
    let msg = SecpMessage::from_digest_slice(&digest.to_array()).unwrap();

    let (recovery_id, signature) = secp
        .sign_ecdsa_recoverable(&msg, signer_key)
        .serialize_compact();

    let mut bytes = [0u8; 65];
    bytes[..64].copy_from_slice(&signature);
    bytes[64] = recovery_id.to_i32() as u8;

    BytesN::from_array(env, &bytes)
}

/// Proof over `data_hash` carrying a signature from every signer.
pub fn generate_proof(env: &Env, data_hash: BytesN<32>, signers: TestSignerSet) -> Proof {
    let digest = message_hash_to_sign(env, &signers, &data_hash);

    let signatures: std::vec::Vec<ProofSignature> = signers
        .signer_keys
        .iter()
        .map(|signer_key| ProofSignature::Signed(sign(env, &digest, signer_key)))
        .collect();

    Proof {
        signers: signers.signers,
        signatures: signatures.into_vec(env),
    }
}

pub fn generate_test_message(env: &Env) -> (Message, Bytes) {
    generate_test_message_with_destination(env, Address::generate(env))
}

pub fn generate_test_message_with_destination(
    env: &Env,
    contract_address: Address,
) -> (Message, Bytes) {
    let mut rng = rand::thread_rng();
    let len = rng.gen_range(0..20);
    let mut payload = std::vec![0u8; len];
    rng.fill(&mut payload[..]);

    let payload = Bytes::from_slice(env, &payload[..]);

    (
        Message {
            source_chain: String::from_str(env, SOURCE_CHAIN),
            message_id: String::from_str(
                env,
                &std::format!("0x{}-{}", hex::encode(rng.gen::<[u8; 32]>()), rng.gen::<u8>()),
            ),
            source_address: String::from_str(env, SOURCE_ADDRESS),
            contract_address,
            payload_hash: env.crypto().keccak256(&payload).into(),
        },
        payload,
    )
}

pub fn get_approve_hash(env: &Env, messages: Vec<Message>) -> BytesN<32> {
    types::messages_approval_hash(env, &messages)
}

pub fn deploy_gateway<'a>(
    env: &Env,
    owner: &Address,
    operator: &Address,
    domain_separator: &BytesN<32>,
    minimum_rotation_delay: u64,
    previous_signers_retention: u64,
    initial_signers: Vec<WeightedSigners>,
) -> MultisigGatewayClient<'a> {
    let gateway_id = env.register(
        MultisigGateway,
        (
            owner.clone(),
            operator.clone(),
            domain_separator.clone(),
            minimum_rotation_delay,
            previous_signers_retention,
            initial_signers,
        ),
    );

    MultisigGatewayClient::new(env, &gateway_id)
}

/// Deploys a gateway with a random genesis signer set and no rotation delay.
pub fn setup_gateway<'a>(
    env: &Env,
    previous_signers_retention: u32,
    num_signers: u32,
) -> (TestSignerSet, MultisigGatewayClient<'a>) {
    let owner = Address::generate(env);
    let operator = Address::generate(env);
    let signers = generate_signers_set(env, num_signers, BytesN::random(env));

    let client = deploy_gateway(
        env,
        &owner,
        &operator,
        &signers.domain_separator,
        0,
        previous_signers_retention as u64,
        vec![env, signers.signers.clone()],
    );

    (signers, client)
}

/// Registers `new_signers` directly in the gateway's storage, skipping proof and delay checks.
pub fn rotate_signers(env: &Env, contract_id: &Address, new_signers: TestSignerSet) {
    env.as_contract(contract_id, || {
        assert_ok!(auth::rotate_signers(env, &new_signers.signers, false));
    });
}
