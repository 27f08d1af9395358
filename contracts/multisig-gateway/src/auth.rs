use gateway_std::ensure;
use gateway_std::events::Event;
use gateway_std::ttl::extend_persistent_ttl;
use soroban_sdk::{crypto::Hash, Bytes, BytesN, Env, Vec, U256};

use crate::error::ContractError;
use crate::event::SignersRotatedEvent;
use crate::storage_types::DataKey;
use crate::types::{Proof, ProofSignature, WeightedSigners};

/// Order of the secp256k1 group, big-endian.
const SECP256K1_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// `SECP256K1_ORDER / 2`, the largest accepted `s`.
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

pub fn initialize_auth(
    env: Env,
    domain_separator: BytesN<32>,
    minimum_rotation_delay: u64,
    previous_signers_retention: u64,
    initial_signers: Vec<WeightedSigners>,
) -> Result<(), ContractError> {
    env.storage().instance().set(&DataKey::Epoch, &0_u64);

    env.storage().instance().set(
        &DataKey::PreviousSignersRetention,
        &previous_signers_retention,
    );

    env.storage()
        .instance()
        .set(&DataKey::DomainSeparator, &domain_separator);

    env.storage()
        .instance()
        .set(&DataKey::MinimumRotationDelay, &minimum_rotation_delay);

    for signers in initial_signers.into_iter() {
        rotate_signers(&env, &signers, false)?;
    }

    Ok(())
}

/// Verifies `proof` over `data_hash` and returns whether it was signed by the latest signer set.
pub fn validate_proof(
    env: &Env,
    data_hash: &BytesN<32>,
    proof: &Proof,
) -> Result<bool, ContractError> {
    let signers_hash = proof.signers_hash(env);

    ensure!(
        is_valid_for_verification(env, &signers_hash),
        ContractError::InvalidSigners
    );

    let msg_hash = message_hash_to_sign(env, signers_hash.clone(), data_hash.clone());

    validate_signatures(env, &msg_hash, proof)?;

    Ok(is_latest(env, &signers_hash))
}

/// Registers `new_signers` as the signer set of the next epoch.
///
/// Only the structural and duplicate checks apply here; the proof and the caller's
/// right to rotate are checked by the entry point.
pub fn rotate_signers(
    env: &Env,
    new_signers: &WeightedSigners,
    enforce_rotation_delay: bool,
) -> Result<(), ContractError> {
    if enforce_rotation_delay {
        ensure_rotation_delay(env)?;
    }

    validate_signers(env, new_signers)?;

    let new_signers_hash = new_signers.hash(env);

    ensure!(
        epoch_by_signers_hash(env, new_signers_hash.clone()).is_none(),
        ContractError::DuplicateSigners
    );

    let new_epoch: u64 = epoch(env) + 1;

    env.storage().instance().set(&DataKey::Epoch, &new_epoch);

    let hash_key = DataKey::SignersHashByEpoch(new_epoch);
    env.storage().persistent().set(&hash_key, &new_signers_hash);
    extend_persistent_ttl(env, &hash_key);

    let epoch_key = DataKey::EpochBySignersHash(new_signers_hash.clone());
    env.storage().persistent().set(&epoch_key, &new_epoch);
    extend_persistent_ttl(env, &epoch_key);

    env.storage()
        .instance()
        .set(&DataKey::LastRotationTimestamp, &env.ledger().timestamp());

    SignersRotatedEvent {
        epoch: new_epoch,
        signers_hash: new_signers_hash,
        signers: new_signers.clone(),
    }
    .emit(env);

    Ok(())
}

pub fn epoch(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::Epoch)
        .unwrap_or(0)
}

pub fn epoch_by_signers_hash(env: &Env, signers_hash: BytesN<32>) -> Option<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::EpochBySignersHash(signers_hash))
}

pub fn signers_hash_by_epoch(env: &Env, epoch: u64) -> Option<BytesN<32>> {
    env.storage()
        .persistent()
        .get(&DataKey::SignersHashByEpoch(epoch))
}

pub fn is_latest(env: &Env, signers_hash: &BytesN<32>) -> bool {
    epoch_by_signers_hash(env, signers_hash.clone()) == Some(epoch(env))
}

/// A signer set registered at epoch `e` verifies while `current_epoch - e < retention`.
pub fn is_valid_for_verification(env: &Env, signers_hash: &BytesN<32>) -> bool {
    let Some(signers_epoch) = epoch_by_signers_hash(env, signers_hash.clone()) else {
        return false;
    };

    epoch(env) - signers_epoch < previous_signers_retention(env)
}

pub fn domain_separator(env: &Env) -> BytesN<32> {
    env.storage()
        .instance()
        .get(&DataKey::DomainSeparator)
        .expect("domain separator not found")
}

pub fn minimum_rotation_delay(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::MinimumRotationDelay)
        .unwrap_or(0)
}

pub fn previous_signers_retention(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::PreviousSignersRetention)
        .unwrap_or(0)
}

pub fn last_rotation_timestamp(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::LastRotationTimestamp)
        .unwrap_or(0)
}

pub fn message_hash_to_sign(
    env: &Env,
    signers_hash: BytesN<32>,
    data_hash: BytesN<32>,
) -> Hash<32> {
    let mut msg: Bytes = domain_separator(env).into();
    msg.extend_from_array(&signers_hash.to_array());
    msg.extend_from_array(&data_hash.to_array());

    env.crypto().keccak256(&msg)
}

fn ensure_rotation_delay(env: &Env) -> Result<(), ContractError> {
    let elapsed = env
        .ledger()
        .timestamp()
        .saturating_sub(last_rotation_timestamp(env));

    ensure!(
        elapsed >= minimum_rotation_delay(env),
        ContractError::InsufficientRotationDelay
    );

    Ok(())
}

/// Accumulates the weight of the signed positions until the threshold is met.
/// Signatures after that point are not checked.
fn validate_signatures(
    env: &Env,
    msg_hash: &Hash<32>,
    proof: &Proof,
) -> Result<(), ContractError> {
    let signers = &proof.signers;

    ensure!(
        proof.signatures.len() == signers.signers.len(),
        ContractError::LowSignaturesWeight
    );

    let mut total_weight = U256::from_u32(env, 0);

    for (signer, signature) in signers.signers.iter().zip(proof.signatures.iter()) {
        let ProofSignature::Signed(signature) = signature else {
            continue;
        };

        ensure!(
            recover_signer(env, msg_hash, &signature)? == signer.signer,
            ContractError::InvalidSignature
        );

        total_weight = total_weight.add(&signer.weight);

        if total_weight >= signers.threshold {
            return Ok(());
        }
    }

    Err(ContractError::LowSignaturesWeight)
}

/// Recovers the compressed public key that produced `signature` over `msg_hash`.
fn recover_signer(
    env: &Env,
    msg_hash: &Hash<32>,
    signature: &BytesN<65>,
) -> Result<BytesN<33>, ContractError> {
    let [rs @ .., v] = signature.to_array();

    // Ethereum style recovery ids are offset by 27
    let recovery_id = match v {
        0 | 1 => v,
        27 | 28 => v - 27,
        _ => return Err(ContractError::InvalidSignature),
    };

    // The host traps on scalars outside the group and on high-s signatures
    let (r, s) = rs.split_at(32);
    ensure!(
        is_nonzero(r) && r < &SECP256K1_ORDER[..],
        ContractError::InvalidSignature
    );
    ensure!(
        is_nonzero(s) && s <= &SECP256K1_HALF_ORDER[..],
        ContractError::InvalidSignature
    );

    let public_key = env
        .crypto()
        .secp256k1_recover(msg_hash, &BytesN::from_array(env, &rs), recovery_id.into())
        .to_array();

    // SEC1 compression: parity of y selects the prefix, x follows
    let mut compressed = [0u8; 33];
    compressed[0] = 0x02 | (public_key[64] & 1);
    compressed[1..].copy_from_slice(&public_key[1..33]);

    Ok(BytesN::from_array(env, &compressed))
}

fn is_nonzero(scalar: &[u8]) -> bool {
    scalar.iter().any(|byte| *byte != 0)
}

/// Checks that the signer keys are strictly ascending, weights are non-zero,
/// and the threshold is non-zero and reachable.
fn validate_signers(env: &Env, weighted_signers: &WeightedSigners) -> Result<(), ContractError> {
    ensure!(
        !weighted_signers.signers.is_empty(),
        ContractError::InvalidSigners
    );

    let zero = U256::from_u32(env, 0);
    let mut previous_signer: Option<BytesN<33>> = None;
    let mut total_weight = zero.clone();
    let max_weight = U256::from_parts(env, u64::MAX, u64::MAX, u64::MAX, u64::MAX);

    for signer in weighted_signers.signers.iter() {
        ensure!(
            previous_signer.map_or(true, |previous| previous < signer.signer),
            ContractError::InvalidWeights
        );

        ensure!(signer.weight != zero, ContractError::InvalidWeights);
        ensure!(
            signer.weight <= max_weight.sub(&total_weight),
            ContractError::InvalidWeights
        );

        total_weight = total_weight.add(&signer.weight);
        previous_signer = Some(signer.signer);
    }

    let threshold = &weighted_signers.threshold;
    ensure!(
        *threshold != zero && total_weight >= *threshold,
        ContractError::InvalidThreshold
    );

    Ok(())
}
