use crate::auth;
use crate::error::ContractError;
use crate::event::{
    ContractCalledEvent, MessageApprovedEvent, MessageExecutedEvent, OperatorshipTransferredEvent,
};
use crate::interface::MultisigGatewayInterface;
use crate::messaging_interface::MultisigGatewayMessagingInterface;
use crate::storage_types::{DataKey, MessageApprovalValue};
use crate::types::{self, Message, Proof, WeightedSigners};
use gateway_std::address::AddressExt;
use gateway_std::events::Event;
use gateway_std::ttl::{extend_instance_ttl, extend_persistent_ttl};
use gateway_std::{ensure, interfaces, ownable};
use soroban_sdk::{contract, contractimpl, log, Address, Bytes, BytesN, Env, String, Vec};

#[ownable]
#[contract]
pub struct MultisigGateway;

#[contractimpl]
impl MultisigGateway {
    /// Initialize the gateway.
    ///
    /// `initial_signers` are registered at epochs `1..=n` in order, without rotation delay.
    /// Pass the zero address as `operator` to deploy without one.
    pub fn __constructor(
        env: Env,
        owner: Address,
        operator: Address,
        domain_separator: BytesN<32>,
        minimum_rotation_delay: u64,
        previous_signers_retention: u64,
        initial_signers: Vec<WeightedSigners>,
    ) -> Result<(), ContractError> {
        interfaces::set_owner(&env, &owner);
        env.storage().instance().set(&DataKey::Operator, &operator);

        auth::initialize_auth(
            env,
            domain_separator,
            minimum_rotation_delay,
            previous_signers_retention,
            initial_signers,
        )
    }
}

#[contractimpl]
impl MultisigGatewayMessagingInterface for MultisigGateway {
    fn call_contract(
        env: Env,
        caller: Address,
        destination_chain: String,
        destination_address: String,
        payload: Bytes,
    ) {
        caller.require_auth();

        let payload_hash = env.crypto().keccak256(&payload).into();

        ContractCalledEvent {
            caller,
            destination_chain,
            destination_address,
            payload_hash,
            payload,
        }
        .emit(&env);
    }

    fn is_message_approved(
        env: Env,
        source_chain: String,
        message_id: String,
        source_address: String,
        contract_address: Address,
        payload_hash: BytesN<32>,
    ) -> bool {
        let message = Message {
            source_chain,
            message_id,
            source_address,
            contract_address,
            payload_hash,
        };

        Self::message_approval(&env, message.command_id(&env))
            == MessageApprovalValue::Approved(message.hash(&env))
    }

    fn is_message_executed(env: Env, source_chain: String, message_id: String) -> bool {
        let command_id = types::command_id(&env, &source_chain, &message_id);

        Self::message_approval(&env, command_id) == MessageApprovalValue::Executed
    }

    fn validate_message(
        env: Env,
        caller: Address,
        source_chain: String,
        message_id: String,
        source_address: String,
        payload_hash: BytesN<32>,
    ) -> bool {
        caller.require_auth();

        let message = Message {
            source_chain,
            message_id,
            source_address,
            contract_address: caller,
            payload_hash,
        };
        let command_id = message.command_id(&env);

        let approved = Self::message_approval(&env, command_id.clone())
            == MessageApprovalValue::Approved(message.hash(&env));

        if approved {
            Self::set_message_approval(&env, command_id.clone(), &MessageApprovalValue::Executed);

            MessageExecutedEvent {
                command_id,
                message,
            }
            .emit(&env);
        }

        approved
    }
}

#[contractimpl]
impl MultisigGatewayInterface for MultisigGateway {
    fn approve_messages(
        env: Env,
        messages: Vec<Message>,
        proof: Proof,
    ) -> Result<(), ContractError> {
        ensure!(!messages.is_empty(), ContractError::InvalidMessages);

        let data_hash = types::messages_approval_hash(&env, &messages);

        auth::validate_proof(&env, &data_hash, &proof)?;

        for message in messages.into_iter() {
            let command_id = message.command_id(&env);

            // Re-submitted messages keep their current state
            if Self::message_approval(&env, command_id.clone()) != MessageApprovalValue::NotApproved
            {
                log!(&env, "message already approved", command_id);
                continue;
            }

            Self::set_message_approval(
                &env,
                command_id.clone(),
                &MessageApprovalValue::Approved(message.hash(&env)),
            );

            MessageApprovedEvent {
                command_id,
                message,
            }
            .emit(&env);
        }

        extend_instance_ttl(&env);

        Ok(())
    }

    fn rotate_signers(
        env: Env,
        signers: WeightedSigners,
        proof: Proof,
        bypass_rotation_delay: bool,
    ) -> Result<(), ContractError> {
        if bypass_rotation_delay {
            let operator = Self::operator(&env);
            ensure!(!operator.is_zero(), ContractError::InvalidSender);
            operator.require_auth();
        }

        let data_hash = signers.signers_rotation_hash(&env);

        let is_latest_signers = auth::validate_proof(&env, &data_hash, &proof)?;

        ensure!(
            bypass_rotation_delay || is_latest_signers,
            ContractError::NotLatestSigners
        );

        auth::rotate_signers(&env, &signers, !bypass_rotation_delay)?;

        extend_instance_ttl(&env);

        Ok(())
    }

    fn transfer_operatorship(
        env: Env,
        caller: Address,
        new_operator: Address,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        let operator = Self::operator(&env);

        ensure!(
            caller == operator || interfaces::is_owner(&env, &caller),
            ContractError::InvalidSender
        );
        ensure!(!new_operator.is_zero(), ContractError::InvalidOperator);

        env.storage()
            .instance()
            .set(&DataKey::Operator, &new_operator);

        extend_instance_ttl(&env);

        OperatorshipTransferredEvent {
            previous_operator: operator,
            new_operator,
        }
        .emit(&env);

        Ok(())
    }

    fn operator(env: &Env) -> Address {
        env.storage()
            .instance()
            .get(&DataKey::Operator)
            .unwrap_or_else(|| Address::zero(env))
    }

    fn epoch(env: &Env) -> u64 {
        auth::epoch(env)
    }

    fn epoch_by_signers_hash(env: &Env, signers_hash: BytesN<32>) -> Option<u64> {
        auth::epoch_by_signers_hash(env, signers_hash)
    }

    fn signers_hash_by_epoch(env: &Env, epoch: u64) -> Option<BytesN<32>> {
        auth::signers_hash_by_epoch(env, epoch)
    }

    fn validate_proof(env: &Env, data_hash: BytesN<32>, proof: Proof) -> Result<bool, ContractError> {
        auth::validate_proof(env, &data_hash, &proof)
    }

    fn domain_separator(env: &Env) -> BytesN<32> {
        auth::domain_separator(env)
    }

    fn minimum_rotation_delay(env: &Env) -> u64 {
        auth::minimum_rotation_delay(env)
    }

    fn previous_signers_retention(env: &Env) -> u64 {
        auth::previous_signers_retention(env)
    }

    fn last_rotation_timestamp(env: &Env) -> u64 {
        auth::last_rotation_timestamp(env)
    }
}

impl MultisigGateway {
    fn message_approval(env: &Env, command_id: BytesN<32>) -> MessageApprovalValue {
        env.storage()
            .persistent()
            .get(&DataKey::MessageApproval(command_id))
            .unwrap_or(MessageApprovalValue::NotApproved)
    }

    fn set_message_approval(env: &Env, command_id: BytesN<32>, value: &MessageApprovalValue) {
        let key = DataKey::MessageApproval(command_id);

        env.storage().persistent().set(&key, value);
        extend_persistent_ttl(env, &key);
    }
}
