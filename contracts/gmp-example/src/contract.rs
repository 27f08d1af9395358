use crate::event::ExecutedEvent;
use crate::storage_types::DataKey;
use gateway_std::events::Event;
use gateway_std::ttl::extend_instance_ttl;
use multisig_gateway::executable::{ExecutableError, ExecutableInterface};
use multisig_gateway::MultisigGatewayMessagingClient;
use soroban_sdk::{contract, contractimpl, Address, Bytes, Env, String};

#[contract]
pub struct GmpExample;

#[contractimpl]
impl ExecutableInterface for GmpExample {
    fn gateway(env: &Env) -> Address {
        env.storage()
            .instance()
            .get(&DataKey::Gateway)
            .expect("gateway not found")
    }

    fn execute(
        env: Env,
        source_chain: String,
        message_id: String,
        source_address: String,
        payload: Bytes,
    ) -> Result<(), ExecutableError> {
        Self::validate_message(&env, &source_chain, &message_id, &source_address, &payload)?;

        ExecutedEvent {
            source_chain,
            message_id,
            source_address,
            payload,
        }
        .emit(&env);

        Ok(())
    }
}

#[contractimpl]
impl GmpExample {
    pub fn __constructor(env: Env, gateway: Address) {
        env.storage().instance().set(&DataKey::Gateway, &gateway);
    }

    /// Send `message` to `destination_address` on `destination_chain` through the gateway.
    pub fn send(
        env: Env,
        caller: Address,
        destination_chain: String,
        destination_address: String,
        message: Bytes,
    ) {
        caller.require_auth();

        let gateway = MultisigGatewayMessagingClient::new(&env, &Self::gateway(&env));

        gateway.call_contract(
            &env.current_contract_address(),
            &destination_chain,
            &destination_address,
            &message,
        );

        extend_instance_ttl(&env);
    }
}
