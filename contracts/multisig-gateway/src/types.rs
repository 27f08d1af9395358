use soroban_sdk::{contracttype, xdr::ToXdr, Address, BytesN, Env, String, Vec, U256};

/// Domain tags prepended to the payload of every command signed by the signer set.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CommandType {
    ApproveMessages,
    RotateSigners,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Message {
    pub source_chain: String,
    pub message_id: String,
    pub source_address: String,
    pub contract_address: Address,
    pub payload_hash: BytesN<32>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WeightedSigner {
    pub signer: BytesN<33>, // compressed secp256k1 public key
    pub weight: U256,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WeightedSigners {
    pub signers: Vec<WeightedSigner>,
    pub threshold: U256,
    pub nonce: BytesN<32>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProofSignature {
    /// Recoverable ECDSA signature `r || s || v`
    Signed(BytesN<65>),
    Unsigned,
}

/// Signatures are aligned by position with `signers.signers`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Proof {
    pub signers: WeightedSigners,
    pub signatures: Vec<ProofSignature>,
}

/// Key of a message in the approval ledger.
pub fn command_id(env: &Env, source_chain: &String, message_id: &String) -> BytesN<32> {
    env.crypto()
        .keccak256(&(source_chain.clone(), message_id.clone()).to_xdr(env))
        .into()
}

/// Data hash the signers have to sign to approve `messages`.
pub fn messages_approval_hash(env: &Env, messages: &Vec<Message>) -> BytesN<32> {
    env.crypto()
        .keccak256(&(CommandType::ApproveMessages, messages.clone()).to_xdr(env))
        .into()
}

impl Message {
    pub fn command_id(&self, env: &Env) -> BytesN<32> {
        command_id(env, &self.source_chain, &self.message_id)
    }

    pub fn hash(&self, env: &Env) -> BytesN<32> {
        env.crypto().keccak256(&self.clone().to_xdr(env)).into()
    }
}

impl WeightedSigners {
    pub fn hash(&self, env: &Env) -> BytesN<32> {
        env.crypto().keccak256(&self.clone().to_xdr(env)).into()
    }

    /// Data hash the current signers have to sign to rotate to this signer set.
    pub fn signers_rotation_hash(&self, env: &Env) -> BytesN<32> {
        env.crypto()
            .keccak256(&(CommandType::RotateSigners, self.clone()).to_xdr(env))
            .into()
    }
}

impl Proof {
    pub fn signers_hash(&self, env: &Env) -> BytesN<32> {
        self.signers.hash(env)
    }
}
