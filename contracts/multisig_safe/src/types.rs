use soroban_sdk::{contracttype, vec, Address, BytesN, Env, IntoVal, String, Symbol, Val, Vec};

use crate::config::{FN_ADD_SIGNER, FN_REMOVE_SIGNER, FN_REPLACE_SIGNER, FN_SET_THRESHOLD};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    SignerCount,
    // signer -> slot, slot -> signer
    Signer(Address),
    SignerAt(u32),
    Threshold,
    SettingsVersion,
    Nonce,
    ProposalCount,
    Executing,
    Proposal(BytesN<32>),
    Transaction(BytesN<32>),
    Approval(BytesN<32>, Address),
}

/// A single call made by the multisig once a proposal executes.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Action {
    pub target: Address,
    pub function: Symbol,
    pub args: Vec<Val>,
}

impl Action {
    pub fn new(target: Address, function: Symbol, args: Vec<Val>) -> Self {
        Action {
            target,
            function,
            args,
        }
    }

    /// Action that adds `signer` to the multisig at `safe`.
    pub fn add_signer(env: &Env, safe: &Address, signer: &Address) -> Self {
        let arg: Val = signer.into_val(env);
        Self::new(safe.clone(), Symbol::new(env, FN_ADD_SIGNER), vec![env, arg])
    }

    pub fn remove_signer(env: &Env, safe: &Address, signer: &Address) -> Self {
        let arg: Val = signer.into_val(env);
        Self::new(safe.clone(), Symbol::new(env, FN_REMOVE_SIGNER), vec![env, arg])
    }

    pub fn replace_signer(env: &Env, safe: &Address, old: &Address, new: &Address) -> Self {
        let old: Val = old.into_val(env);
        let new: Val = new.into_val(env);
        Self::new(safe.clone(), Symbol::new(env, FN_REPLACE_SIGNER), vec![env, old, new])
    }

    pub fn set_threshold(env: &Env, safe: &Address, threshold: u32) -> Self {
        let arg: Val = threshold.into_val(env);
        Self::new(safe.clone(), Symbol::new(env, FN_SET_THRESHOLD), vec![env, arg])
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Proposal {
    pub actions: Vec<Action>,
    pub description: String,
}

/// Lifecycle record kept for every proposal id ever created.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    pub proposer: Address,
    pub exists: bool,
    pub executed: bool,
    pub cancelled: bool,
    pub settings_version: u64,
    pub approvals: u32,
    pub created_at: u32, // ledger sequence
}
