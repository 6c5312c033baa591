//! Persistent proposal table: content, lifecycle record and approvals per id.
//! Records are never purged, so an id can only ever be proposed once.

use soroban_sdk::{xdr::ToXdr, Address, Bytes, BytesN, Env, String, Vec};

use crate::config::{
    INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT,
    PERSISTENT_LIFETIME_THRESHOLD, PROPOSAL_DOMAIN_TAG,
};
use crate::types::{Action, DataKey, Proposal, Transaction};

/// Content-derived proposal id.
///
/// `sha256(tag ‖ network id ‖ xdr(multisig address) ‖ xdr(actions) ‖ xdr(description))`.
/// Every input is public, so clients can derive the id before submitting.
pub fn proposal_id(env: &Env, actions: &Vec<Action>, description: &String) -> BytesN<32> {
    let mut preimage = Bytes::from_slice(env, PROPOSAL_DOMAIN_TAG);
    preimage.append(&Bytes::from(env.ledger().network_id()));
    preimage.append(&env.current_contract_address().to_xdr(env));
    preimage.append(&actions.clone().to_xdr(env));
    preimage.append(&description.clone().to_xdr(env));
    env.crypto().sha256(&preimage).to_bytes()
}

pub(crate) fn exists(env: &Env, id: &BytesN<32>) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Transaction(id.clone()))
}

pub(crate) fn transaction(env: &Env, id: &BytesN<32>) -> Option<Transaction> {
    env.storage()
        .persistent()
        .get(&DataKey::Transaction(id.clone()))
}

pub(crate) fn save_transaction(env: &Env, id: &BytesN<32>, transaction: &Transaction) {
    let key = DataKey::Transaction(id.clone());
    persist(env, &key, transaction);
}

pub(crate) fn proposal(env: &Env, id: &BytesN<32>) -> Option<Proposal> {
    env.storage().persistent().get(&DataKey::Proposal(id.clone()))
}

pub(crate) fn save_proposal(env: &Env, id: &BytesN<32>, proposal: &Proposal) {
    let key = DataKey::Proposal(id.clone());
    persist(env, &key, proposal);
}

pub(crate) fn has_signed(env: &Env, id: &BytesN<32>, signer: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Approval(id.clone(), signer.clone()))
}

pub(crate) fn record_approval(env: &Env, id: &BytesN<32>, signer: &Address) {
    let key = DataKey::Approval(id.clone(), signer.clone());
    persist(env, &key, &true);
}

pub(crate) fn proposal_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::ProposalCount)
        .unwrap_or(0u64)
}

pub(crate) fn increment_proposal_count(env: &Env) {
    let next = proposal_count(env) + 1;
    env.storage().instance().set(&DataKey::ProposalCount, &next);
}

pub(crate) fn nonce(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::Nonce).unwrap_or(0u64)
}

pub(crate) fn increment_nonce(env: &Env) {
    let next = nonce(env) + 1;
    env.storage().instance().set(&DataKey::Nonce, &next);
}

pub(crate) fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn persist<V>(env: &Env, key: &DataKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    let storage = env.storage().persistent();
    storage.set(key, value);
    storage.extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}
