//! Signer membership set, quorum threshold, and the settings version that
//! invalidates proposals created under an older configuration.
//!
//! Signers occupy dense slots `0..count` so that add, remove and contains are
//! all constant time; removal swaps the last slot into the freed one.
//!
//! Every mutation here is crate-private. The only caller is the execute path
//! of the engine, when a proposal targets the multisig itself.

use soroban_sdk::{log, Address, Env, Vec};

use crate::errors::MultisigError;
use crate::events::{SignerAdded, SignerRemoved, ThresholdChanged};
use crate::types::DataKey;

pub(crate) fn init(env: &Env, signer: &Address) {
    let storage = env.storage().instance();
    storage.set(&DataKey::Signer(signer.clone()), &0u32);
    storage.set(&DataKey::SignerAt(0), signer);
    storage.set(&DataKey::SignerCount, &1u32);
    storage.set(&DataKey::Threshold, &1u32);
    storage.set(&DataKey::SettingsVersion, &1u64);
}

pub fn contains(env: &Env, signer: &Address) -> bool {
    env.storage().instance().has(&DataKey::Signer(signer.clone()))
}

pub fn count(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::SignerCount).unwrap_or(0)
}

pub fn threshold(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::Threshold).unwrap_or(0)
}

pub fn settings_version(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::SettingsVersion).unwrap_or(0)
}

pub fn list(env: &Env) -> Vec<Address> {
    let storage = env.storage().instance();
    let mut signers = Vec::new(env);
    for slot in 0..count(env) {
        if let Some(signer) = storage.get::<DataKey, Address>(&DataKey::SignerAt(slot)) {
            signers.push_back(signer);
        }
    }
    signers
}

pub(crate) fn add(env: &Env, signer: &Address) -> Result<(), MultisigError> {
    if contains(env, signer) {
        return Err(MultisigError::AlreadyMember);
    }

    let storage = env.storage().instance();
    let slot = count(env);
    storage.set(&DataKey::Signer(signer.clone()), &slot);
    storage.set(&DataKey::SignerAt(slot), signer);
    storage.set(&DataKey::SignerCount, &(slot + 1));

    let settings_version = bump_settings_version(env);
    log!(env, "signer added", signer.clone(), settings_version);
    SignerAdded {
        signer: signer.clone(),
        settings_version,
    }
    .publish(env);
    Ok(())
}

pub(crate) fn remove(env: &Env, signer: &Address) -> Result<(), MultisigError> {
    let storage = env.storage().instance();
    let slot: u32 = storage
        .get(&DataKey::Signer(signer.clone()))
        .ok_or(MultisigError::NotMember)?;

    let count = count(env);
    if count == 1 {
        return Err(MultisigError::LastSignerProtected);
    }

    let last = count - 1;
    if slot != last {
        if let Some(moved) = storage.get::<DataKey, Address>(&DataKey::SignerAt(last)) {
            storage.set(&DataKey::SignerAt(slot), &moved);
            storage.set(&DataKey::Signer(moved), &slot);
        }
    }
    storage.remove(&DataKey::SignerAt(last));
    storage.remove(&DataKey::Signer(signer.clone()));
    storage.set(&DataKey::SignerCount, &last);

    let settings_version = bump_settings_version(env);
    log!(env, "signer removed", signer.clone(), settings_version);
    SignerRemoved {
        signer: signer.clone(),
        settings_version,
    }
    .publish(env);

    // Removal never blocks on the threshold; the threshold follows the set down.
    if threshold(env) > last {
        storage.set(&DataKey::Threshold, &last);
        ThresholdChanged {
            threshold: last,
            settings_version,
        }
        .publish(env);
    }
    Ok(())
}

/// Adds `new` and removes `old` as one unit. Both preconditions are checked
/// before anything is written.
pub(crate) fn replace(env: &Env, old: &Address, new: &Address) -> Result<(), MultisigError> {
    if contains(env, new) {
        return Err(MultisigError::AlreadyMember);
    }
    if !contains(env, old) {
        return Err(MultisigError::NotMember);
    }

    add(env, new)?;
    remove(env, old)
}

pub(crate) fn set_threshold(env: &Env, threshold: u32) -> Result<(), MultisigError> {
    if threshold == 0 || threshold > count(env) {
        return Err(MultisigError::InvalidThreshold);
    }

    env.storage().instance().set(&DataKey::Threshold, &threshold);

    let settings_version = bump_settings_version(env);
    log!(env, "threshold changed", threshold, settings_version);
    ThresholdChanged {
        threshold,
        settings_version,
    }
    .publish(env);
    Ok(())
}

fn bump_settings_version(env: &Env) -> u64 {
    let next = settings_version(env) + 1;
    env.storage().instance().set(&DataKey::SettingsVersion, &next);
    next
}
