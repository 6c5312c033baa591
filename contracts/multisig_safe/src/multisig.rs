use soroban_sdk::{contract, contractimpl, log, Address, BytesN, Env, String, Val, Vec};

use crate::config::MAX_ACTIONS;
use crate::errors::MultisigError;
use crate::events::{Cancelled, Executed, Initialized, Proposed, Signed};
use crate::executor::{self, HostExecutor};
use crate::registry;
use crate::store;
use crate::types::{Action, DataKey, Proposal, Transaction};

#[contract]
pub struct MultisigSafe;

#[contractimpl]
impl MultisigSafe {
    pub fn initialize(env: Env, signer: Address) -> Result<(), MultisigError> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(MultisigError::AlreadyInitialized);
        }

        registry::init(&env, &signer);
        env.storage().instance().set(&DataKey::Initialized, &true);
        store::extend_instance(&env);

        Initialized {
            signer,
            settings_version: registry::settings_version(&env),
        }
        .publish(&env);
        Ok(())
    }

    /// Stores a new proposal and records the proposer's approval.
    ///
    /// The id is derived from the content, so the same actions and
    /// description can only ever be proposed once.
    pub fn propose(
        env: Env,
        proposer: Address,
        actions: Vec<Action>,
        description: String,
    ) -> Result<BytesN<32>, MultisigError> {
        Self::require_initialized(&env)?;
        Self::require_not_executing(&env)?;
        Self::require_signer(&env, &proposer)?;

        if actions.is_empty() {
            return Err(MultisigError::EmptyProposal);
        }
        if actions.len() > MAX_ACTIONS {
            return Err(MultisigError::TooManyActions);
        }
        executor::validate(&env, &actions)?;

        let id = store::proposal_id(&env, &actions, &description);
        if store::exists(&env, &id) {
            return Err(MultisigError::AlreadyExists);
        }

        let settings_version = registry::settings_version(&env);
        store::save_proposal(
            &env,
            &id,
            &Proposal {
                actions,
                description,
            },
        );
        store::save_transaction(
            &env,
            &id,
            &Transaction {
                proposer: proposer.clone(),
                exists: true,
                executed: false,
                cancelled: false,
                settings_version,
                approvals: 0,
                created_at: env.ledger().sequence(),
            },
        );
        store::increment_proposal_count(&env);
        store::extend_instance(&env);

        log!(&env, "proposed", id.clone(), settings_version);
        Proposed {
            id: id.clone(),
            proposer: proposer.clone(),
            settings_version,
        }
        .publish(&env);

        Self::approve(&env, &id, &proposer)?;
        Ok(id)
    }

    pub fn sign(env: Env, signer: Address, id: BytesN<32>) -> Result<(), MultisigError> {
        Self::require_initialized(&env)?;
        Self::require_not_executing(&env)?;
        Self::require_signer(&env, &signer)?;

        Self::approve(&env, &id, &signer)?;
        store::extend_instance(&env);
        Ok(())
    }

    /// Withdraws a pending proposal. Any signer may cancel any proposal.
    pub fn cancel(env: Env, signer: Address, id: BytesN<32>) -> Result<(), MultisigError> {
        Self::require_initialized(&env)?;
        Self::require_not_executing(&env)?;
        Self::require_signer(&env, &signer)?;

        let mut transaction = Self::validate(&env, &id)?;
        transaction.cancelled = true;
        store::save_transaction(&env, &id, &transaction);
        store::extend_instance(&env);

        log!(&env, "cancelled", id.clone());
        Cancelled { id, signer }.publish(&env);
        Ok(())
    }

    /// Runs every action of a proposal that has reached quorum.
    ///
    /// The executed flag is written before the first action runs. If any
    /// action fails the error return makes the host discard all writes of
    /// this call, the flag included.
    pub fn execute(env: Env, signer: Address, id: BytesN<32>) -> Result<Vec<Val>, MultisigError> {
        Self::require_initialized(&env)?;
        Self::require_not_executing(&env)?;
        Self::require_signer(&env, &signer)?;

        let mut transaction = Self::validate(&env, &id)?;
        // Validation pinned the settings version, so this is the threshold
        // the proposal was created under.
        if transaction.approvals < registry::threshold(&env) {
            return Err(MultisigError::TransactionNotReadyToExecute);
        }
        let proposal = store::proposal(&env, &id).ok_or(MultisigError::TransactionDoesNotExist)?;

        transaction.executed = true;
        store::save_transaction(&env, &id, &transaction);
        store::increment_nonce(&env);

        env.storage().instance().set(&DataKey::Executing, &true);
        let outcome = executor::run(&env, &HostExecutor, &proposal.actions);
        env.storage().instance().remove(&DataKey::Executing);
        let outputs = outcome?;

        store::extend_instance(&env);
        log!(&env, "executed", id.clone(), outputs.len());
        Executed {
            id,
            executor: signer,
            actions: proposal.actions.len(),
        }
        .publish(&env);
        Ok(outputs)
    }

    pub fn proposal_id(env: Env, actions: Vec<Action>, description: String) -> BytesN<32> {
        store::proposal_id(&env, &actions, &description)
    }

    pub fn threshold(env: Env) -> Result<u32, MultisigError> {
        Self::require_initialized(&env)?;
        Ok(registry::threshold(&env))
    }

    pub fn settings_version(env: Env) -> Result<u64, MultisigError> {
        Self::require_initialized(&env)?;
        Ok(registry::settings_version(&env))
    }

    pub fn signer_count(env: Env) -> Result<u32, MultisigError> {
        Self::require_initialized(&env)?;
        Ok(registry::count(&env))
    }

    pub fn signers(env: Env) -> Result<Vec<Address>, MultisigError> {
        Self::require_initialized(&env)?;
        Ok(registry::list(&env))
    }

    pub fn is_signer(env: Env, signer: Address) -> Result<bool, MultisigError> {
        Self::require_initialized(&env)?;
        Ok(registry::contains(&env, &signer))
    }

    pub fn nonce(env: Env) -> u64 {
        store::nonce(&env)
    }

    pub fn proposal_count(env: Env) -> u64 {
        store::proposal_count(&env)
    }

    pub fn get_proposal(env: Env, id: BytesN<32>) -> Result<Proposal, MultisigError> {
        store::proposal(&env, &id).ok_or(MultisigError::TransactionDoesNotExist)
    }

    pub fn get_transaction(env: Env, id: BytesN<32>) -> Result<Transaction, MultisigError> {
        store::transaction(&env, &id).ok_or(MultisigError::TransactionDoesNotExist)
    }

    pub fn exists(env: Env, id: BytesN<32>) -> bool {
        store::exists(&env, &id)
    }

    pub fn is_executed(env: Env, id: BytesN<32>) -> bool {
        store::transaction(&env, &id).is_some_and(|transaction| transaction.executed)
    }

    pub fn is_cancelled(env: Env, id: BytesN<32>) -> bool {
        store::transaction(&env, &id).is_some_and(|transaction| transaction.cancelled)
    }

    /// True while the proposal can still be signed, cancelled or executed.
    pub fn is_valid(env: Env, id: BytesN<32>) -> bool {
        Self::validate(&env, &id).is_ok()
    }

    pub fn approval_count(env: Env, id: BytesN<32>) -> u32 {
        store::transaction(&env, &id).map_or(0, |transaction| transaction.approvals)
    }

    pub fn has_signed(env: Env, id: BytesN<32>, signer: Address) -> bool {
        store::has_signed(&env, &id, &signer)
    }

    fn approve(env: &Env, id: &BytesN<32>, signer: &Address) -> Result<(), MultisigError> {
        let mut transaction = Self::validate(env, id)?;
        if store::has_signed(env, id, signer) {
            return Err(MultisigError::AlreadySigned);
        }

        store::record_approval(env, id, signer);
        transaction.approvals += 1;
        store::save_transaction(env, id, &transaction);

        log!(env, "signed", id.clone(), signer.clone(), transaction.approvals);
        Signed {
            id: id.clone(),
            signer: signer.clone(),
            approvals: transaction.approvals,
        }
        .publish(env);
        Ok(())
    }

    /// Loads a record that can still change: present, not terminal, and
    /// created under the current settings version.
    fn validate(env: &Env, id: &BytesN<32>) -> Result<Transaction, MultisigError> {
        let transaction =
            store::transaction(env, id).ok_or(MultisigError::TransactionDoesNotExist)?;

        if transaction.executed {
            return Err(MultisigError::TransactionAlreadyExecuted);
        }
        if transaction.cancelled {
            return Err(MultisigError::TransactionAlreadyCancelled);
        }
        if transaction.settings_version != registry::settings_version(env) {
            return Err(MultisigError::TransactionNoLongerValid);
        }
        Ok(transaction)
    }

    fn require_signer(env: &Env, caller: &Address) -> Result<(), MultisigError> {
        if !registry::contains(env, caller) {
            return Err(MultisigError::NotASigner);
        }
        caller.require_auth();
        Ok(())
    }

    fn require_not_executing(env: &Env) -> Result<(), MultisigError> {
        if env.storage().instance().has(&DataKey::Executing) {
            return Err(MultisigError::Reentrancy);
        }
        Ok(())
    }

    fn require_initialized(env: &Env) -> Result<(), MultisigError> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(MultisigError::NotInitialized);
        }
        Ok(())
    }
}
