//! Dispatch of proposal actions.
//!
//! Actions aimed at another contract go through an [`ActionExecutor`]; actions
//! aimed at the multisig itself are decoded into a [`SettingsCall`] and applied
//! to the signer registry in the same frame, since the host refuses contract
//! re-entry.

use soroban_sdk::{log, Address, Env, Error, IntoVal, Symbol, TryFromVal, Val, Vec};

use crate::config::{FN_ADD_SIGNER, FN_REMOVE_SIGNER, FN_REPLACE_SIGNER, FN_SET_THRESHOLD};
use crate::errors::MultisigError;
use crate::registry;
use crate::types::Action;

pub trait ActionExecutor {
    /// Performs one external call and returns its output.
    fn dispatch(&self, env: &Env, index: u32, action: &Action) -> Result<Val, MultisigError>;
}

/// Cross-contract invocation through the Soroban host.
pub struct HostExecutor;

impl ActionExecutor for HostExecutor {
    fn dispatch(&self, env: &Env, index: u32, action: &Action) -> Result<Val, MultisigError> {
        match env.try_invoke_contract::<Val, Error>(
            &action.target,
            &action.function,
            action.args.clone(),
        ) {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(_)) => {
                log!(env, "action output unreadable", index, action.target.clone());
                Err(MultisigError::ExecutionFailed)
            }
            Err(Ok(error)) => {
                // Surface the target's own error code to whoever inspects the call.
                log!(env, "action failed", index, action.target.clone(), error.get_code());
                Err(MultisigError::ExecutionFailed)
            }
            Err(Err(_)) => {
                log!(env, "action aborted", index, action.target.clone());
                Err(MultisigError::ExecutionFailed)
            }
        }
    }
}

/// Privileged registry operation, reachable only through an executed proposal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum SettingsCall {
    AddSigner(Address),
    RemoveSigner(Address),
    ReplaceSigner(Address, Address),
    SetThreshold(u32),
}

impl SettingsCall {
    pub(crate) fn decode(env: &Env, action: &Action) -> Result<Self, MultisigError> {
        let function = &action.function;
        let args = &action.args;

        if *function == Symbol::new(env, FN_ADD_SIGNER) {
            expect_arity(args, 1)?;
            Ok(SettingsCall::AddSigner(arg(env, args, 0)?))
        } else if *function == Symbol::new(env, FN_REMOVE_SIGNER) {
            expect_arity(args, 1)?;
            Ok(SettingsCall::RemoveSigner(arg(env, args, 0)?))
        } else if *function == Symbol::new(env, FN_REPLACE_SIGNER) {
            expect_arity(args, 2)?;
            Ok(SettingsCall::ReplaceSigner(
                arg(env, args, 0)?,
                arg(env, args, 1)?,
            ))
        } else if *function == Symbol::new(env, FN_SET_THRESHOLD) {
            expect_arity(args, 1)?;
            Ok(SettingsCall::SetThreshold(arg(env, args, 0)?))
        } else {
            Err(MultisigError::InvalidAction)
        }
    }

    pub(crate) fn apply(self, env: &Env) -> Result<(), MultisigError> {
        match self {
            SettingsCall::AddSigner(signer) => registry::add(env, &signer),
            SettingsCall::RemoveSigner(signer) => registry::remove(env, &signer),
            SettingsCall::ReplaceSigner(old, new) => registry::replace(env, &old, &new),
            SettingsCall::SetThreshold(threshold) => registry::set_threshold(env, threshold),
        }
    }
}

fn expect_arity(args: &Vec<Val>, arity: u32) -> Result<(), MultisigError> {
    if args.len() != arity {
        return Err(MultisigError::InvalidAction);
    }
    Ok(())
}

fn arg<T>(env: &Env, args: &Vec<Val>, index: u32) -> Result<T, MultisigError>
where
    T: TryFromVal<Env, Val>,
{
    let val = args.get(index).ok_or(MultisigError::InvalidAction)?;
    T::try_from_val(env, &val).map_err(|_| MultisigError::InvalidAction)
}

/// Checks that every action is well formed before a proposal is stored.
pub(crate) fn validate(env: &Env, actions: &Vec<Action>) -> Result<(), MultisigError> {
    let this = env.current_contract_address();
    for action in actions.iter() {
        if action.target == this {
            SettingsCall::decode(env, &action)?;
        }
    }
    Ok(())
}

/// Runs `actions` in declared order and collects their outputs. Stops at the
/// first failure; the caller's error return discards everything written so far.
pub(crate) fn run<E: ActionExecutor>(
    env: &Env,
    executor: &E,
    actions: &Vec<Action>,
) -> Result<Vec<Val>, MultisigError> {
    let this = env.current_contract_address();
    let mut outputs = Vec::new(env);
    for (index, action) in actions.iter().enumerate() {
        let output = if action.target == this {
            SettingsCall::decode(env, &action)?.apply(env)?;
            ().into_val(env)
        } else {
            executor.dispatch(env, index as u32, &action)?
        };
        outputs.push_back(output);
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use soroban_sdk::{testutils::Address as _, vec};

    use crate::MultisigSafe;

    struct Recording {
        fail_at: u32,
        calls: Cell<u32>,
    }

    impl Recording {
        fn failing_at(fail_at: u32) -> Self {
            Recording {
                fail_at,
                calls: Cell::new(0),
            }
        }
    }

    impl ActionExecutor for Recording {
        fn dispatch(&self, env: &Env, index: u32, _action: &Action) -> Result<Val, MultisigError> {
            self.calls.set(self.calls.get() + 1);
            if index == self.fail_at {
                return Err(MultisigError::ExecutionFailed);
            }
            Ok(index.into_val(env))
        }
    }

    fn external(env: &Env) -> Action {
        Action::new(Address::generate(env), Symbol::new(env, "ping"), Vec::new(env))
    }

    #[test]
    fn test_run_collects_outputs_in_order() {
        let env = Env::default();
        let contract_id = env.register(MultisigSafe, ());
        let actions = vec![&env, external(&env), external(&env), external(&env)];

        let executor = Recording::failing_at(u32::MAX);
        let outputs = env.as_contract(&contract_id, || run(&env, &executor, &actions));

        let outputs = outputs.unwrap();
        assert_eq!(executor.calls.get(), 3);
        assert_eq!(outputs.len(), 3);
        assert_eq!(u32::try_from_val(&env, &outputs.get_unchecked(2)).unwrap(), 2);
    }

    #[test]
    fn test_run_stops_at_first_failure() {
        let env = Env::default();
        let contract_id = env.register(MultisigSafe, ());
        let actions = vec![&env, external(&env), external(&env), external(&env)];

        let executor = Recording::failing_at(1);
        let result = env.as_contract(&contract_id, || run(&env, &executor, &actions));

        assert_eq!(result.err(), Some(MultisigError::ExecutionFailed));
        assert_eq!(executor.calls.get(), 2);
    }

    #[test]
    fn test_decode_settings_calls() {
        let env = Env::default();
        let safe = Address::generate(&env);
        let signer = Address::generate(&env);
        let other = Address::generate(&env);

        assert_eq!(
            SettingsCall::decode(&env, &Action::add_signer(&env, &safe, &signer)),
            Ok(SettingsCall::AddSigner(signer.clone()))
        );
        assert_eq!(
            SettingsCall::decode(&env, &Action::replace_signer(&env, &safe, &signer, &other)),
            Ok(SettingsCall::ReplaceSigner(signer.clone(), other.clone()))
        );
        assert_eq!(
            SettingsCall::decode(&env, &Action::set_threshold(&env, &safe, 3)),
            Ok(SettingsCall::SetThreshold(3))
        );
    }

    #[test]
    fn test_decode_rejects_malformed_calls() {
        let env = Env::default();
        let safe = Address::generate(&env);

        let unknown = Action::new(safe.clone(), Symbol::new(&env, "upgrade"), Vec::new(&env));
        assert_eq!(
            SettingsCall::decode(&env, &unknown),
            Err(MultisigError::InvalidAction)
        );

        let missing_arg = Action::new(safe.clone(), Symbol::new(&env, FN_ADD_SIGNER), Vec::new(&env));
        assert_eq!(
            SettingsCall::decode(&env, &missing_arg),
            Err(MultisigError::InvalidAction)
        );

        let not_a_number: Val = safe.into_val(&env);
        let wrong_type = Action::new(
            safe.clone(),
            Symbol::new(&env, FN_SET_THRESHOLD),
            vec![&env, not_a_number],
        );
        assert_eq!(
            SettingsCall::decode(&env, &wrong_type),
            Err(MultisigError::InvalidAction)
        );
    }
}
