//! Compile-time configuration: storage TTL policy and proposal limits.

pub(crate) const DAY_IN_LEDGERS: u32 = 17_280;

pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub(crate) const PERSISTENT_BUMP_AMOUNT: u32 = 90 * DAY_IN_LEDGERS;
pub(crate) const PERSISTENT_LIFETIME_THRESHOLD: u32 = PERSISTENT_BUMP_AMOUNT - 7 * DAY_IN_LEDGERS;

/// Upper bound on the number of actions in a single proposal.
pub const MAX_ACTIONS: u32 = 32;

/// Prefix of every proposal id preimage.
pub const PROPOSAL_DOMAIN_TAG: &[u8] = b"multisig_safe:proposal:v1";

// Functions a proposal may invoke on the multisig itself.
pub const FN_ADD_SIGNER: &str = "add_signer";
pub const FN_REMOVE_SIGNER: &str = "remove_signer";
pub const FN_REPLACE_SIGNER: &str = "replace_signer";
pub const FN_SET_THRESHOLD: &str = "set_threshold";
