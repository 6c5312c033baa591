use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MultisigError {
    // Lifecycle
    NotInitialized = 1,
    AlreadyInitialized = 2,

    // Authorization
    NotASigner = 3,
    Reentrancy = 4,

    // Validation
    AlreadyMember = 5,
    NotMember = 6,
    LastSignerProtected = 7,
    InvalidThreshold = 8,
    EmptyProposal = 9,
    TooManyActions = 10,
    InvalidAction = 11,

    // State
    AlreadyExists = 12,
    TransactionDoesNotExist = 13,
    TransactionAlreadyExecuted = 14,
    TransactionAlreadyCancelled = 15,
    TransactionNoLongerValid = 16,
    AlreadySigned = 17,
    TransactionNotReadyToExecute = 18,

    // Execution
    /// An action's target failed. Only this code reaches the caller; the
    /// target's own error code, the action index and the target address go
    /// to the diagnostic log, which exists only in builds with debug
    /// assertions (tests, `release-with-logs`).
    ExecutionFailed = 19,
}
