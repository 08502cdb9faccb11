// hook-core/src/types.rs

/// Account sequence number
pub type Sequence = u32;

/// Network identifier carried in `NetworkID`
pub type NetworkId = u32;

/// Fee in drops, kept as the decimal string the ledger expects
pub type Fee = String;

/// `TransactionType` of every envelope this pipeline builds
pub const SET_HOOK: &str = "SetHook";

/// Only hook API version the ledger accepts
pub const HOOK_API_VERSION: u16 = 0;

/// `hsfOVERRIDE`: replace whatever hook already sits in the slot
pub const HOOK_FLAG_OVERRIDE: u32 = 1;

/// Engine result of a transaction that was applied and included
pub const TES_SUCCESS: &str = "tesSUCCESS";
