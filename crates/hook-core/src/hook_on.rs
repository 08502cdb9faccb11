// hook-core/src/hook_on.rs

//! Trigger mask (`HookOn`) calculation.
//!
//! `HookOn` is a 256-bit field with one bit per transaction type code. The
//! ledger treats most bits as active-low, so the mask starts from a base value
//! and each selected type flips its bit.

use crate::{HookError, HookResult};
use num_bigint::BigUint;
use num_traits::One;
use std::fmt;

/// Width of the rendered mask in hex digits
pub const HOOK_ON_HEX_WIDTH: usize = 64;

/// Transaction type names and their codes
const TRANSACTION_TYPES: &[(&str, u8)] = &[
    ("ttPAYMENT", 0),
    ("ttESCROW_CREATE", 1),
    ("ttESCROW_FINISH", 2),
    ("ttACCOUNT_SET", 3),
    ("ttESCROW_CANCEL", 4),
    ("ttREGULAR_KEY_SET", 5),
    ("ttOFFER_CREATE", 7),
    ("ttOFFER_CANCEL", 8),
    ("ttTICKET_CREATE", 10),
    ("ttSIGNER_LIST_SET", 12),
    ("ttPAYCHAN_CREATE", 13),
    ("ttPAYCHAN_FUND", 14),
    ("ttPAYCHAN_CLAIM", 15),
    ("ttCHECK_CREATE", 16),
    ("ttCHECK_CASH", 17),
    ("ttCHECK_CANCEL", 18),
    ("ttDEPOSIT_PREAUTH", 19),
    ("ttTRUST_SET", 20),
    ("ttACCOUNT_DELETE", 21),
    ("ttHOOK_SET", 22),
    ("ttNFTOKEN_MINT", 25),
    ("ttNFTOKEN_BURN", 26),
    ("ttNFTOKEN_CREATE_OFFER", 27),
    ("ttNFTOKEN_CANCEL_OFFER", 28),
    ("ttNFTOKEN_ACCEPT_OFFER", 29),
    ("ttURITOKEN_MINT", 45),
    ("ttURITOKEN_BURN", 46),
    ("ttURITOKEN_BUY", 47),
    ("ttURITOKEN_CREATE_SELL_OFFER", 48),
    ("ttURITOKEN_CANCEL_SELL_OFFER", 49),
    ("ttGENESIS_MINT", 96),
    ("ttIMPORT", 97),
    ("ttCLAIM_REWARD", 98),
    ("ttINVOKE", 99),
    ("ttAMENDMENT", 100),
    ("ttFEE", 101),
    ("ttUNL_MODIFY", 102),
    ("ttEMIT_FAILURE", 103),
    ("ttUNL_REPORT", 104),
];

/// A known transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionTypeId {
    name: &'static str,
    code: u8,
}

impl TransactionTypeId {
    pub fn from_name(name: &str) -> HookResult<Self> {
        TRANSACTION_TYPES
            .iter()
            .find(|(known, _)| *known == name)
            .map(|&(name, code)| Self { name, code })
            .ok_or_else(|| HookError::UnknownTransactionType(name.to_string()))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    /// Every type this calculator knows about, in code order
    pub fn all() -> impl Iterator<Item = TransactionTypeId> {
        TRANSACTION_TYPES
            .iter()
            .map(|&(name, code)| TransactionTypeId { name, code })
    }
}

impl fmt::Display for TransactionTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Maps selected transaction types to the `HookOn` field.
///
/// Implementations must be pure: the same ordered input gives the same mask.
pub trait HookOnCalculator: Send + Sync {
    fn calculate(&self, selected: &[String]) -> HookResult<String>;
}

/// Flips one bit of a base mask per selected transaction type
#[derive(Debug, Clone)]
pub struct XorMaskCalculator {
    base: BigUint,
}

impl XorMaskCalculator {
    pub const DEFAULT_BASE_MASK: u32 = 0x3e3f_f5bf;

    pub fn new(base_mask: &str) -> HookResult<Self> {
        let trimmed = base_mask.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if digits.is_empty() || digits.len() > HOOK_ON_HEX_WIDTH {
            return Err(HookError::InvalidMask(base_mask.to_string()));
        }
        let base = BigUint::parse_bytes(digits.as_bytes(), 16)
            .ok_or_else(|| HookError::InvalidMask(base_mask.to_string()))?;
        Ok(Self { base })
    }
}

impl Default for XorMaskCalculator {
    fn default() -> Self {
        Self {
            base: BigUint::from(Self::DEFAULT_BASE_MASK),
        }
    }
}

impl HookOnCalculator for XorMaskCalculator {
    fn calculate(&self, selected: &[String]) -> HookResult<String> {
        let mut mask = self.base.clone();
        for name in selected {
            let tt = TransactionTypeId::from_name(name)?;
            mask ^= BigUint::one() << tt.code();
        }
        let digits = mask.to_str_radix(16).to_uppercase();
        Ok(format!("{:0>width$}", digits, width = HOOK_ON_HEX_WIDTH))
    }
}
