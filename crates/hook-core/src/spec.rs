// hook-core/src/spec.rs

use crate::types::Fee;
use serde::{Deserialize, Serialize};

/// A named value handed to the hook at install time
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HookParameter {
    pub name: String,
    pub value: String,
}

impl HookParameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parameters missing either half are never sent
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.value.is_empty()
    }
}

/// What the user asked to deploy
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HookSpec {
    /// Namespace before hashing
    pub namespace: String,
    /// Transaction type names the hook should fire on, in selection order
    pub invoke: Vec<String>,
    /// Fee in drops
    pub fee: Fee,
    #[serde(default)]
    pub parameters: Vec<HookParameter>,
}

impl HookSpec {
    pub fn new(namespace: impl Into<String>, invoke: Vec<String>, fee: impl Into<Fee>) -> Self {
        Self {
            namespace: namespace.into(),
            invoke,
            fee: fee.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(HookParameter::new(name, value));
        self
    }
}
