// hook-core/src/assembler.rs

use crate::{
    artifact::{select_active_artifact, SourceFile},
    hook_on::HookOnCalculator,
    transaction::{HookDefinition, HookParameterEntry, TransactionEnvelope, WireHookParameter},
    types::*,
    Account, HookParameter, HookResult, HookSpec,
};
use hook_crypto::{buffer_to_hex, digest_hex, string_to_hex};
use std::sync::Arc;

/// Builds `SetHook` envelopes for the deploy and delete paths
#[derive(Clone)]
pub struct TransactionAssembler {
    network_id: NetworkId,
    calculator: Arc<dyn HookOnCalculator>,
}

impl TransactionAssembler {
    pub fn new(network_id: NetworkId, calculator: Arc<dyn HookOnCalculator>) -> Self {
        Self {
            network_id,
            calculator,
        }
    }

    pub fn network_id(&self) -> NetworkId {
        self.network_id
    }

    /// Envelope installing the active artifact on `account`.
    ///
    /// Returns `Ok(None)` when there is nothing compiled to deploy.
    pub fn prepare_deploy(
        &self,
        account: &Account,
        spec: &HookSpec,
        files: &[SourceFile],
        active: usize,
    ) -> HookResult<Option<TransactionEnvelope>> {
        let artifact = match select_active_artifact(files, active) {
            Some(artifact) => artifact,
            None => {
                tracing::debug!("No compiled file to deploy for {}", account.address);
                return Ok(None);
            }
        };

        let hook_namespace = namespace_hash(&spec.namespace);
        let hook_on = self.calculator.calculate(&spec.invoke)?;
        let parameters = filter_parameters(&spec.parameters);

        tracing::debug!(
            "Assembling SetHook for {} from {} ({} bytes, {} parameters)",
            account.address,
            artifact.name,
            artifact.bytecode.len(),
            parameters.len()
        );

        let hook = HookDefinition {
            create_code: buffer_to_hex(Some(artifact.bytecode)).to_uppercase(),
            hook_on: Some(hook_on),
            hook_namespace: Some(hook_namespace),
            hook_api_version: Some(HOOK_API_VERSION),
            flags: HOOK_FLAG_OVERRIDE,
            hook_parameters: if parameters.is_empty() { None } else { Some(parameters) },
        };

        Ok(Some(TransactionEnvelope::set_hook(
            account.address.clone(),
            account.sequence,
            spec.fee.clone(),
            self.network_id,
            hook,
        )))
    }

    /// Envelope removing the hook from `account`
    pub fn prepare_delete(&self, account: &Account, fee: &str) -> TransactionEnvelope {
        TransactionEnvelope::set_hook(
            account.address.clone(),
            account.sequence,
            fee,
            self.network_id,
            HookDefinition::removal(),
        )
    }
}

/// Upper-case SHA-256 of the namespace string
pub fn namespace_hash(namespace: &str) -> String {
    digest_hex(namespace).to_uppercase()
}

/// Drop incomplete parameters and hex-encode the names, keeping order
pub fn filter_parameters(parameters: &[HookParameter]) -> Vec<HookParameterEntry> {
    parameters
        .iter()
        .filter(|p| p.is_complete())
        .map(|p| HookParameterEntry {
            hook_parameter: WireHookParameter {
                name: string_to_hex(&p.name),
                value: p.value.clone(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HookError, XorMaskCalculator};
    use proptest::prelude::*;

    fn assembler() -> TransactionAssembler {
        TransactionAssembler::new(21338, Arc::new(XorMaskCalculator::default()))
    }

    fn account() -> Account {
        Account::new("rHookAccount", "secret", 42)
    }

    fn files() -> Vec<SourceFile> {
        vec![SourceFile::compiled("hook.c", vec![0x00, 0x61, 0x73, 0x6d, 0x0f])]
    }

    #[test]
    fn test_deploy_envelope_fields() {
        let spec = HookSpec::new("my-namespace", vec!["ttPAYMENT".into()], "2000");
        let tx = assembler()
            .prepare_deploy(&account(), &spec, &files(), 0)
            .unwrap()
            .unwrap();

        assert_eq!(tx.transaction_type, SET_HOOK);
        assert_eq!(tx.account, "rHookAccount");
        assert_eq!(tx.sequence, 42);
        assert_eq!(tx.fee, "2000");
        assert_eq!(tx.network_id, 21338);

        let hook = tx.hook().unwrap();
        assert_eq!(hook.create_code, "0061736D0F");
        assert_eq!(hook.hook_api_version, Some(0));
        assert_eq!(hook.flags, 1);
        assert_eq!(hook.hook_namespace.as_deref(), Some(namespace_hash("my-namespace").as_str()));
        assert!(hook.hook_on.as_ref().unwrap().ends_with("3E3FF5BE"));
        assert!(hook.hook_parameters.is_none());
        assert!(tx.validate_basic().is_ok());
    }

    #[test]
    fn test_namespace_is_uppercase_digest_never_raw() {
        let ns = namespace_hash("hello");
        assert_eq!(ns, "2CF24DBA5FB0A30E26E83B2AC5B9E29E1B161E5C1FA7425E73043362938B9824");
        assert_ne!(ns, "hello");
    }

    #[test]
    fn test_parameters_filtered_and_name_hex_encoded() {
        let spec = HookSpec::new("ns", vec![], "10")
            .with_parameter("", "orphan")
            .with_parameter("name", "value")
            .with_parameter("novalue", "");
        let tx = assembler()
            .prepare_deploy(&account(), &spec, &files(), 0)
            .unwrap()
            .unwrap();

        let params = tx.hook().unwrap().hook_parameters.as_ref().unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].hook_parameter.name, "6E616D65");
        assert_eq!(params[0].hook_parameter.value, "value");
    }

    #[test]
    fn test_nothing_compiled_yields_none() {
        let spec = HookSpec::new("ns", vec![], "10");
        let none = assembler()
            .prepare_deploy(&account(), &spec, &[SourceFile::new("a.c")], 0)
            .unwrap();
        assert!(none.is_none());

        let empty = assembler().prepare_deploy(&account(), &spec, &[], 0).unwrap();
        assert!(empty.is_none());
    }

    #[test]
    fn test_unknown_trigger_propagates() {
        let spec = HookSpec::new("ns", vec!["ttBOGUS".into()], "10");
        let err = assembler()
            .prepare_deploy(&account(), &spec, &files(), 0)
            .unwrap_err();
        assert!(matches!(err, HookError::UnknownTransactionType(_)));
    }

    #[test]
    fn test_delete_envelope() {
        let tx = assembler().prepare_delete(&account(), "100000");
        let hook = tx.hook().unwrap();
        assert!(hook.is_removal());
        assert_eq!(hook.flags, 1);
        assert!(hook.hook_on.is_none());
        assert!(hook.hook_parameters.is_none());
        assert_eq!(tx.fee, "100000");
    }

    fn parameter() -> impl Strategy<Value = HookParameter> {
        ("[a-z]{0,3}", "[0-9A-F]{0,4}").prop_map(|(name, value)| HookParameter::new(name, value))
    }

    proptest! {
        #[test]
        fn prop_filter_keeps_complete_parameters_in_order(
            params in proptest::collection::vec(parameter(), 0..16)
        ) {
            let complete: Vec<&HookParameter> = params.iter().filter(|p| p.is_complete()).collect();
            let entries = filter_parameters(&params);

            prop_assert_eq!(entries.len(), complete.len());
            for (entry, param) in entries.iter().zip(complete) {
                let name = hook_crypto::hex_to_buffer(&entry.hook_parameter.name).unwrap();
                prop_assert_eq!(name, param.name.as_bytes().to_vec());
                prop_assert_eq!(&entry.hook_parameter.value, &param.value);
            }
        }
    }
}
