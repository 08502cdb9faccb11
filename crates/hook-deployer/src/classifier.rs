// hook-deployer/src/classifier.rs
use crate::state::DeployLogEntry;
use hook_core::TES_SUCCESS;
use hook_rpc::SubmissionResult;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Deploy,
    Delete,
}

impl Operation {
    pub fn success_notice(&self) -> &'static str {
        match self {
            Operation::Deploy => "Hook deployed successfully ✅",
            Operation::Delete => "Hook deleted successfully ✅",
        }
    }

    /// Shown when signing or submission blows up
    pub fn failure_notice(&self) -> &'static str {
        match self {
            Operation::Deploy => "Error occurred while deploying",
            Operation::Delete => "Error occurred while deleting hook",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Deploy => write!(f, "deploy"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Applied by the ledger
    Success,
    /// Ledger answered with a non-success engine result
    Rejected,
    /// No engine result at all
    TransportFailure,
}

#[derive(Debug, Clone)]
pub struct Classification {
    pub outcome: Outcome,
    pub entries: Vec<DeployLogEntry>,
}

/// Turns a submission result into an outcome and log entries
#[derive(Debug, Clone)]
pub struct ResultClassifier {
    explorer_host: String,
}

impl ResultClassifier {
    /// `explorer_host` may carry a scheme or trailing slash; both are dropped
    pub fn new(explorer_host: &str) -> Self {
        let host = explorer_host
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        Self {
            explorer_host: host.to_string(),
        }
    }

    pub fn explorer_url(&self, tx_hash: &str) -> String {
        format!("https://{}/{}", self.explorer_host, tx_hash)
    }

    pub fn classify(&self, operation: Operation, result: &SubmissionResult) -> Classification {
        let code = match result.engine_result.as_deref() {
            Some(code) => code,
            None => {
                let text = format!(
                    "[{}] {}",
                    result.error.as_deref().unwrap_or("unknown"),
                    result.error_description().unwrap_or_default()
                );
                return Classification {
                    outcome: Outcome::TransportFailure,
                    entries: vec![DeployLogEntry::error(text.trim_end())],
                };
            }
        };

        let mut text = format!("[{}] {}", code, result.engine_result_message.as_deref().unwrap_or_default());

        if code == TES_SUCCESS {
            if operation == Operation::Delete {
                if let Some(index) = result.validated_ledger_index {
                    text.push_str(&format!(" Validated ledger index: {}", index));
                }
            }
            let detail = self.attach_hash(DeployLogEntry::success(text.trim_end()), code, result);
            Classification {
                outcome: Outcome::Success,
                entries: vec![DeployLogEntry::success(operation.success_notice()), detail],
            }
        } else {
            let detail = self.attach_hash(DeployLogEntry::error(text.trim_end()), code, result);
            Classification {
                outcome: Outcome::Rejected,
                entries: vec![detail],
            }
        }
    }

    fn attach_hash(&self, entry: DeployLogEntry, code: &str, result: &SubmissionResult) -> DeployLogEntry {
        let entry = entry.with_engine_result(code);
        match result.tx_hash() {
            Some(hash) => entry.with_transaction(hash, self.explorer_url(hash)),
            None => entry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LogKind;
    use serde_json::json;

    fn result(value: serde_json::Value) -> SubmissionResult {
        serde_json::from_value(value).unwrap()
    }

    fn classifier() -> ResultClassifier {
        ResultClassifier::new("https://explorer.example/")
    }

    #[test]
    fn test_success_produces_two_entries() {
        let res = result(json!({ "engine_result": "tesSUCCESS", "tx_json": { "hash": "ABC123" } }));
        let out = classifier().classify(Operation::Deploy, &res);

        assert_eq!(out.outcome, Outcome::Success);
        assert_eq!(out.entries.len(), 2);
        assert!(out.entries.iter().all(|e| e.kind == LogKind::Success));
        assert_eq!(out.entries[0].text, "Hook deployed successfully ✅");
        assert_eq!(out.entries[1].text, "[tesSUCCESS]");
        assert_eq!(out.entries[1].tx_hash.as_deref(), Some("ABC123"));
        assert_eq!(out.entries[1].explorer_url.as_deref(), Some("https://explorer.example/ABC123"));
    }

    #[test]
    fn test_delete_success_mentions_ledger_index() {
        let res = result(json!({
            "engine_result": "tesSUCCESS",
            "engine_result_message": "The transaction was applied.",
            "tx_json": { "hash": "FF" },
            "validated_ledger_index": 42
        }));
        let out = classifier().classify(Operation::Delete, &res);

        assert_eq!(out.entries[0].text, "Hook deleted successfully ✅");
        assert_eq!(
            out.entries[1].text,
            "[tesSUCCESS] The transaction was applied. Validated ledger index: 42"
        );
    }

    #[test]
    fn test_rejection_is_single_error() {
        let res = result(json!({
            "engine_result": "tecNO_PERMISSION",
            "engine_result_message": "No permission to perform requested operation."
        }));
        let out = classifier().classify(Operation::Deploy, &res);

        assert_eq!(out.outcome, Outcome::Rejected);
        assert_eq!(out.entries.len(), 1);
        assert_eq!(out.entries[0].kind, LogKind::Error);
        assert_eq!(out.entries[0].engine_result.as_deref(), Some("tecNO_PERMISSION"));
        assert!(out.entries[0].tx_hash.is_none());
    }

    #[test]
    fn test_missing_engine_result_formats_error_code() {
        let res = result(json!({ "error": "noNetwork", "error_exception": "timeout" }));
        let out = classifier().classify(Operation::Delete, &res);

        assert_eq!(out.outcome, Outcome::TransportFailure);
        assert_eq!(out.entries.len(), 1);
        assert_eq!(out.entries[0].kind, LogKind::Error);
        assert_eq!(out.entries[0].text, "[noNetwork] timeout");
    }

    #[test]
    fn test_explorer_host_normalized() {
        assert_eq!(ResultClassifier::new("explorer.example").explorer_url("AB"), "https://explorer.example/AB");
        assert_eq!(ResultClassifier::new("http://explorer.example").explorer_url("AB"), "https://explorer.example/AB");
    }
}
