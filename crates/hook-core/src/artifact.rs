// hook-core/src/artifact.rs

use serde::{Deserialize, Serialize};

/// A source file and, once the compiler has run, its bytecode
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceFile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiled_content: Option<Vec<u8>>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            compiled_content: None,
        }
    }

    pub fn compiled(name: impl Into<String>, bytecode: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            compiled_content: Some(bytecode),
        }
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled_content.is_some()
    }
}

/// Borrowed view of a file that has compiled output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompiledArtifact<'a> {
    pub name: &'a str,
    pub bytecode: &'a [u8],
}

/// Pick the artifact to deploy.
///
/// The focused file wins if it has been compiled; otherwise the first compiled
/// file in list order. `None` when nothing is compiled.
pub fn select_active_artifact(files: &[SourceFile], active: usize) -> Option<CompiledArtifact<'_>> {
    let focused = files.get(active).filter(|f| f.is_compiled());
    let file = focused.or_else(|| files.iter().find(|f| f.is_compiled()))?;
    let bytecode = file.compiled_content.as_deref()?;
    Some(CompiledArtifact {
        name: &file.name,
        bytecode,
    })
}
