//! Policy configuration loading.
//!
//! Loads an [`EnginePolicy`] from a `policy.yaml` file. Embedded hosts and
//! tests use [`EnginePolicy::default`] and skip the filesystem entirely.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::EnginePolicy;

/// Loads and provides access to the engine policy.
#[derive(Debug, Clone, Default)]
pub struct PolicyLoader {
    policy: EnginePolicy,
}

impl PolicyLoader {
    /// Loads the policy from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PolicyNotFound`] when the file is missing and
    /// [`EngineError::PolicyParseError`] when it fails to parse.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let contents = fs::read_to_string(path).map_err(|_| EngineError::PolicyNotFound {
            path: display.clone(),
        })?;
        let policy: EnginePolicy =
            serde_yaml::from_str(&contents).map_err(|e| EngineError::PolicyParseError {
                path: display,
                message: e.to_string(),
            })?;
        Ok(Self { policy })
    }

    /// Wraps an already-built policy.
    pub fn from_policy(policy: EnginePolicy) -> Self {
        Self { policy }
    }

    /// Returns the loaded policy.
    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }
}
