use crate::config::CgpConfig;
use crate::error::{GridGpError, Result};
use crate::functions::table::{FunctionId, FUNCTIONS};

/// The subset of the function library eligible for mutation, resolved
/// once from the per-category enable flags.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    available: Vec<FunctionId>,
}

impl FunctionRegistry {
    pub fn new(config: &CgpConfig) -> Result<Self> {
        let available: Vec<FunctionId> = FUNCTIONS
            .iter()
            .filter(|def| config.category_enabled(def.category))
            .map(|def| def.id)
            .collect();

        if available.is_empty() {
            return Err(GridGpError::Configuration(
                "at least one function category must be enabled".to_string(),
            ));
        }

        if log::log_enabled!(log::Level::Debug) {
            let names: Vec<String> = available.iter().map(|id| id.to_string()).collect();
            log::debug!("enabled functions: {}", names.join(", "));
        }

        Ok(Self { available })
    }

    pub fn available(&self) -> &[FunctionId] {
        &self.available
    }

    pub fn len(&self) -> usize {
        self.available.len()
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }
}
