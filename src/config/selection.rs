use super::traits::ConfigSection;
use crate::error::GridGpError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IslandsConfig {
    /// Size of the population islands.
    pub island_size: usize,
    /// The number of generations a new island is protected from extinction.
    pub protected_age: u32,
    /// Percentage of low performing islands to go extinct.
    pub extinction_percentage: f32,
}

impl Default for IslandsConfig {
    fn default() -> Self {
        Self {
            island_size: 10,
            protected_age: 25,
            extinction_percentage: 0.25,
        }
    }
}

impl ConfigSection for IslandsConfig {
    fn section_name() -> &'static str {
        "islands"
    }

    fn validate(&self) -> Result<(), GridGpError> {
        if self.island_size < 1 {
            return Err(GridGpError::Configuration(
                "island_size must be >= 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.extinction_percentage) {
            return Err(GridGpError::Configuration(
                "extinction_percentage must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}
