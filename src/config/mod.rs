pub mod cgp;
pub mod manager;
pub mod selection;
pub mod traits;

pub use cgp::{CgpConfig, FixedCountMutation, MutationStrategy, ProbabilisticMutation};
pub use manager::{AppConfig, ConfigManager};
pub use selection::IslandsConfig;
pub use traits::ConfigSection;
