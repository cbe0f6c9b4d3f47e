pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use frameworks::config::ClientSettings;
pub use frameworks::runner::{build_api, run, run_with_config};
