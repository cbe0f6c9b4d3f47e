pub mod fixtures;
pub mod http;

pub use fixtures::{FixtureRegistry, FixtureTransport};
pub use http::HttpTransport;
