pub mod envelope;
pub mod errors;
pub mod exchange;
pub mod navigation;
pub mod operations;
pub mod payload;
pub mod ports;
pub mod prescriptions;
pub mod session;

// Re-export the domain boundary types and ports.
pub use envelope::{Envelope, ErrorCode, RawEnvelope, ResponseClass};
pub use errors::{BindingError, ClientBuildError};
pub use exchange::{Exchange, RequestContext, TransportRequest, Verb};
pub use navigation::{ErrorContext, Navigation, Outcome};
pub use operations::{EndpointConfig, Operation};
pub use payload::Payload;
pub use ports::{Clock, Navigator, SessionStore, Transport};
pub use session::Lifetime;
