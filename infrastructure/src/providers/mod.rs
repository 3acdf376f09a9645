//! Provider adapters
//!
//! - [`CommandWorkerGateway`]: one provider CLI process per worker call
//! - [`RoutingWorkerGateway`]: picks the adapter bound to the request's participant
//! - [`PathProviderProbe`]: availability check used before a session starts

pub mod command;
pub mod error;
pub mod probe;
pub mod routing;

pub use command::CommandWorkerGateway;
pub use error::ProcessWorkerError;
pub use probe::PathProviderProbe;
pub use routing::RoutingWorkerGateway;
