//! Service layer: session actors, their registry, and event delivery.

pub mod events;
pub mod registry;
pub mod session;

pub use events::{EventSink, RecordingSink, Recipient, TracingSink};
pub use registry::GameRegistry;
pub use session::SessionHandle;
