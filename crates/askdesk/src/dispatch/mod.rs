//! Provider registry and retrying dispatcher

mod dispatcher;
mod registry;

pub use dispatcher::{DispatchOutcome, ModelDispatcher, RequestRecord, RequestState};
pub use registry::ProviderRegistry;
