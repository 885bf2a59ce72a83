// ============================================================================
// STATE MODULE - Shared Rc<RefCell> state with change callbacks
// ============================================================================

pub mod collection_state;
pub mod reactivity;

pub use collection_state::{CollectionSnapshot, CollectionState, FetchTicket, SyncPolicy};
pub use reactivity::ReactiveState;
