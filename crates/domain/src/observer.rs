//! Observer — an endpoint receiving events it has been registered for.

use std::sync::Arc;

use crate::error::ObserverError;
use crate::event::Event;

/// Capability contract for event subscribers.
pub trait Observer: Send + Sync {
    /// Human-readable name used in diagnostics and failure reports.
    fn name(&self) -> &str;

    /// Handle a delivered event.
    ///
    /// # Errors
    ///
    /// Returns an [`ObserverError`] if the observer cannot handle the event.
    fn update(&self, event: &Event) -> Result<(), ObserverError>;
}

/// Whether two observer references point at the same allocation.
///
/// Observer identity is the object, not its name: two observers reporting
/// the same name are still distinct subscribers.
#[must_use]
pub fn same_observer(a: &Arc<dyn Observer>, b: &Arc<dyn Observer>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
