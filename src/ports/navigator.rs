//! Navigator port: the one-way door out of a gating decision.

use crate::domain::gating::Destination;

/// Performs a navigation on behalf of a gating component.
///
/// # Contract
///
/// - Gating navigations always pass `replace = true` so the decision is
///   never revisitable via the back button
/// - Implementations must tolerate being called at most once per
///   activation; the machine guarantees they are never called twice
pub trait Navigator: Send + Sync {
    /// Navigate to a destination. `replace` swaps the current history
    /// entry instead of pushing a new one.
    fn navigate(&self, destination: Destination, replace: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigator_trait_is_object_safe_and_send_sync() {
        fn _assert_trait_object(_: &dyn Navigator) {}
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn Navigator>>();
    }
}
