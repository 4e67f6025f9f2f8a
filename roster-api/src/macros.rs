//! Utility macros for reducing boilerplate

/// Implement `FromRef<AppState>` so a handler can extract one field of the
/// application state directly.
///
/// # Example
/// ```ignore
/// impl_from_ref!(CachedUserStore, cached_store);
/// // Expands to:
/// impl axum::extract::FromRef<AppState> for CachedUserStore {
///     fn from_ref(state: &AppState) -> Self {
///         state.cached_store.clone()
///     }
/// }
/// ```
#[macro_export]
macro_rules! impl_from_ref {
    ($type:ty, $field:ident) => {
        impl axum::extract::FromRef<$crate::state::AppState> for $type {
            fn from_ref(state: &$crate::state::AppState) -> Self {
                state.$field.clone()
            }
        }
    };
}
