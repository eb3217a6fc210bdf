use crate::di::Resolve;
use crate::error::Result;

/// Trait for types that can be built from resolvable dependencies
///
/// This trait is typically implemented automatically via the `#[derive(Injectable)]` macro.
/// Bootstrappers with instance hooks (`&self` receivers) must implement it: the
/// instance is created per invocation from the hook's context, so fields can name
/// both ambient objects (the builder, the application) and registered services.
///
/// # Example
/// ```
/// use bootwright::Injectable;
/// use std::sync::Arc;
///
/// trait UserRepository: Send + Sync {}
///
/// #[derive(Injectable)]
/// pub struct SeedUsers {
///     // Resolved through the container's trait bindings
///     repository: Arc<dyn UserRepository>,
/// }
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Create an instance by resolving dependencies
    ///
    /// # Errors
    /// Returns an error if any required dependency cannot be resolved.
    fn inject<R: Resolve + ?Sized>(resolver: &R) -> Result<Self>;
}
