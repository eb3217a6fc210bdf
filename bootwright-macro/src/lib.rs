use proc_macro::TokenStream;

mod bootstrapper;
mod injectable;

/// Derive macro for building a struct from resolvable dependencies
///
/// Fields typed `Arc<T>` resolve `T`; fields typed `Arc<dyn Trait>` resolve a
/// trait binding.
///
/// # Example
/// ```ignore
/// use bootwright::Injectable;
///
/// #[derive(Injectable)]
/// pub struct SeedUsers {
///     repository: Arc<dyn UserRepository>,
/// }
/// ```
#[proc_macro_derive(Injectable)]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    injectable::derive_injectable(input)
}

/// Attribute macro marking an impl block as a bootstrapper
///
/// A `pub fn` becomes a hook when its name is one of the built-in hook names
/// (`configure_services`, `decorate_wasm_app_async`, ...), or when it carries
/// `#[hook]` for use with custom aliases. Other methods, public or not, are left
/// alone. Associated functions are called directly; methods taking `&self`
/// build the instance per call through `Injectable`. Parameters are resolved
/// from the hook context: `Arc<T>`, `Arc<dyn Trait>`, `&T`, `&dyn Trait`, the
/// context itself, or any other `Clone` type by value.
///
/// A hook is deferred when it is an `async fn` or its return type is written
/// as `impl Future<..>`, `Pin<..>`, `BoxFuture<..>` or `HookFuture`. Detection
/// is by the written type name only: a type alias for a future or a
/// `JoinHandle` counts as immediate, and in an `_async` slot that gets the
/// whole bootstrapper rejected.
///
/// # Example
/// ```ignore
/// use bootwright::bootstrapper;
///
/// pub struct CacheBootstrapper;
///
/// #[bootstrapper(priority = 500)]
/// impl CacheBootstrapper {
///     pub fn configure_services(services: ServiceCollection) -> bootwright::Result<()> {
///         services.register(Cache::default())
///     }
///
///     pub async fn initialize_services_async(cache: Arc<Cache>) -> anyhow::Result<()> {
///         cache.warm_up().await
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn bootstrapper(attr: TokenStream, item: TokenStream) -> TokenStream {
    bootstrapper::bootstrapper_attribute(attr, item)
}
