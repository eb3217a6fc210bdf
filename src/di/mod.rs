mod builder;
mod container;
mod extractor;
mod injectable;

pub use builder::ServiceCollection;
pub use container::{Container, Resolve};
pub use extractor::{HasContainer, Inject};
pub use injectable::Injectable;
