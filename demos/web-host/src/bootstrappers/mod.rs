mod cache;
mod keys;
mod routes;

pub use cache::Cache;
pub use keys::SigningKeys;
