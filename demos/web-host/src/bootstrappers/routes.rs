use super::Cache;
use bootwright::prelude::*;

pub struct RoutesBootstrapper;

#[bootstrapper]
impl RoutesBootstrapper {
    pub async fn decorate_app_async(app: Application, cache: Arc<Cache>) {
        let services = app.container().len();
        cache.insert("services", services.to_string()).await;
        tracing::info!("Application decorated with {} services", services);
    }
}
