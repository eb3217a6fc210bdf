use bootwright::prelude::*;

/// Key material the rest of the host signs with.
pub struct SigningKeys {
    secret: String,
}

impl SigningKeys {
    pub fn fingerprint(&self) -> String {
        let sum = self
            .secret
            .bytes()
            .fold(0u32, |acc, b| acc.rotate_left(5) ^ u32::from(b));
        format!("{:08x}", sum)
    }
}

pub struct KeysBootstrapper;

#[bootstrapper(priority = 100)]
impl KeysBootstrapper {
    pub fn configure_services(services: ServiceCollection, config: &ConfigService) -> Result<()> {
        let secret = config.get("SIGNING_SECRET").unwrap_or_else(|| {
            tracing::warn!("SIGNING_SECRET not set, using a development key");
            "development".to_string()
        });
        services.register(SigningKeys { secret })
    }
}
