use config::ConfigError;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub port: u16,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port
        )
    }
}

/// Token signing settings.
///
/// Access and refresh tokens are signed with independent secrets so a leaked
/// access token can never mint refresh tokens, and vice versa.
#[derive(serde::Deserialize, Clone)]
pub struct JwtSettings {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_token_expiry: i64,  // seconds (default 900 = 15 minutes)
    pub refresh_token_expiry: i64, // seconds (default 604800 = 7 days)
    pub issuer: String,
}

/// Load settings from `configuration.yaml` plus `APP__`-prefixed environment
/// overrides (e.g. `APP__JWT__ACCESS_SECRET`).
///
/// Missing or empty signing secrets are a startup failure, not a runtime one.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .set_default("jwt.access_token_expiry", 900_i64)?
        .set_default("jwt.refresh_token_expiry", 604_800_i64)?
        .set_default("jwt.issuer", "mflix")?
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?;
    let settings = settings.try_deserialize::<Settings>()?;

    if settings.jwt.access_secret.is_empty() {
        return Err(ConfigError::NotFound("jwt.access_secret".to_string()));
    }
    if settings.jwt.refresh_secret.is_empty() {
        return Err(ConfigError::NotFound("jwt.refresh_secret".to_string()));
    }

    Ok(settings)
}
