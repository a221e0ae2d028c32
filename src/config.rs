use crate::error::{BadEnvVarSnafu, ParsePortSnafu, RecordResult};
use dotenvy::var;
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use std::sync::Arc;

pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    db_config: Arc<DbConfig>,
    server_config: ServerConfig,
}

impl RuntimeConfiguration {
    pub fn new() -> RecordResult<Self> {
        Ok(Self {
            db_config: Arc::new(DbConfig::new()?),
            server_config: ServerConfig::new()?,
        })
    }

    pub fn db_config(&self) -> Arc<DbConfig> {
        self.db_config.clone()
    }

    pub const fn server_config(&self) -> &ServerConfig {
        &self.server_config
    }
}

#[derive(Debug)]
pub struct DbConfig {
    url: SecretString,
}

impl DbConfig {
    pub fn new() -> RecordResult<Self> {
        let name = "DATABASE_URL";
        Ok(Self {
            url: SecretString::from(var(name).context(BadEnvVarSnafu { name })?),
        })
    }

    pub fn get_db_path(&self) -> &str {
        self.url.expose_secret()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new() -> RecordResult<Self> {
        Self::from_vars(var("SERVER_HOST").ok(), var("PORT").ok())
    }

    fn from_vars(host: Option<String>, port: Option<String>) -> RecordResult<Self> {
        let port = match port.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_PORT,
            Some(port) => port.parse().context(ParsePortSnafu)?,
        };

        Ok(Self {
            host: host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordError;

    #[test]
    fn port_defaults_to_80() {
        let config = ServerConfig::from_vars(None, None).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bind_address(), "0.0.0.0:80");
    }

    #[test]
    fn port_and_host_can_be_overridden() {
        let config =
            ServerConfig::from_vars(Some("127.0.0.1".into()), Some("3000".into())).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let err = ServerConfig::from_vars(None, Some("eighty".into())).unwrap_err();
        assert!(matches!(err, RecordError::ParsePort { .. }));
    }
}
