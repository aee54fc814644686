use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use marquee_core::AppError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Memory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone)]
pub struct RootAdminConfig {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub storage: StorageConfig,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub debug: bool,
    pub app_version: String,
    pub root_tenant_name: String,
    pub file_manager_src_prefix: String,
    pub root_admin: Option<RootAdminConfig>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let storage = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "memory".to_owned())
            .as_str()
        {
            "memory" => StorageConfig::Memory,
            "postgres" => StorageConfig::Postgres {
                database_url: required_non_empty_env("DATABASE_URL")?,
            },
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE_BACKEND must be either 'memory' or 'postgres', got '{other}'"
                )));
            }
        };

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);
        let debug = env::var("DEBUG")
            .unwrap_or_else(|_| "false".to_owned())
            .eq_ignore_ascii_case("true");

        let app_version = optional_env("APP_VERSION")
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_owned());
        let root_tenant_name = optional_env("ROOT_TENANT_NAME").unwrap_or_else(|| "Root".to_owned());
        let file_manager_src_prefix =
            optional_env("FILE_MANAGER_SRC_PREFIX").unwrap_or_else(|| "/files/".to_owned());

        let root_admin = match (optional_env("ROOT_ADMIN_EMAIL"), optional_env("ROOT_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(RootAdminConfig { email, password }),
            (None, None) => None,
            _ => {
                return Err(AppError::Validation(
                    "ROOT_ADMIN_EMAIL and ROOT_ADMIN_PASSWORD must be set together".to_owned(),
                ));
            }
        };

        Ok(Self {
            migrate_only,
            storage,
            frontend_url,
            api_host,
            api_port,
            debug,
            app_version,
            root_tenant_name,
            file_manager_src_prefix,
            root_admin,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    optional_env(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
}
