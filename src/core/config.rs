use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub import: ImportConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Process-wide defaults for the bulk importer. Every field except `enabled`
/// can be overridden per request on `POST /import_data`.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Feature toggle. Logged at startup, not enforced by the core.
    pub enabled: bool,
    pub upload_dir: String,
    pub file_name: String,
    /// Threaded through and echoed in the report; does not alter validation.
    pub allow_blank: bool,
    pub delete_all: bool,
    /// Cap on data rows read (0 = unlimited, header not counted).
    pub max_lines: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            import: ImportConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // Conservative defaults for a small single-table service
    const DEFAULT_URL: &'static str = "sqlite://geolocation.db?mode=rwc";
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").unwrap_or_else(|_| Self::DEFAULT_URL.to_string());

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl ImportConfig {
    const DEFAULT_UPLOAD_DIR: &'static str = "uploads";
    const DEFAULT_FILE_NAME: &'static str = "data_dump.csv";

    pub fn from_env() -> Result<Self, String> {
        let enabled = env::var("IMPORT_ENABLED")
            .map(|v| v == "true")
            .unwrap_or(true);

        let upload_dir =
            env::var("UPLOAD_DIR").unwrap_or_else(|_| Self::DEFAULT_UPLOAD_DIR.to_string());

        let file_name =
            env::var("IMPORT_FILE_NAME").unwrap_or_else(|_| Self::DEFAULT_FILE_NAME.to_string());

        let allow_blank = env::var("IMPORT_ALLOW_BLANK")
            .map(|v| v == "true")
            .unwrap_or(false);

        let delete_all = env::var("IMPORT_DELETE_ALL")
            .map(|v| v == "true")
            .unwrap_or(true);

        let max_lines = env::var("IMPORT_MAX_LINES")
            .unwrap_or_else(|_| "0".to_string())
            .parse::<u64>()
            .map_err(|_| "IMPORT_MAX_LINES must be a valid number".to_string())?;

        Ok(Self {
            enabled,
            upload_dir,
            file_name,
            allow_blank,
            delete_all,
            max_lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_config_defaults() {
        let config = ImportConfig {
            enabled: true,
            upload_dir: ImportConfig::DEFAULT_UPLOAD_DIR.to_string(),
            file_name: ImportConfig::DEFAULT_FILE_NAME.to_string(),
            allow_blank: false,
            delete_all: true,
            max_lines: 0,
        };
        assert!(config.enabled);
        assert_eq!(config.upload_dir, "uploads");
        assert_eq!(config.file_name, "data_dump.csv");
        assert!(!config.allow_blank);
        assert!(config.delete_all);
        assert_eq!(config.max_lines, 0);
    }
}
