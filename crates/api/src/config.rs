use std::path::PathBuf;

use vidhub_media::cloudinary::{MediaConfig, DEFAULT_API_BASE};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Built once in `main` and shared through [`crate::state::AppState`]; no
/// other code reads the process environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Whether auth cookies carry the `Secure` attribute (default: `true`).
    pub cookie_secure: bool,
    /// Directory uploads are staged in before being sent to the media host.
    pub upload_temp_dir: PathBuf,
    /// Largest accepted request body in bytes (default: 100 MiB).
    pub max_upload_bytes: usize,
    /// Token secrets and lifetimes.
    pub jwt: JwtConfig,
    /// Media host credentials.
    pub media: MediaConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `COOKIE_SECURE`        | `true`                     |
    /// | `UPLOAD_TEMP_DIR`      | `./public/temp`            |
    /// | `MAX_UPLOAD_BYTES`     | `104857600`                |
    ///
    /// Token settings are read by [`JwtConfig::from_env`], media host
    /// settings by [`media_config_from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let cookie_secure: bool = std::env::var("COOKIE_SECURE")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("COOKIE_SECURE must be `true` or `false`");

        let upload_temp_dir = std::env::var("UPLOAD_TEMP_DIR")
            .unwrap_or_else(|_| "./public/temp".into())
            .into();

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "104857600".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            cookie_secure,
            upload_temp_dir,
            max_upload_bytes,
            jwt: JwtConfig::from_env(),
            media: media_config_from_env(),
        }
    }
}

/// Load media host credentials.
///
/// | Env Var            | Required | Default                            |
/// |--------------------|----------|------------------------------------|
/// | `MEDIA_CLOUD_NAME` | **yes**  | --                                 |
/// | `MEDIA_API_KEY`    | **yes**  | --                                 |
/// | `MEDIA_API_SECRET` | **yes**  | --                                 |
/// | `MEDIA_API_BASE`   | no       | `https://api.cloudinary.com/v1_1`  |
///
/// # Panics
///
/// Panics if a required variable is missing.
pub fn media_config_from_env() -> MediaConfig {
    let required = |name: &str| {
        std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set in the environment"))
    };

    MediaConfig {
        cloud_name: required("MEDIA_CLOUD_NAME"),
        api_key: required("MEDIA_API_KEY"),
        api_secret: required("MEDIA_API_SECRET"),
        api_base: std::env::var("MEDIA_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.into()),
    }
}
