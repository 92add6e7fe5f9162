use std::env;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DB_PATH: &str = "observatory.sqlite";
pub const DEFAULT_JSON_LIMIT_BYTES: usize = 1024 * 1024;
pub const DEFAULT_IDENTITY_HEADER: &str = "x-teacher-id";

/// Runtime settings, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// SQLite database file; created on first start.
    pub database_path: PathBuf,
    pub json_limit_bytes: usize,
    /// Header the upstream login layer sets to the authenticated teacher id.
    pub identity_header: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            json_limit_bytes: DEFAULT_JSON_LIMIT_BYTES,
            identity_header: DEFAULT_IDENTITY_HEADER.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Unset or unparsable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = env_u16(&lookup, "OBSERVATORY_PORT")
            .or_else(|| env_u16(&lookup, "PORT"))
            .unwrap_or(DEFAULT_PORT);

        Self {
            host: env_string(&lookup, "OBSERVATORY_HOST", DEFAULT_HOST),
            port,
            database_path: PathBuf::from(env_string(
                &lookup,
                "OBSERVATORY_DB_PATH",
                DEFAULT_DB_PATH,
            )),
            json_limit_bytes: env_usize(
                &lookup,
                "OBSERVATORY_JSON_LIMIT_BYTES",
                DEFAULT_JSON_LIMIT_BYTES,
            ),
            identity_header: env_string(
                &lookup,
                "OBSERVATORY_IDENTITY_HEADER",
                DEFAULT_IDENTITY_HEADER,
            )
            .to_ascii_lowercase(),
        }
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn env_string<F>(lookup: &F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u16<F>(lookup: &F, name: &str) -> Option<u16>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).and_then(|v| v.trim().parse::<u16>().ok())
}

fn env_usize<F>(lookup: &F, name: &str, default: usize) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.host, DEFAULT_HOST);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.database_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(cfg.identity_header, DEFAULT_IDENTITY_HEADER);
    }

    #[test]
    fn prefers_prefixed_port_over_platform_port() {
        let cfg = config_from(&[("PORT", "9000"), ("OBSERVATORY_PORT", "9100")]);
        assert_eq!(cfg.port, 9100);

        let cfg = config_from(&[("PORT", "9000")]);
        assert_eq!(cfg.port, 9000);
    }

    #[test]
    fn unparsable_values_fall_back() {
        let cfg = config_from(&[
            ("OBSERVATORY_PORT", "eighty"),
            ("OBSERVATORY_JSON_LIMIT_BYTES", "-1"),
            ("OBSERVATORY_HOST", "   "),
        ]);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.json_limit_bytes, DEFAULT_JSON_LIMIT_BYTES);
        assert_eq!(cfg.host, DEFAULT_HOST);
    }

    #[test]
    fn identity_header_is_normalized() {
        let cfg = config_from(&[("OBSERVATORY_IDENTITY_HEADER", "X-Auth-User")]);
        assert_eq!(cfg.identity_header, "x-auth-user");
    }
}
