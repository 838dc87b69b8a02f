use clap::Parser;

/// Team rating store and in-play outcome predictor
#[derive(Parser, Debug, Clone)]
#[command(name = "live-odds", version, about)]
pub struct Config {
    /// Document store location (`:memory:`, `sqlite://<path>`, `file://<path>` or a plain path)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Logical database name reported by diagnostics
    #[arg(long, env = "DATABASE_NAME")]
    pub database_name: Option<String>,

    /// Listen host
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Listen port
    #[arg(long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Request body limit for video uploads (MiB)
    #[arg(long, env = "MAX_UPLOAD_MB", default_value = "512")]
    pub max_upload_mb: usize,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if matches!(&self.database_url, Some(url) if url.trim().is_empty()) {
            anyhow::bail!("DATABASE_URL must not be blank when set");
        }
        if matches!(&self.database_name, Some(name) if name.trim().is_empty()) {
            anyhow::bail!("DATABASE_NAME must not be blank when set");
        }
        if self.max_upload_mb == 0 {
            anyhow::bail!("max_upload_mb must be positive");
        }
        Ok(())
    }

    /// Store location and name, present only when both are configured.
    pub fn store_settings(&self) -> Option<(&str, &str)> {
        match (&self.database_url, &self.database_name) {
            (Some(url), Some(name)) => Some((url.as_str(), name.as_str())),
            _ => None,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["live-odds"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn store_requires_url_and_name() {
        let cfg = parse(&["--database-url", ":memory:"]);
        assert!(cfg.store_settings().is_none());

        let cfg = parse(&["--database-url", ":memory:", "--database-name", "odds"]);
        assert_eq!(cfg.store_settings(), Some((":memory:", "odds")));
    }

    #[test]
    fn blank_values_rejected() {
        let cfg = parse(&["--database-url", " ", "--database-name", "odds"]);
        assert!(cfg.validate().is_err());

        let cfg = parse(&["--max-upload-mb", "0"]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn listen_addr_uses_host_and_port() {
        let cfg = parse(&["--host", "127.0.0.1", "--port", "9100"]);
        assert_eq!(cfg.listen_addr(), "127.0.0.1:9100");
        assert_eq!(cfg.max_upload_bytes(), 512 * 1024 * 1024);
    }
}
