use crate::format::pdf::PdfSettings;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration, from flags or `CHECKER_*` environment variables.
#[derive(Parser, Debug, Clone)]
#[command(name = "feedback-backend", about = "Comment and debug checker feedback service")]
pub struct Config {
    #[arg(long, env = "CHECKER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "CHECKER_PORT", default_value_t = 8080)]
    pub port: u16,

    /// SQLite database file holding check records and feedback.
    #[arg(long, env = "CHECKER_DATABASE", default_value = "feedback.sqlite")]
    pub database: PathBuf,

    /// Directory with the TTF files used for PDF export.
    #[arg(long, env = "CHECKER_FONTS_DIR", default_value = "./fonts")]
    pub fonts_dir: PathBuf,

    #[arg(long, env = "CHECKER_FONT_FAMILY", default_value = "LiberationSans")]
    pub font_family: String,

    /// Seconds a staged upload waits for its extract call.
    #[arg(long, env = "CHECKER_DRAFT_TTL_SECS", default_value_t = 900)]
    pub draft_ttl_secs: u64,

    #[arg(long, env = "CHECKER_MAX_UPLOAD_BYTES", default_value_t = 1024 * 1024)]
    pub max_upload_bytes: usize,
}

/// Per-request settings shared with handlers as `web::Data`.
#[derive(Debug, Clone)]
pub struct Settings {
    pub max_upload_bytes: usize,
    pub pdf: PdfSettings,
}

impl Config {
    pub fn draft_ttl(&self) -> Duration {
        Duration::from_secs(self.draft_ttl_secs)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            max_upload_bytes: self.max_upload_bytes,
            pdf: PdfSettings {
                fonts_dir: self.fonts_dir.clone(),
                font_family: self.font_family.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "feedback-backend",
            "--port",
            "9090",
            "--database",
            "/tmp/checks.sqlite",
            "--draft-ttl-secs",
            "30",
        ])
        .expect("parse flags");

        assert_eq!(config.port, 9090);
        assert_eq!(config.database, PathBuf::from("/tmp/checks.sqlite"));
        assert_eq!(config.draft_ttl(), Duration::from_secs(30));
        assert_eq!(config.settings().pdf.fonts_dir, config.fonts_dir);
    }
}
