use crate::config::AppConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "city-distance")]
#[command(about = "Great-circle distances between cities, with an exportable history")]
pub struct CliArgs {
    #[arg(long, short, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Directory the history report is written to")]
    pub output_path: Option<String>,

    #[arg(long, help = "Geocoding search endpoint")]
    pub endpoint: Option<String>,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliArgs {
    /// Loads the configuration file (or defaults) and applies flag overrides.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(output_path) = &self.output_path {
            config.export.output_path = output_path.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.geocoder.endpoint = endpoint.clone();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = CliArgs::parse_from([
            "city-distance",
            "--output-path",
            "/tmp/out",
            "--endpoint",
            "http://localhost:8080/search",
        ]);

        let config = args.load_config().unwrap();
        assert_eq!(config.export.output_path, "/tmp/out");
        assert_eq!(config.geocoder.endpoint, "http://localhost:8080/search");
        assert_eq!(config.export.file_name, "last_5_distances.pdf");
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let args = CliArgs::parse_from(["city-distance", "--config", "/nonexistent/city.toml"]);
        assert!(args.load_config().is_err());
    }
}
