use crate::core::export::{ReportLayout, DEFAULT_FILE_NAME};
use crate::core::ledger::DEFAULT_CAPACITY;
use crate::core::PlaceCatalog;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{
    validate_file_name, validate_non_empty_string, validate_path, validate_positive_number,
    validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub geocoder: GeocoderConfig,
    pub catalog: CatalogConfig,
    pub history: HistoryConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub places: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            places: PlaceCatalog::default()
                .places()
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_path: String,
    pub file_name: String,
    pub layout: ReportLayout,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            layout: ReportLayout::default(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn place_catalog(&self) -> PlaceCatalog {
        PlaceCatalog::new(self.catalog.places.iter().cloned())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("geocoder.endpoint", &self.geocoder.endpoint)?;
        validate_non_empty_string("geocoder.user_agent", &self.geocoder.user_agent)?;
        validate_positive_number(
            "geocoder.timeout_seconds",
            self.geocoder.timeout_seconds as usize,
            1,
        )?;

        if self.catalog.places.is_empty() {
            return Err(AppError::MissingConfigError {
                field: "catalog.places".to_string(),
            });
        }
        for place in &self.catalog.places {
            validate_non_empty_string("catalog.places", place)?;
        }

        validate_positive_number("history.capacity", self.history.capacity, 1)?;

        validate_path("export.output_path", &self.export.output_path)?;
        validate_file_name("export.file_name", &self.export.file_name, "pdf")?;

        let layout = &self.export.layout;
        validate_range("export.layout.font_size", layout.font_size, 4.0, 72.0)?;
        validate_range("export.layout.title_font_size", layout.title_font_size, 4.0, 72.0)?;
        validate_range("export.layout.cell_padding", layout.cell_padding, 0.0, 100.0)?;
        validate_range("export.layout.border_width", layout.border_width, 0.0, 10.0)?;
        validate_range("export.layout.page_width", layout.page_width, 72.0, 14400.0)?;
        validate_range("export.layout.page_height", layout.page_height, 72.0, 14400.0)?;
        validate_range("export.layout.title_top", layout.title_top, 0.0, layout.page_height)?;
        validate_range("export.layout.table_top", layout.table_top, 0.0, layout.page_height)?;
        validate_range("export.layout.margin", layout.margin, 0.0, layout.page_width / 2.0)?;
        layout.paginate(1).map_err(|_| AppError::ConfigValidationError {
            field: "export.layout".to_string(),
            message: "page cannot fit a header row and one data row".to_string(),
        })?;

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
