use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::registry::DEFAULT_REFERENCE_PREFIX;
use crate::transform::ConvertOptions;
use crate::transform::text::DEFAULT_LINE_SEPARATOR;

/// Top-level project configuration loaded from `.sockhook.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SockhookConfig {
    pub input: String,
    /// Where to write the hook records. `None` writes to stdout.
    pub output: Option<String>,
    pub format: OutputFormat,
    pub registry: RegistryConfig,
    pub text: TextConfig,
}

impl Default for SockhookConfig {
    fn default() -> Self {
        Self {
            input: "routes.yaml".to_string(),
            output: None,
            format: OutputFormat::Json,
            registry: RegistryConfig::default(),
            text: TextConfig::default(),
        }
    }
}

impl SockhookConfig {
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            reference_prefix: self.registry.reference_prefix.clone(),
            line_separator: self.text.join_with.clone(),
        }
    }
}

/// Serialization format of the converted records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Type registry options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Prepended to a model name to build its reference.
    pub reference_prefix: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            reference_prefix: DEFAULT_REFERENCE_PREFIX.to_string(),
        }
    }
}

/// Description text options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Separator between the lines of multi-line descriptions.
    pub join_with: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            join_with: DEFAULT_LINE_SEPARATOR.to_string(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".sockhook.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<SockhookConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: SockhookConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r##"# sockhook configuration
input: routes.yaml
# output: hooks.json    # omit to write to stdout
format: json            # json | yaml

registry:
  reference_prefix: "#/definitions/"

text:
  join_with: "\n"       # separator for multi-line descriptions
"##
}
