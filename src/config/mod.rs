// Configuration
// Artifact paths from ~/.craftbot/config.toml, defaults otherwise

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Exported seq2seq model (ONNX).
    pub model_path: PathBuf,
    /// Vocabulary file (tokenizers JSON).
    pub tokenizer_path: PathBuf,
    /// Directory holding one profile file per user.
    pub profiles_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("Minecraft_chatbot.onnx"),
            tokenizer_path: PathBuf::from("Minecraft_tokenizer.json"),
            profiles_dir: PathBuf::from("./profiles"),
        }
    }
}

/// Load configuration from `~/.craftbot/config.toml`.
///
/// A missing file (or an undeterminable home directory) falls back to
/// the defaults; a file that exists but does not parse is fatal.
pub fn load_config() -> Result<Config> {
    let Some(home) = dirs::home_dir() else {
        return Ok(Config::default());
    };
    let config_path = home.join(".craftbot/config.toml");
    if !config_path.exists() {
        return Ok(Config::default());
    }

    let contents = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;
    Ok(config)
}
