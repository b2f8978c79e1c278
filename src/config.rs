use std::path::PathBuf;

use serde::Deserialize;

use crate::render::{ColorMode, RenderMode};

/// User configuration loaded from the config file.
/// All fields are optional — CLI flags override config, config overrides defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Title text ('\n' splits lines)
    pub text: Option<String>,
    /// Default render mode
    pub render: Option<RenderModeConfig>,
    /// Default color mode
    pub color: Option<ColorModeConfig>,
    /// Target FPS (1-120)
    pub fps: Option<u32>,
    /// Particle density scale factor (0.5-2.0)
    pub scale: Option<f64>,
    /// Hide the status bar
    pub clean: Option<bool>,
    /// Background music file
    pub bgm: Option<PathBuf>,
    /// Disable all sound
    pub silent: Option<bool>,
    /// Start with the automatic launch scheduler on
    pub auto: Option<bool>,
    /// Trace the title with path fireworks on startup
    pub intro: Option<bool>,
}

/// Render mode names for the config file (kebab-case friendly)
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderModeConfig {
    Braille,
    HalfBlock,
    Ascii,
}

impl From<RenderModeConfig> for RenderMode {
    fn from(c: RenderModeConfig) -> Self {
        match c {
            RenderModeConfig::Braille => RenderMode::Braille,
            RenderModeConfig::HalfBlock => RenderMode::HalfBlock,
            RenderModeConfig::Ascii => RenderMode::Ascii,
        }
    }
}

/// Color mode names for the config file (kebab-case friendly)
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorModeConfig {
    Mono,
    Ansi16,
    Ansi256,
    TrueColor,
}

impl From<ColorModeConfig> for ColorMode {
    fn from(c: ColorModeConfig) -> Self {
        match c {
            ColorModeConfig::Mono => ColorMode::Mono,
            ColorModeConfig::Ansi16 => ColorMode::Ansi16,
            ColorModeConfig::Ansi256 => ColorMode::Ansi256,
            ColorModeConfig::TrueColor => ColorMode::TrueColor,
        }
    }
}

/// Config file path: ~/.config/skyburst/config.toml
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("skyburst").join("config.toml"))
}

/// Load config from file. Returns the default config if the file doesn't exist.
pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let Ok(contents) = std::fs::read_to_string(&path) else {
        return Config::default();
    };
    match toml::from_str(&contents) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: failed to parse {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Write a commented default config file and print where it went.
pub fn write_default() -> std::io::Result<()> {
    let Some(path) = config_path() else {
        eprintln!("No config directory on this platform");
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&path, default_config_string())?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Default config file contents with all options commented out
pub fn default_config_string() -> String {
    r#"# skyburst configuration
# CLI flags override these settings.

# Title text ('\n' in the CLI arg splits lines)
# text = "2026"

# Render mode: braille, half-block, ascii
# render = "braille"

# Color mode: mono, ansi16, ansi256, true-color
# color = "true-color"

# Target FPS (1-120)
# fps = 60

# Particle density scale factor (0.5-2.0)
# scale = 1.0

# Hide the status bar
# clean = false

# Background music file (falls back to the built-in melody)
# bgm = "bgm.mp3"

# Disable all sound
# silent = false

# Start with the automatic launch scheduler on
# auto = true

# Trace the title with path fireworks on startup
# intro = true
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.text.is_none());
        assert!(config.fps.is_none());
        assert!(config.auto.is_none());
    }

    #[test]
    fn kebab_case_modes_parse() {
        let config: Config =
            toml::from_str("render = \"half-block\"\ncolor = \"true-color\"\nfps = 30").unwrap();
        assert!(matches!(
            config.render.map(RenderMode::from),
            Some(RenderMode::HalfBlock)
        ));
        assert!(matches!(
            config.color.map(ColorMode::from),
            Some(ColorMode::TrueColor)
        ));
        assert_eq!(config.fps, Some(30));
    }

    #[test]
    fn default_template_round_trips_when_uncommented() {
        let uncommented: String = default_config_string()
            .lines()
            .filter_map(|l| l.strip_prefix("# "))
            .filter(|l| l.contains('='))
            .collect::<Vec<_>>()
            .join("\n");
        let config: Config = toml::from_str(&uncommented).unwrap();
        assert_eq!(config.text.as_deref(), Some("2026"));
        assert_eq!(config.fps, Some(60));
    }
}
