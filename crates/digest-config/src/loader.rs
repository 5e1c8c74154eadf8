use crate::schema::DigestConfig;
use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Jsonc,
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;

        match ext {
            "jsonc" => Some(Self::Jsonc),
            "json" => Some(Self::Json),
            "yml" | "yaml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: DigestConfig,
    pub path: PathBuf,
    pub format: ConfigFormat,
}

pub fn load_config(config_path: Option<&Path>) -> Result<DigestConfig> {
    resolve_config(config_path).map(|r| r.config)
}

/// Like [`load_config`], but an undiscovered file means built-in defaults.
///
/// An explicit `config_path` must still exist and parse.
pub fn load_config_or_default(config_path: Option<&Path>) -> Result<DigestConfig> {
    match config_path {
        Some(path) => load_config_from_file(path).map(|r| r.config),
        None => match find_config_file() {
            Some(path) => load_config_from_file(&path).map(|r| r.config),
            None => Ok(DigestConfig::default()),
        },
    }
}

pub fn resolve_config(config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let path = config_path
        .map(|p| p.to_path_buf())
        .or_else(find_config_file)
        .ok_or_else(|| anyhow!("No configuration file found"))?;

    load_config_from_file(&path)
}

pub fn load_config_from_file(path: &Path) -> Result<ResolvedConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let format = ConfigFormat::from_path(path)
        .ok_or_else(|| anyhow!("Unknown config format for: {}", path.display()))?;

    let config = expand_env_vars(parse_config_content(&content, format)?);
    config
        .validate()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;

    Ok(ResolvedConfig {
        config,
        path: path.to_path_buf(),
        format,
    })
}

fn parse_config_content(content: &str, format: ConfigFormat) -> Result<DigestConfig> {
    match format {
        ConfigFormat::Jsonc => json5::from_str(content).context("Failed to parse JSONC"),
        ConfigFormat::Json => serde_json::from_str(content).context("Failed to parse JSON"),
        ConfigFormat::Yaml => serde_yaml_ng::from_str(content).context("Failed to parse YAML"),
    }
}

const CONFIG_CANDIDATES: &[&str] = &[
    "digest.jsonc",
    "digest.json",
    "digest.yml",
    "digest.yaml",
    ".digest.jsonc",
    ".digest.json",
    ".digest.yml",
    ".digest.yaml",
];

/// Working directory first, then `~/.config/digest`
fn search_dirs() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".")];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config").join("digest"));
    }
    paths
}

fn config_files_in(dirs: &[PathBuf]) -> impl Iterator<Item = PathBuf> + '_ {
    dirs.iter().flat_map(|dir| {
        CONFIG_CANDIDATES
            .iter()
            .map(move |candidate| dir.join(candidate))
            .filter(|path| path.exists())
    })
}

fn find_config_file() -> Option<PathBuf> {
    config_files_in(&search_dirs()).next()
}

pub fn find_all_config_files() -> Vec<PathBuf> {
    config_files_in(&search_dirs()).collect()
}

fn expand_env_vars(mut config: DigestConfig) -> DigestConfig {
    config.provider.kind = expand_env_string(&config.provider.kind);
    config.provider.model = config.provider.model.as_deref().map(expand_env_string);
    config.telemetry.level = expand_env_string(&config.telemetry.level);
    config
}

/// Substitute `${VAR}` and `$VAR`; unknown variables are left as written
fn expand_env_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        if chars.peek() == Some(&'{') {
            chars.next();
            let name: String = chars.by_ref().take_while(|&c| c != '}').collect();
            match env::var(&name) {
                Ok(value) => result.push_str(&value),
                Err(_) => {
                    result.push_str("${");
                    result.push_str(&name);
                    result.push('}');
                }
            }
            continue;
        }

        let mut name = String::new();
        while let Some(&c) = chars.peek() {
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            name.push(c);
            chars.next();
        }

        match env::var(&name) {
            Ok(value) if !name.is_empty() => result.push_str(&value),
            _ => {
                result.push('$');
                result.push_str(&name);
            }
        }
    }

    result
}
