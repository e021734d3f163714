//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{WalkmeshError, WalkmeshResult};

use super::types::{Config, Verbosity};

/// Project-local config file name
pub const PROJECT_CONFIG_FILE: &str = "walkmesh.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> WalkmeshResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| WalkmeshError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    config
        .export
        .check_formats()
        .map_err(|message| WalkmeshError::InvalidConfig {
            file: path.to_path_buf(),
            message,
        })?;

    let warnings = unknown_paths
        .into_iter()
        .filter(|path_str| !path_str.starts_with("engine.extra_args"))
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Resolve explicit file, project file, user file, or defaults
pub fn resolve(explicit: Option<&Path>) -> WalkmeshResult<(Config, Vec<ConfigWarning>)> {
    if let Some(path) = explicit {
        let (config, warnings) = load_with_warnings(path)?;
        return Ok((with_env_overrides(config), warnings));
    }

    let project_config = PathBuf::from(PROJECT_CONFIG_FILE);
    if project_config.is_file() {
        let (config, warnings) = load_with_warnings(&project_config)?;
        return Ok((with_env_overrides(config), warnings));
    }

    if let Some(user_config) = user_config_path() {
        if user_config.is_file() {
            let (config, warnings) = load_with_warnings(&user_config)?;
            return Ok((with_env_overrides(config), warnings));
        }
    }

    Ok((with_env_overrides(Config::default()), Vec::new()))
}

/// Apply environment variable overrides (WALKMESH_* prefix)
pub fn with_env_overrides(mut config: Config) -> Config {
    if let Ok(program) = std::env::var("WALKMESH_COLMAP") {
        if !program.trim().is_empty() {
            config.engine.program = program;
        }
    }

    if let Ok(program) = std::env::var("WALKMESH_FFMPEG") {
        if !program.trim().is_empty() {
            config.video.ffmpeg = program;
        }
    }

    if let Ok(program) = std::env::var("WALKMESH_FFPROBE") {
        if !program.trim().is_empty() {
            config.video.ffprobe = program;
        }
    }

    if let Ok(program) = std::env::var("WALKMESH_VIEWER") {
        if !program.trim().is_empty() {
            config.viewer.program = program;
        }
    }

    // Unparseable numbers are ignored rather than fatal
    if let Ok(fps) = std::env::var("WALKMESH_FPS") {
        if let Ok(fps) = fps.trim().parse::<f64>() {
            config.sampling.fps = fps;
        }
    }

    if let Ok(max) = std::env::var("WALKMESH_MAX_FRAMES") {
        if let Ok(max) = max.trim().parse::<usize>() {
            config.sampling.max_frames = max;
        }
    }

    if let Ok(verbosity) = std::env::var("WALKMESH_VERBOSITY") {
        config.output.verbosity = match verbosity.to_lowercase().as_str() {
            "quiet" => Verbosity::Quiet,
            "verbose" => Verbosity::Verbose,
            "debug" => Verbosity::Debug,
            _ => Verbosity::Normal,
        };
    }

    config
}

/// User-level config file (`$XDG_CONFIG_HOME/walkmesh/config.toml`)
pub fn user_config_path() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("walkmesh").join("config.toml"))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "sampling",
        "fps",
        "max_frames",
        "jpeg_quality",
        "engine",
        "program",
        "sparse_model",
        "extra_args",
        "video",
        "ffmpeg",
        "ffprobe",
        "export",
        "dir",
        "basename",
        "mesh_formats",
        "point_cloud_format",
        "viewer",
        "output",
        "verbosity",
        "color",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = if ca == *cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}
