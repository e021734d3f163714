//! Output Rendering
//!
//! Final success report, configuration warnings and geometry summaries.
//! Progress while a command runs goes through the event sinks instead.

use std::path::{Path, PathBuf};

use is_terminal::IsTerminal;

use crate::application::{ExportedArtifact, GeometrySummary, SampleResult};
use crate::config::{ColorMode, ConfigWarning};
use crate::domain::entities::ReconstructionManifest;

use super::cli::ColorWhen;

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Decide whether stdout gets ANSI colors
///
/// The `--color` flag wins over `[output] color`; `auto` honours `NO_COLOR`
/// and only colors a terminal.
pub fn use_color(flag: Option<ColorWhen>, config: ColorMode) -> bool {
    let mode = match flag {
        Some(ColorWhen::Always) => ColorMode::Always,
        Some(ColorWhen::Never) => ColorMode::Never,
        Some(ColorWhen::Auto) => ColorMode::Auto,
        None => config,
    };
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
        }
    }
}

fn paint(text: &str, code: &str, color: bool) -> String {
    if color {
        format!("{code}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Everything a command produced, in the order it was produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    entries: Vec<(String, PathBuf, Option<String>)>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.entries.push((name.into(), path.into(), None));
    }

    pub fn add_frames(&mut self, result: &SampleResult) {
        self.add("frames_dir", &result.output_dir);
    }

    pub fn add_manifest(&mut self, manifest: &ReconstructionManifest) {
        for (name, path) in manifest.entries() {
            if self.has(name) {
                continue;
            }
            self.add(name, path);
        }
    }

    pub fn add_exports(&mut self, exported: &[ExportedArtifact]) {
        for artifact in exported {
            self.entries.push((
                "export".to_string(),
                artifact.destination.clone(),
                Some(artifact.sha256.clone()),
            ));
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|(_, p, _)| p.as_path())
    }

    fn has(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _, _)| n == name)
    }

    /// `OK` followed by one line per produced path
    pub fn render_text(&self, color: bool) -> String {
        let width = self
            .entries
            .iter()
            .map(|(name, _, _)| name.len())
            .max()
            .unwrap_or(0);

        let mut out = paint("OK", GREEN, color);
        for (name, path, _) in &self.entries {
            out.push_str(&format!("\n  {name:<width$}  {}", path.display()));
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Value {
        let artifacts: Vec<serde_json::Value> = self
            .entries
            .iter()
            .map(|(name, path, sha256)| {
                let mut entry = serde_json::json!({
                    "name": name,
                    "path": path.display().to_string(),
                });
                if let Some(sha) = sha256 {
                    entry["sha256"] = serde_json::json!(sha);
                }
                entry
            })
            .collect();
        serde_json::json!({
            "event": "result",
            "status": "ok",
            "artifacts": artifacts,
        })
    }

    /// Print the report to stdout
    pub fn print(&self, json: bool, color: bool) {
        if json {
            println!("{}", self.to_json());
        } else {
            println!("{}", self.render_text(color));
        }
    }
}

/// One line for an ignored configuration key
pub fn render_warning(warning: &ConfigWarning, color: bool) -> String {
    let location = match warning.line {
        Some(line) => format!("{}:{line}", warning.file.display()),
        None => warning.file.display().to_string(),
    };
    let mut text = format!(
        "{} unknown config key '{}' in {location}",
        paint("warning:", YELLOW, color),
        warning.key
    );
    if let Some(suggestion) = &warning.suggestion {
        text.push_str(&format!(" (did you mean '{suggestion}'?)"));
    }
    text
}

/// Print configuration warnings to stderr
pub fn print_warnings(warnings: &[ConfigWarning], json: bool, color: bool) {
    for warning in warnings {
        if json {
            let event = serde_json::json!({
                "event": "config_warning",
                "key": warning.key,
                "file": warning.file.display().to_string(),
                "line": warning.line,
                "suggestion": warning.suggestion,
            });
            eprintln!("{event}");
        } else {
            eprintln!("{}", render_warning(warning, color));
        }
    }
}

/// Counts and extent of a loaded artifact
pub fn render_summary(path: &Path, summary: &GeometrySummary) -> String {
    let mut text = format!("{} ({})", path.display(), summary.kind);
    if summary.triangles > 0 {
        text.push_str(&format!(
            "\n  {} vertices, {} triangles",
            summary.vertices, summary.triangles
        ));
    } else {
        text.push_str(&format!("\n  {} points", summary.vertices));
    }
    if let Some(bounds) = summary.bounds {
        let [x, y, z] = bounds.extent();
        text.push_str(&format!(
            "\n  bounds [{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}] (extent {x:.3} x {y:.3} x {z:.3})",
            bounds.min[0], bounds.min[1], bounds.min[2], bounds.max[0], bounds.max[1], bounds.max[2],
        ));
    }
    text
}
