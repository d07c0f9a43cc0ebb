//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::Path;
use std::process::Command;

use log::{info, warn};

use super::BuildConfig;
use crate::compose::{compose, mcu_plan, output_path, ROOT_SCRIPTS};
use crate::error::{Result, TouchMcuError};
use crate::factories::FactoryRegistry;
use crate::layout::SaveReport;
use crate::overlay::OverlaySource;
use crate::scripts::ScriptLibrary;

/// Build the layout for the configured overlay and save it.
pub fn build(config: &BuildConfig) -> Result<SaveReport> {
    info!("Building overlay '{}'", config.overlay);

    let overlay = OverlaySource::new(&config.overlay_dir).resolve(&config.overlay)?;
    let script = ScriptLibrary::with_dir(&config.scripts_dir).load_all(&ROOT_SCRIPTS)?;

    let mut doc = compose(&overlay, &script, &FactoryRegistry::with_defaults(), &mcu_plan())?;

    fs::create_dir_all(&config.output_dir).map_err(|e| TouchMcuError::FileWriteError {
        path: config.output_dir.clone(),
        source: e,
    })?;
    let path = output_path(&config.output_dir, &overlay);
    let report = doc.save(&path)?;

    println!("Layout written: {}", report.path.display());
    println!("Size: {} bytes", report.bytes);

    Ok(report)
}

/// Print every overlay name that can be built.
pub fn list_overlays(overlay_dir: &Path) -> Result<()> {
    let names = OverlaySource::new(overlay_dir).list();
    if names.is_empty() {
        println!("No overlays found");
        return Ok(());
    }

    println!("Available overlays:");
    for name in names {
        println!("  {}", name);
    }
    Ok(())
}

/// Open `path` in the platform's default handler.
///
/// A missing opener is not fatal; the file has already been written.
pub fn preview(path: &Path) {
    info!("Opening {}", path.display());

    let status = opener(path).status();
    match status {
        Ok(s) if s.success() => {}
        Ok(s) => warn!("Preview exited with {}", s),
        Err(e) => warn!("Could not open {}: {}", path.display(), e),
    }
}

fn opener(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &Path, overlay: &str) -> BuildConfig {
        BuildConfig {
            overlay: overlay.to_string(),
            overlay_dir: dir.join("overlays"),
            scripts_dir: dir.join("scripts"),
            output_dir: dir.join("out"),
        }
    }

    #[test]
    fn test_build_default() {
        let dir = tempfile::tempdir().unwrap();
        let report = build(&config(dir.path(), "default")).unwrap();

        assert_eq!(report.path, dir.path().join("out").join("TouchMCU.tosc"));
        assert!(report.path.exists());
        assert_eq!(report.sha256.len(), 64);
    }

    #[test]
    fn test_build_unknown_overlay_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let err = build(&config(dir.path(), "nope")).unwrap_err();

        assert_eq!(err.error_code(), "OVERLAY_NOT_FOUND");
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_list_overlays() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_overlays(dir.path()).is_ok());
    }
}
