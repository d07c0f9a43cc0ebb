//! CLI Module
//!
//! Command-line interface for building TouchMCU layouts.

pub mod commands;

use clap::Parser;
use std::path::PathBuf;

/// TouchMCU layout builder - generates a TouchOSC Mackie Control surface
#[derive(Parser, Debug)]
#[command(name = "touchmcu")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Overlay to build
    #[arg(short, long, env = "TOUCHMCU_OVERLAY", default_value = "default")]
    pub overlay: String,

    /// Open the generated layout after building
    #[arg(short, long, conflicts_with = "list")]
    pub show: bool,

    /// List available overlays and exit
    #[arg(short, long)]
    pub list: bool,

    /// Directory searched for overlays before the bundled set
    #[arg(long, env = "TOUCHMCU_OVERLAY_DIR", default_value = "overlays")]
    pub overlay_dir: PathBuf,

    /// Directory searched for scripts before the bundled set
    #[arg(long, env = "TOUCHMCU_SCRIPTS_DIR", default_value = "scripts")]
    pub scripts_dir: PathBuf,

    /// Where the .tosc file is written
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Everything a build needs, detached from argument parsing.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub overlay: String,
    pub overlay_dir: PathBuf,
    pub scripts_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl From<&Cli> for BuildConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            overlay: cli.overlay.clone(),
            overlay_dir: cli.overlay_dir.clone(),
            scripts_dir: cli.scripts_dir.clone(),
            output_dir: cli.output_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["touchmcu"]).unwrap();
        assert_eq!(cli.overlay, "default");
        assert!(!cli.show);
        assert_eq!(cli.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_overlay_and_show() {
        let cli = Cli::try_parse_from(["touchmcu", "-o", "studio", "-s"]).unwrap();
        let config = BuildConfig::from(&cli);
        assert_eq!(config.overlay, "studio");
        assert!(cli.show);
    }

    #[test]
    fn test_invalid_flags() {
        assert!(Cli::try_parse_from(["touchmcu", "--list", "--show"]).is_err());
        assert!(Cli::try_parse_from(["touchmcu", "--bogus"]).is_err());
        assert!(Cli::try_parse_from(["touchmcu", "-o"]).is_err());
    }
}
