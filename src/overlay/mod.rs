//! Overlay Module
//!
//! An overlay customizes one project's surface: the output title, the
//! eight track labels/colors, and per-section button attributes. It is
//! loaded once per run and only read afterwards. Lookups never default:
//! a missing key is an error so a malformed overlay cannot silently
//! mislabel controls.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use include_dir::{include_dir, Dir};
use log::{debug, info};
use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::{Result, TouchMcuError};
use crate::layout::Color;
use crate::mcu::STRIP_COUNT;

/// Overlays shipped inside the binary.
pub static BUNDLED_OVERLAYS: Dir = include_dir!("$CARGO_MANIFEST_DIR/overlays");

/// Overlay file extension.
pub const OVERLAY_EXTENSION: &str = "json";

/// Sections every overlay must define.
pub const REQUIRED_SECTIONS: [&str; 10] = [
    "timecode",
    "assignment",
    "fader_banks",
    "global_view",
    "function_select",
    "modifiers",
    "automation",
    "utilities",
    "transport",
    "jog",
];

#[derive(Debug, Deserialize)]
struct RawOverlay {
    overlay_title: Option<String>,
    tracks: Option<Vec<RawEntry>>,
    sections: Option<BTreeMap<String, BTreeMap<String, RawEntry>>>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    label: Option<String>,
    color: Option<String>,
    enabled: Option<bool>,
}

/// Attributes of one button or track
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub label: String,
    pub color: Option<Color>,
    pub enabled: bool,
}

/// Attributes of one channel strip
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEntry {
    pub label: String,
    pub color: Color,
    pub enabled: bool,
}

/// Named group of entries
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    name: String,
    entries: BTreeMap<String, Entry>,
}

impl Section {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry(&self, key: &str) -> Result<&Entry> {
        self.entries.get(key).ok_or_else(|| TouchMcuError::MissingKey {
            key: format!("sections.{}.{}", self.name, key),
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Immutable per-project configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    name: String,
    title: String,
    tracks: Vec<TrackEntry>,
    sections: BTreeMap<String, Section>,
}

impl Overlay {
    /// Load an overlay file.
    pub fn load(path: &Path) -> Result<Self> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        if !path.is_file() {
            return Err(TouchMcuError::OverlayNotFound {
                name,
                searched: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path).map_err(|e| TouchMcuError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&name, &content)
    }

    /// Parse and validate overlay JSON.
    pub fn from_json(name: &str, json: &str) -> Result<Self> {
        let schema = |reason: String| TouchMcuError::OverlaySchema {
            name: name.to_string(),
            reason,
        };

        let raw: RawOverlay =
            serde_json::from_str(json).map_err(|e| schema(format!("not valid JSON: {e}")))?;

        let title = raw
            .overlay_title
            .ok_or_else(|| schema("missing 'overlay_title'".to_string()))?;
        if title.trim().is_empty() || title.contains(['/', '\\']) || title == ".." {
            return Err(schema(format!("'{title}' is not a usable file name")));
        }

        let raw_tracks = raw
            .tracks
            .ok_or_else(|| schema("missing 'tracks'".to_string()))?;
        if raw_tracks.len() != STRIP_COUNT {
            return Err(schema(format!(
                "'tracks' must have {} entries, found {}",
                STRIP_COUNT,
                raw_tracks.len()
            )));
        }
        let tracks = raw_tracks
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let label = entry
                    .label
                    .ok_or_else(|| schema(format!("tracks[{i}] is missing 'label'")))?;
                let color_id = entry
                    .color
                    .ok_or_else(|| schema(format!("tracks[{i}] is missing 'color'")))?;
                let color = Color::from_id(&color_id)
                    .map_err(|_| schema(format!("tracks[{i}] has unknown color '{color_id}'")))?;
                Ok(TrackEntry {
                    label,
                    color,
                    enabled: entry.enabled.unwrap_or(true),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let raw_sections = raw
            .sections
            .ok_or_else(|| schema("missing 'sections'".to_string()))?;
        if let Some(missing) = REQUIRED_SECTIONS
            .iter()
            .find(|s| !raw_sections.contains_key(**s))
        {
            return Err(schema(format!("missing section '{missing}'")));
        }

        let mut sections = BTreeMap::new();
        for (section_name, raw_entries) in raw_sections {
            let mut entries = BTreeMap::new();
            for (key, entry) in raw_entries {
                let label = entry.label.ok_or_else(|| {
                    schema(format!("sections.{section_name}.{key} is missing 'label'"))
                })?;
                let color = entry
                    .color
                    .map(|id| {
                        Color::from_id(&id).map_err(|_| {
                            schema(format!(
                                "sections.{section_name}.{key} has unknown color '{id}'"
                            ))
                        })
                    })
                    .transpose()?;
                entries.insert(
                    key,
                    Entry {
                        label,
                        color,
                        enabled: entry.enabled.unwrap_or(true),
                    },
                );
            }
            sections.insert(
                section_name.clone(),
                Section {
                    name: section_name,
                    entries,
                },
            );
        }

        debug!("overlay '{}' has {} sections", name, sections.len());
        Ok(Self {
            name: name.to_string(),
            title,
            tracks,
            sections,
        })
    }

    /// Overlay identifier (file stem).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared title; the output file is named after it.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn get(&self, section: &str) -> Result<&Section> {
        self.sections
            .get(section)
            .ok_or_else(|| TouchMcuError::MissingKey {
                key: format!("sections.{section}"),
            })
    }

    pub fn track(&self, index: usize) -> Result<&TrackEntry> {
        self.tracks.get(index).ok_or_else(|| TouchMcuError::MissingKey {
            key: format!("tracks[{index}]"),
        })
    }

    pub fn tracks(&self) -> &[TrackEntry] {
        &self.tracks
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }
}

/// Finds overlays by name: a directory on disk first, then the bundled set.
#[derive(Debug, Clone)]
pub struct OverlaySource {
    dir: PathBuf,
}

impl OverlaySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(name: &str) -> String {
        if name.ends_with(&format!(".{OVERLAY_EXTENSION}")) {
            name.to_string()
        } else {
            format!("{name}.{OVERLAY_EXTENSION}")
        }
    }

    /// Load the overlay called `name`.
    pub fn resolve(&self, name: &str) -> Result<Overlay> {
        let file_name = Self::file_name(name);
        let stem = file_name
            .trim_end_matches(&format!(".{OVERLAY_EXTENSION}"))
            .to_string();
        let not_found = || TouchMcuError::OverlayNotFound {
            name: stem.clone(),
            searched: self.dir.clone(),
        };

        // Only bare file names; no walking out of the overlay directory.
        let plain = Path::new(&file_name)
            .file_name()
            .map(|f| f == file_name.as_str())
            .unwrap_or(false);
        if !plain {
            return Err(not_found());
        }

        let path = self.dir.join(&file_name);
        if path.is_file() {
            info!("Loading overlay {}", path.display());
            return Overlay::load(&path);
        }
        if let Some(json) = BUNDLED_OVERLAYS
            .get_file(&file_name)
            .and_then(|f| f.contents_utf8())
        {
            info!("Loading bundled overlay '{}'", stem);
            return Overlay::from_json(&stem, json);
        }
        Err(not_found())
    }

    /// Names of every overlay that [`resolve`](Self::resolve) can find.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = WalkDir::new(&self.dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let path = entry.path();
                (path.extension()? == OVERLAY_EXTENSION)
                    .then(|| path.file_stem().map(|s| s.to_string_lossy().to_string()))
                    .flatten()
            })
            .chain(BUNDLED_OVERLAYS.files().filter_map(|f| {
                let path = f.path();
                (path.extension()? == OVERLAY_EXTENSION)
                    .then(|| path.file_stem().map(|s| s.to_string_lossy().to_string()))
                    .flatten()
            }))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
