//! Export settings management
//!
//! Settings live in `settings.json` inside the data directory. A missing,
//! unreadable or out-of-range file yields the defaults.

use crate::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportSettings {
    /// Width of the offscreen staging container in CSS pixels
    pub staging_width_px: u32,
    /// Device pixels per CSS pixel when rasterizing
    pub pixel_ratio: f64,
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    /// Margin applied on all four sides
    pub margin_mm: f64,
    /// Flate-compress the embedded raster
    pub compress: bool,
    /// Fill the PDF title and author from the CV owner's name
    pub title_from_name: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            staging_width_px: 1100,
            pixel_ratio: 2.0,
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 8.0,
            compress: true,
            title_from_name: true,
        }
    }
}

impl ExportSettings {
    /// Reject values the export geometry cannot work with
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(StoreError::InvalidFormat(message));
        if self.staging_width_px == 0 {
            return invalid("staging width must be positive".to_string());
        }
        if !(self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0) {
            return invalid(format!("pixel ratio must be positive, got {}", self.pixel_ratio));
        }
        let smaller_side = self.page_width_mm.min(self.page_height_mm);
        if !(smaller_side.is_finite() && smaller_side > 0.0) {
            return invalid("page size must be positive".to_string());
        }
        if !(self.margin_mm >= 0.0 && self.margin_mm * 2.0 < smaller_side) {
            return invalid(format!(
                "margin {} mm leaves no printable area on a {} x {} mm page",
                self.margin_mm, self.page_width_mm, self.page_height_mm
            ));
        }
        Ok(())
    }
}

/// File holding the export settings inside the data directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Owns the export settings file
pub struct SettingsManager {
    settings_path: PathBuf,
    current: ExportSettings,
}

impl SettingsManager {
    /// Read the settings in `data_dir`, keeping defaults when the file is
    /// missing, malformed or out of range
    pub fn open(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join(SETTINGS_FILE);
        let current = if settings_path.exists() {
            parse_or_default(&std::fs::read_to_string(&settings_path)?)
        } else {
            ExportSettings::default()
        };
        Ok(Self {
            settings_path,
            current,
        })
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn get(&self) -> &ExportSettings {
        &self.current
    }

    /// Apply `edit`, validate the result, and save it. A rejected edit leaves
    /// both memory and disk unchanged.
    pub fn update(&mut self, edit: impl FnOnce(&mut ExportSettings)) -> Result<&ExportSettings> {
        let mut next = self.current.clone();
        edit(&mut next);
        next.validate()?;
        write_settings(&self.settings_path, &next)?;
        self.current = next;
        Ok(&self.current)
    }

    /// Restore the defaults and save them
    pub fn reset(&mut self) -> Result<&ExportSettings> {
        self.update(|settings| *settings = ExportSettings::default())
    }
}

fn parse_or_default(content: &str) -> ExportSettings {
    let parsed = serde_json::from_str::<ExportSettings>(content)
        .map_err(StoreError::from)
        .and_then(|settings| settings.validate().map(|()| settings));
    match parsed {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Ignoring settings file, using defaults: {}", e);
            ExportSettings::default()
        }
    }
}

fn write_settings(path: &Path, settings: &ExportSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(settings)?)?;
    tracing::debug!(path = %path.display(), "Saved export settings");
    Ok(())
}
