//! Panel settings persisted as XML in the platform config directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runtime settings for the kiosk window, the camera, and the embedded
/// web server. Loaded once at startup; defaults cover any field a saved
/// file does not carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "SmartPanel")]
pub struct PanelSettings {
    #[serde(rename = "windowWidth", default = "default_window_width")]
    pub window_width: u32,

    #[serde(rename = "windowHeight", default = "default_window_height")]
    pub window_height: u32,

    /// Desktop repaint rate, clamped to 15-120.
    #[serde(rename = "targetFps", default = "default_target_fps")]
    pub target_fps: u32,

    #[serde(rename = "cameraIndex", default)]
    pub camera_index: u32,

    #[serde(rename = "cameraWidth", default = "default_camera_width")]
    pub camera_width: u32,

    #[serde(rename = "cameraHeight", default = "default_camera_height")]
    pub camera_height: u32,

    #[serde(rename = "webEnabled", default = "default_web_enabled")]
    pub web_enabled: bool,

    #[serde(rename = "webPort", default = "default_web_port")]
    pub web_port: u16,

    /// Encoder quality for the MJPEG stream, clamped to 1-100.
    #[serde(rename = "jpegQuality", default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_window_width() -> u32 {
    1024
}

fn default_window_height() -> u32 {
    600
}

fn default_target_fps() -> u32 {
    30
}

fn default_camera_width() -> u32 {
    640
}

fn default_camera_height() -> u32 {
    480
}

fn default_web_enabled() -> bool {
    true
}

fn default_web_port() -> u16 {
    5001
}

fn default_jpeg_quality() -> u8 {
    85
}

/// Clamps a frame rate to the supported range.
pub fn clamp_fps(fps: u32) -> u32 {
    fps.clamp(15, 120)
}

/// Clamps a JPEG quality to what the encoder accepts.
pub fn clamp_jpeg_quality(quality: u8) -> u8 {
    quality.clamp(1, 100)
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            target_fps: default_target_fps(),
            camera_index: 0,
            camera_width: default_camera_width(),
            camera_height: default_camera_height(),
            web_enabled: default_web_enabled(),
            web_port: default_web_port(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

impl PanelSettings {
    /// `<config>/SmartPanel/settings.xml` on the current platform.
    pub fn config_path() -> Result<PathBuf, SettingsError> {
        let base = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(base.join("SmartPanel").join("settings.xml"))
    }

    /// Loads from the config directory, falling back to defaults on any
    /// failure so a damaged or missing file never blocks startup.
    pub fn load() -> Self {
        let path = match Self::config_path() {
            Ok(path) => path,
            Err(err) => {
                log::warn!("No config directory, using default settings: {}", err);
                return Self::default();
            }
        };
        match Self::load_from_file(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::info!(
                    "Could not load settings from {} ({}), using defaults",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path).map_err(SettingsError::Io)?;
        let mut settings: PanelSettings =
            quick_xml::de::from_str(&contents).map_err(SettingsError::XmlParse)?;

        // Sanity for hand-edited files.
        settings.target_fps = clamp_fps(settings.target_fps);
        settings.jpeg_quality = clamp_jpeg_quality(settings.jpeg_quality);
        settings.window_width = settings.window_width.max(1);
        settings.window_height = settings.window_height.max(1);
        Ok(settings)
    }

    /// Writes to the config directory, creating it if needed.
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::config_path()?;
        self.save_to_file(&path)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SettingsError::Io)?;
        }
        let body = quick_xml::se::to_string(self).map_err(SettingsError::XmlWrite)?;
        let xml = format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}", body);
        std::fs::write(path, xml).map_err(SettingsError::Io)
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    XmlParse(quick_xml::DeError),
    XmlWrite(quick_xml::SeError),
    NoConfigDir,
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "IO error: {}", err),
            SettingsError::XmlParse(err) => write!(f, "XML parse error: {}", err),
            SettingsError::XmlWrite(err) => write!(f, "XML write error: {}", err),
            SettingsError::NoConfigDir => write!(f, "no platform config directory"),
        }
    }
}

impl std::error::Error for SettingsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = PanelSettings::default();
        assert_eq!(settings.window_width, 1024);
        assert_eq!(settings.window_height, 600);
        assert_eq!(settings.target_fps, 30);
        assert_eq!(settings.camera_index, 0);
        assert!(settings.web_enabled);
        assert_eq!(settings.web_port, 5001);
        assert_eq!(settings.jpeg_quality, 85);
    }

    #[test]
    fn test_fps_clamping() {
        assert_eq!(clamp_fps(5), 15);
        assert_eq!(clamp_fps(30), 30);
        assert_eq!(clamp_fps(240), 120);
    }

    #[test]
    fn test_quality_clamping() {
        assert_eq!(clamp_jpeg_quality(0), 1);
        assert_eq!(clamp_jpeg_quality(85), 85);
        assert_eq!(clamp_jpeg_quality(255), 100);
    }

    #[test]
    fn test_xml_round_trip() {
        let mut settings = PanelSettings::default();
        settings.web_port = 9000;
        settings.target_fps = 60;
        let xml = quick_xml::se::to_string(&settings).unwrap();
        let parsed: PanelSettings = quick_xml::de::from_str(&xml).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_partial_file_gets_defaults() {
        let xml = "<SmartPanel><webPort>8080</webPort></SmartPanel>";
        let parsed: PanelSettings = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(parsed.web_port, 8080);
        assert_eq!(parsed.window_width, 1024);
        assert_eq!(parsed.target_fps, 30);
    }
}
