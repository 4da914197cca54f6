//! Tizen manifest model
//!
//! The manifest (`tizen-manifest.xml`) is the only source of truth for what
//! goes into a package: there are no hand-written build configuration files.
//! This module owns the serde model, XML load/save, and the default manifest
//! used when scaffolding a new project.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Manifest path relative to the project root. Also the package-relative
/// path of the manifest member inside the archive.
pub const MANIFEST_PATH: &str = "tizen-manifest.xml";

/// XML namespace of Tizen package manifests
pub const TIZEN_XMLNS: &str = "http://tizen.org/ns/packages";

/// Application launch mode written into scaffolded manifests
pub const LAUNCH_MODE_SINGLE: &str = "single";

/// Errors from manifest load/save operations
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("manifest XML error: {0}")]
    Xml(#[from] quick_xml::de::DeError),
}

/// Result type for manifest operations
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Root element of `tizen-manifest.xml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "manifest")]
pub struct TizenManifest {
    /// Package namespace, always [`TIZEN_XMLNS`]
    #[serde(rename = "@xmlns")]
    pub xmlns: String,

    /// Package identifier (e.g. `org.tizen.example`)
    #[serde(rename = "@package")]
    pub package: String,

    /// Platform API version the package targets
    #[serde(rename = "@api-version")]
    pub api_version: String,

    /// Package version
    #[serde(rename = "@version")]
    pub version: String,

    /// Target profile (mobile, wearable, ...)
    pub profile: NameNode,

    /// UI application entries
    #[serde(rename = "ui-application", default, skip_serializing_if = "Vec::is_empty")]
    pub ui_applications: Vec<Application>,

    /// Service application entries
    #[serde(rename = "service-application", default, skip_serializing_if = "Vec::is_empty")]
    pub service_applications: Vec<Application>,

    /// Requested platform privileges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileges: Option<Privileges>,
}

/// Element carrying only a `name` attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameNode {
    #[serde(rename = "@name")]
    pub name: String,
}

/// `<privileges>` wrapper element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Privileges {
    #[serde(rename = "privilege", default)]
    pub entries: Vec<String>,
}

/// One `<ui-application>` or `<service-application>` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    /// Application identifier
    #[serde(rename = "@appid")]
    pub app_id: String,

    /// Executable name, relative to the package `bin/` subtree.
    /// Empty means the entry ships no executable.
    #[serde(rename = "@exec", default, skip_serializing_if = "String::is_empty")]
    pub exec: String,

    /// Application type (e.g. `capp`)
    #[serde(rename = "@type", default, skip_serializing_if = "String::is_empty")]
    pub app_type: String,

    #[serde(rename = "@launch_mode", default, skip_serializing_if = "String::is_empty")]
    pub launch_mode: String,

    #[serde(rename = "@multiple", default)]
    pub multiple: bool,

    #[serde(rename = "@nodisplay", default)]
    pub no_display: bool,

    #[serde(rename = "@taskmanage", default)]
    pub task_manage: bool,

    /// Icon path, relative to the package `shared/` subtree.
    /// Empty means the entry ships no icon.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,
}

impl TizenManifest {
    /// Default manifest for a freshly scaffolded project: one service
    /// application named after the project directory.
    pub fn new(name: &str) -> Self {
        let package = format!("org.tizen.{name}");
        Self {
            xmlns: TIZEN_XMLNS.to_string(),
            package: package.clone(),
            api_version: "3.0".to_string(),
            version: "0.0.1".to_string(),
            profile: NameNode {
                name: "mobile".to_string(),
            },
            ui_applications: Vec::new(),
            service_applications: vec![Application {
                app_id: package,
                exec: name.to_string(),
                app_type: "capp".to_string(),
                launch_mode: LAUNCH_MODE_SINGLE.to_string(),
                multiple: false,
                no_display: false,
                task_manage: true,
                icon: String::new(),
            }],
            privileges: None,
        }
    }

    /// Parse a manifest from XML text
    pub fn from_xml(xml: &str) -> ManifestResult<Self> {
        Ok(quick_xml::de::from_str(xml)?)
    }

    /// Serialize to indented XML text
    pub fn to_xml(&self) -> ManifestResult<String> {
        let mut out = String::new();
        let mut ser = quick_xml::se::Serializer::new(&mut out);
        ser.indent(' ', 2);
        self.serialize(ser)?;
        Ok(out)
    }

    /// Load a manifest from disk
    pub fn load(path: &Path) -> ManifestResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_xml(&text)
    }

    /// Write the manifest to disk
    pub fn save(&self, path: &Path) -> ManifestResult<()> {
        let xml = self.to_xml()?;
        fs::write(path, xml).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
