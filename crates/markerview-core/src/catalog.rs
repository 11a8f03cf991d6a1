//! Model catalog - the static list of objects anchored to markers
//!
//! Each catalog entry describes one primitive shape shown on top of a
//! marker. Entry order is significant: entry `i` is anchored to target `i`
//! of the compiled marker dataset.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Catalog shipped with the page
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.toml");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Catalog is empty")]
    Empty,
    #[error("Duplicate model id: {0}")]
    DuplicateId(String),
    #[error("Model {id} has non-positive scale {scale}")]
    InvalidScale { id: String, scale: f32 },
    #[error("Invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
}

/// Primitive shape used to visualize a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Sphere,
    Cone,
    Box,
    Cylinder,
    Torus,
    Icosahedron,
    Capsule,
    Dodecahedron,
    Octahedron,
    /// Anything the catalog names that we don't know how to build
    #[serde(other)]
    Unknown,
}

impl GeometryKind {
    /// All buildable kinds, in catalog documentation order
    pub const ALL: [GeometryKind; 9] = [
        GeometryKind::Sphere,
        GeometryKind::Cone,
        GeometryKind::Box,
        GeometryKind::Cylinder,
        GeometryKind::Torus,
        GeometryKind::Icosahedron,
        GeometryKind::Capsule,
        GeometryKind::Dodecahedron,
        GeometryKind::Octahedron,
    ];

    /// Name as written in catalog files
    pub fn name(self) -> &'static str {
        match self {
            GeometryKind::Sphere => "sphere",
            GeometryKind::Cone => "cone",
            GeometryKind::Box => "box",
            GeometryKind::Cylinder => "cylinder",
            GeometryKind::Torus => "torus",
            GeometryKind::Icosahedron => "icosahedron",
            GeometryKind::Capsule => "capsule",
            GeometryKind::Dodecahedron => "dodecahedron",
            GeometryKind::Octahedron => "octahedron",
            GeometryKind::Unknown => "unknown",
        }
    }
}

/// 8-bit RGB color, written as `#rrggbb` in catalog files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Result<Self, CatalogError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CatalogError::InvalidColor(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| CatalogError::InvalidColor(hex.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Channels as floats in 0.0-1.0
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Unique identifier (e.g., "telstar")
    pub id: String,
    /// Display name shown when the marker is detected
    pub name: String,
    /// Longer text for the info panel
    #[serde(default)]
    pub description: String,
    /// Shape to build for this model
    pub geometry: GeometryKind,
    pub color: Rgb,
    /// Uniform size factor, must be positive
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Ordered list of model descriptors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, rename = "model")]
    models: Vec<ModelDescriptor>,
}

impl Catalog {
    /// Build a catalog from descriptors, validating it
    pub fn new(models: Vec<ModelDescriptor>) -> Result<Self, CatalogError> {
        let catalog = Self {
            version: default_version(),
            models,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog shipped with the page
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml(BUILTIN_CATALOG)
    }

    /// Parse and validate a catalog from TOML
    pub fn from_toml(content: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.validate()?;
        tracing::debug!(models = catalog.models.len(), "Catalog loaded");
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.models.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for model in &self.models {
            if !seen.insert(model.id.as_str()) {
                return Err(CatalogError::DuplicateId(model.id.clone()));
            }
            if !(model.scale > 0.0) {
                return Err(CatalogError::InvalidScale {
                    id: model.id.clone(),
                    scale: model.scale,
                });
            }
            if model.geometry == GeometryKind::Unknown {
                tracing::warn!(id = %model.id, "Unknown geometry kind, a placeholder cube will be shown");
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Descriptor anchored to marker target `index`
    pub fn get(&self, index: usize) -> Option<&ModelDescriptor> {
        self.models.get(index)
    }

    pub fn find(&self, id: &str) -> Option<(usize, &ModelDescriptor)> {
        self.models.iter().enumerate().find(|(_, m)| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.iter()
    }
}
