//! Pre-computed render snapshots
//!
//! A snapshot records what a renderer reported for a document: which
//! elements each selector matched, their computed styles (with the values
//! that apply while hovered), attributes and geometry. Snapshots are read
//! from JSON or YAML, or assembled in memory.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};

use super::types::{ComputedStyle, ElementHandle, Rect};
use super::RenderingAccessor;

/// A recorded rendering of one document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderSnapshot {
    /// Document the snapshot was taken from, relative to the exercise root
    pub document: String,
    #[serde(default)]
    pub elements: Vec<SnapshotElement>,
}

/// One rendered element
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotElement {
    /// Identifier, defaults to the element's position
    #[serde(default)]
    pub id: Option<String>,
    /// Selectors this element matches
    pub matches: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub style: ComputedStyle,
    /// Values that replace `style` entries while the element is hovered
    #[serde(default)]
    pub hover: ComputedStyle,
    #[serde(default)]
    pub rect: Option<Rect>,
}

impl RenderSnapshot {
    pub fn new(document: &str) -> Self {
        Self {
            document: document.to_string(),
            elements: Vec::new(),
        }
    }

    pub fn element(mut self, element: SnapshotElement) -> Self {
        self.elements.push(element);
        self
    }
}

impl SnapshotElement {
    pub fn matching(selectors: &[&str]) -> Self {
        Self {
            matches: selectors.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.style
            .properties
            .insert(property.to_string(), value.to_string());
        self
    }

    pub fn hover_style(mut self, property: &str, value: &str) -> Self {
        self.hover
            .properties
            .insert(property.to_string(), value.to_string());
        self
    }

    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn rect(mut self, left: f64, top: f64, width: f64, height: f64) -> Self {
        self.rect = Some(Rect {
            left,
            right: left + width,
            top,
            width,
            height,
        });
        self
    }
}

/// Serves a [`RenderSnapshot`] through the [`RenderingAccessor`] interface
#[derive(Debug)]
pub struct SnapshotRenderer {
    snapshot: RenderSnapshot,
    hovered: Option<usize>,
    released: bool,
}

impl SnapshotRenderer {
    pub fn new(snapshot: RenderSnapshot) -> Self {
        Self {
            snapshot,
            hovered: None,
            released: false,
        }
    }

    /// Load a snapshot file and check it was taken from `document`
    pub fn load(path: &Path, document: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::document_load(document, format!("{}: {}", path.display(), e)))?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let snapshot: RenderSnapshot = if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| Error::SnapshotParse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| Error::SnapshotParse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
        };

        if snapshot.document != document {
            return Err(Error::document_load(
                document,
                format!("snapshot was taken from '{}'", snapshot.document),
            ));
        }

        tracing::debug!(
            elements = snapshot.elements.len(),
            "Loaded render snapshot"
        );
        Ok(Self::new(snapshot))
    }

    fn ensure_live(&self) -> Result<()> {
        if self.released {
            return Err(Error::Internal("renderer already released".to_string()));
        }
        Ok(())
    }

    fn resolve(&self, element: &ElementHandle) -> Result<(usize, &SnapshotElement)> {
        self.snapshot
            .elements
            .iter()
            .enumerate()
            .find(|(i, e)| element_id(*i, e) == element.id)
            .ok_or_else(|| Error::UnknownElement(element.id.clone()))
    }
}

fn element_id(index: usize, element: &SnapshotElement) -> String {
    element
        .id
        .clone()
        .unwrap_or_else(|| format!("e{}", index))
}

#[async_trait]
impl RenderingAccessor for SnapshotRenderer {
    async fn query(&mut self, selector: &str) -> Result<Vec<ElementHandle>> {
        self.ensure_live()?;
        Ok(self
            .snapshot
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.matches.iter().any(|m| m == selector))
            .map(|(i, e)| ElementHandle {
                id: element_id(i, e),
                selector: selector.to_string(),
            })
            .collect())
    }

    async fn computed_style(
        &mut self,
        element: &ElementHandle,
        properties: &[&str],
    ) -> Result<ComputedStyle> {
        self.ensure_live()?;
        let (index, recorded) = self.resolve(element)?;
        let hovered = self.hovered == Some(index);

        let mut style = ComputedStyle::default();
        for &property in properties {
            let value = hovered
                .then(|| recorded.hover.properties.get(property))
                .flatten()
                .or_else(|| recorded.style.properties.get(property));
            if let Some(value) = value {
                style
                    .properties
                    .insert(property.to_string(), value.clone());
            }
        }
        Ok(style)
    }

    async fn bounding_rect(&mut self, element: &ElementHandle) -> Result<Rect> {
        self.ensure_live()?;
        let (_, recorded) = self.resolve(element)?;
        recorded
            .rect
            .ok_or_else(|| Error::MissingProperty(format!("geometry of {}", element.selector)))
    }

    async fn attribute(&mut self, element: &ElementHandle, name: &str) -> Result<Option<String>> {
        self.ensure_live()?;
        let (_, recorded) = self.resolve(element)?;
        Ok(recorded.attributes.get(name).cloned())
    }

    async fn hover(&mut self, element: &ElementHandle) -> Result<()> {
        self.ensure_live()?;
        let (index, _) = self.resolve(element)?;
        self.hovered = Some(index);
        Ok(())
    }

    async fn clear_hover(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.hovered = None;
        Ok(())
    }

    async fn release(&mut self) -> Result<()> {
        self.released = true;
        Ok(())
    }
}
