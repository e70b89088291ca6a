//! Rendering accessor
//!
//! The harness never lays out documents itself. It asks a renderer for
//! computed styles, geometry and attributes through [`RenderingAccessor`],
//! backed either by an external render bridge process or by a
//! pre-computed snapshot.

pub mod client;
pub mod codec;
pub mod color;
pub mod snapshot;
pub mod types;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::common::config::Config;
use crate::common::Result;

pub use client::AdapterRenderer;
pub use color::Rgba;
pub use snapshot::SnapshotRenderer;
pub use types::{ComputedStyle, ElementHandle, Rect};

/// Read access to one loaded document
///
/// The document is loaded when the accessor is constructed; a failed load
/// is a run-level error.
#[async_trait]
pub trait RenderingAccessor: Send {
    /// All elements matching a selector, in document order
    async fn query(&mut self, selector: &str) -> Result<Vec<ElementHandle>>;

    /// Resolved values of the requested properties
    async fn computed_style(
        &mut self,
        element: &ElementHandle,
        properties: &[&str],
    ) -> Result<ComputedStyle>;

    async fn bounding_rect(&mut self, element: &ElementHandle) -> Result<Rect>;

    /// DOM attribute value, `None` when the attribute is not set
    async fn attribute(&mut self, element: &ElementHandle, name: &str) -> Result<Option<String>>;

    /// Move the pointer over an element
    async fn hover(&mut self, element: &ElementHandle) -> Result<()>;

    /// Move the pointer off the document
    async fn clear_hover(&mut self) -> Result<()>;

    /// Unconditional pause, used to let transitions settle
    async fn wait(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Release the renderer. Further requests are invalid.
    async fn release(&mut self) -> Result<()>;

    /// First element matching a selector
    async fn query_one(&mut self, selector: &str) -> Result<Option<ElementHandle>> {
        Ok(self.query(selector).await?.into_iter().next())
    }
}

/// Acquire the configured renderer with `document` loaded
pub async fn open(
    config: &Config,
    root: &Path,
    document: &str,
) -> Result<Box<dyn RenderingAccessor>> {
    if let Some(snapshot) = &config.renderer.snapshot {
        let path = root.join(snapshot);
        tracing::debug!(snapshot = %path.display(), "Using render snapshot");
        let renderer = SnapshotRenderer::load(&path, document)?;
        return Ok(Box::new(renderer));
    }

    let bridge = config.bridge_path()?;
    let renderer = AdapterRenderer::launch(
        &bridge,
        &config.renderer.args,
        &root.join(document),
        &config.timeouts,
    )
    .await?;
    Ok(Box::new(renderer))
}
