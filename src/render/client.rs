//! Render bridge client
//!
//! Spawns an external render bridge (for example a headless browser driver)
//! and talks to it over stdin/stdout with Content-Length framed JSON.
//! Requests are strictly sequential: one request in flight at a time.

use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use crate::common::config::Timeouts;
use crate::common::{Error, Result};

use super::codec;
use super::types::*;
use super::RenderingAccessor;

/// Client for one render bridge process with one loaded document
pub struct AdapterRenderer {
    /// Bridge subprocess
    bridge: Child,
    /// Buffered reader for bridge stdout
    reader: BufReader<ChildStdout>,
    /// Buffered writer for bridge stdin
    writer: BufWriter<ChildStdin>,
    /// Sequence number for requests
    seq: AtomicI64,
    /// Per-request timeout
    request_timeout: Duration,
}

impl AdapterRenderer {
    /// Spawn the bridge and load `document`
    ///
    /// Any failure here is a run-level fault.
    pub async fn launch(
        bridge_path: &Path,
        args: &[String],
        document: &Path,
        timeouts: &Timeouts,
    ) -> Result<Self> {
        let mut cmd = Command::new(bridge_path);
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut bridge = cmd.spawn().map_err(|e| {
            Error::RendererStartFailed(format!(
                "Failed to start {}: {}",
                bridge_path.display(),
                e
            ))
        })?;

        let stdin = bridge
            .stdin
            .take()
            .ok_or_else(|| Error::RendererStartFailed("Failed to get bridge stdin".to_string()))?;
        let stdout = bridge
            .stdout
            .take()
            .ok_or_else(|| Error::RendererStartFailed("Failed to get bridge stdout".to_string()))?;

        let mut renderer = Self {
            bridge,
            reader: BufReader::new(stdout),
            writer: BufWriter::new(stdin),
            seq: AtomicI64::new(1),
            request_timeout: Duration::from_secs(timeouts.request_secs),
        };

        let document_url = document
            .canonicalize()
            .map_err(|e| Error::document_load(&document.display().to_string(), e.to_string()))?;
        let args = LoadArguments {
            document: document_url.display().to_string(),
        };

        let start_timeout = Duration::from_secs(timeouts.renderer_start_secs);
        renderer
            .request_with_timeout::<Value>("load", Some(serde_json::to_value(&args)?), start_timeout)
            .await
            .map_err(|e| Error::document_load(&args.document, e.to_string()))?;

        tracing::info!(document = %args.document, "Document loaded");
        Ok(renderer)
    }

    /// Get the next sequence number
    fn next_seq(&self) -> i64 {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }

    async fn send_request(&mut self, command: &str, arguments: Option<Value>) -> Result<i64> {
        let request = RequestMessage {
            seq: self.next_seq(),
            message_type: "request".to_string(),
            command: command.to_string(),
            arguments,
        };

        let json = serde_json::to_string(&request)?;
        tracing::trace!("render >>> {}", json);
        codec::write_message(&mut self.writer, &json).await?;

        Ok(request.seq)
    }

    async fn read_response(&mut self) -> Result<ResponseMessage> {
        let json = codec::read_message(&mut self.reader).await?;
        tracing::trace!("render <<< {}", json);
        serde_json::from_str(&json)
            .map_err(|e| Error::RendererProtocol(format!("Invalid response: {}", e)))
    }

    /// Send a request and wait for its response
    async fn request<T: serde::de::DeserializeOwned>(
        &mut self,
        command: &str,
        arguments: Option<Value>,
    ) -> Result<T> {
        let timeout = self.request_timeout;
        self.request_with_timeout(command, arguments, timeout).await
    }

    async fn request_with_timeout<T: serde::de::DeserializeOwned>(
        &mut self,
        command: &str,
        arguments: Option<Value>,
        timeout: Duration,
    ) -> Result<T> {
        let exchange = async {
            let seq = self.send_request(command, arguments).await?;

            // Stale responses from an earlier timed-out request are skipped
            loop {
                let response = self.read_response().await?;
                if response.request_seq != seq {
                    tracing::warn!(
                        expected = seq,
                        got = response.request_seq,
                        "Discarding out-of-order render response"
                    );
                    continue;
                }

                if !response.success {
                    return Err(Error::request_failed(
                        command,
                        &response.message.unwrap_or_else(|| "Unknown error".to_string()),
                    ));
                }

                let body = response.body.unwrap_or(Value::Null);
                return serde_json::from_value(body).map_err(|e| {
                    Error::RendererProtocol(format!("Failed to parse {} response: {}", command, e))
                });
            }
        };

        tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| Error::RendererTimeout {
                command: command.to_string(),
                secs: timeout.as_secs(),
            })?
    }
}

#[async_trait]
impl RenderingAccessor for AdapterRenderer {
    async fn query(&mut self, selector: &str) -> Result<Vec<ElementHandle>> {
        let args = QueryArguments { selector };
        let body: QueryResponseBody = self
            .request("query", Some(serde_json::to_value(&args)?))
            .await?;

        Ok(body
            .elements
            .into_iter()
            .map(|e| ElementHandle {
                id: e.id,
                selector: selector.to_string(),
            })
            .collect())
    }

    async fn computed_style(
        &mut self,
        element: &ElementHandle,
        properties: &[&str],
    ) -> Result<ComputedStyle> {
        let args = ComputedStyleArguments {
            id: &element.id,
            properties,
        };
        let body: ComputedStyleResponseBody = self
            .request("computedStyle", Some(serde_json::to_value(&args)?))
            .await?;

        Ok(ComputedStyle {
            properties: body.properties,
        })
    }

    async fn bounding_rect(&mut self, element: &ElementHandle) -> Result<Rect> {
        let args = ElementArguments { id: &element.id };
        self.request("boundingRect", Some(serde_json::to_value(&args)?))
            .await
    }

    async fn attribute(&mut self, element: &ElementHandle, name: &str) -> Result<Option<String>> {
        let args = AttributeArguments {
            id: &element.id,
            name,
        };
        let body: AttributeResponseBody = self
            .request("attribute", Some(serde_json::to_value(&args)?))
            .await?;
        Ok(body.value)
    }

    async fn hover(&mut self, element: &ElementHandle) -> Result<()> {
        let args = ElementArguments { id: &element.id };
        self.request::<Value>("hover", Some(serde_json::to_value(&args)?))
            .await?;
        Ok(())
    }

    async fn clear_hover(&mut self) -> Result<()> {
        self.request::<Value>("clearHover", None).await?;
        Ok(())
    }

    async fn release(&mut self) -> Result<()> {
        // The bridge may exit before answering
        let _ = self.send_request("close", None).await;

        let exited = tokio::time::timeout(Duration::from_millis(500), self.bridge.wait()).await;
        if exited.is_err() {
            tracing::debug!("Render bridge did not exit after close, killing it");
            self.bridge.kill().await?;
        }
        Ok(())
    }
}
