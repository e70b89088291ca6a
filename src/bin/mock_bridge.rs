//! Mock render bridge binary for integration testing
//!
//! Speaks the render bridge protocol on stdin/stdout and answers from a
//! render snapshot file given as the first argument, so the bridge client
//! can be tested without a browser engine.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tokio::io::{stdin, stdout, BufReader, BufWriter};

use style_diag::render::codec;
use style_diag::render::types::{RequestMessage, ResponseMessage};
use style_diag::render::{ElementHandle, RenderingAccessor, SnapshotRenderer};
use style_diag::{Error, Result};

#[tokio::main]
async fn main() {
    let Some(snapshot) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: mock_bridge <snapshot>");
        std::process::exit(2);
    };

    if let Err(e) = serve(&snapshot).await {
        // EOF on stdin is a normal shutdown
        if !matches!(e, Error::RendererCrashed) {
            eprintln!("mock_bridge: {e}");
            std::process::exit(1);
        }
    }
}

async fn serve(snapshot: &Path) -> Result<()> {
    let mut reader = BufReader::new(stdin());
    let mut writer = BufWriter::new(stdout());
    let mut state = MockState {
        snapshot: snapshot.to_path_buf(),
        renderer: None,
    };

    loop {
        let json = codec::read_message(&mut reader).await?;
        let request: RequestMessage = serde_json::from_str(&json)?;
        let arguments = request.arguments.clone().unwrap_or_else(|| json!({}));

        let (success, message, body) = match state.handle(&request.command, &arguments).await {
            Ok(body) => (true, None, Some(body)),
            Err(e) => (false, Some(e.to_string()), None),
        };

        let response = ResponseMessage {
            request_seq: request.seq,
            message_type: "response".to_string(),
            success,
            message,
            body,
        };
        codec::write_message(&mut writer, &serde_json::to_string(&response)?).await?;

        if request.command == "close" {
            return Ok(());
        }
    }
}

struct MockState {
    snapshot: PathBuf,
    renderer: Option<SnapshotRenderer>,
}

impl MockState {
    async fn handle(&mut self, command: &str, arguments: &Value) -> Result<Value> {
        if command == "load" {
            let document = str_arg(arguments, "document")?;
            // The client sends an absolute path; snapshots record the file name
            let name = Path::new(document)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(document);
            self.renderer = Some(SnapshotRenderer::load(&self.snapshot, name)?);
            return Ok(Value::Null);
        }

        let renderer = self
            .renderer
            .as_mut()
            .ok_or_else(|| Error::Internal("no document loaded".to_string()))?;

        match command {
            "query" => {
                let selector = str_arg(arguments, "selector")?;
                let elements: Vec<Value> = renderer
                    .query(selector)
                    .await?
                    .into_iter()
                    .map(|e| json!({ "id": e.id }))
                    .collect();
                Ok(json!({ "elements": elements }))
            }
            "computedStyle" => {
                let element = handle_arg(arguments)?;
                let properties: Vec<&str> = arguments
                    .get("properties")
                    .and_then(|p| p.as_array())
                    .map(|list| list.iter().filter_map(|p| p.as_str()).collect())
                    .unwrap_or_default();
                let style = renderer.computed_style(&element, &properties).await?;
                Ok(json!({ "properties": style.properties }))
            }
            "boundingRect" => {
                let rect = renderer.bounding_rect(&handle_arg(arguments)?).await?;
                Ok(serde_json::to_value(rect)?)
            }
            "attribute" => {
                let name = str_arg(arguments, "name")?;
                let value = renderer.attribute(&handle_arg(arguments)?, name).await?;
                Ok(json!({ "value": value }))
            }
            "hover" => {
                renderer.hover(&handle_arg(arguments)?).await?;
                Ok(Value::Null)
            }
            "clearHover" => {
                renderer.clear_hover().await?;
                Ok(Value::Null)
            }
            "close" => {
                renderer.release().await?;
                Ok(Value::Null)
            }
            other => Err(Error::RendererProtocol(format!("unknown command '{}'", other))),
        }
    }
}

fn str_arg<'a>(arguments: &'a Value, name: &str) -> Result<&'a str> {
    arguments
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::RendererProtocol(format!("missing argument '{}'", name)))
}

fn handle_arg(arguments: &Value) -> Result<ElementHandle> {
    Ok(ElementHandle {
        id: str_arg(arguments, "id")?.to_string(),
        selector: String::new(),
    })
}
