use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;

use crate::conventions::COMPLETION_TRIGGERS;
use crate::error::{NavigatorError, Result};
use crate::host::protocol::{
    DocumentTextParams, DocumentUriParams, ErrorObject, IncomingMessage, OutgoingMessage,
    PositionParams, WireLocation, INTERNAL_ERROR, PARSE_ERROR,
};
use crate::index::RefreshOutcome;
use crate::navigator::Navigator;
use crate::query::Position;

/// Name under which the original client sends its refresh notification.
pub const LEGACY_REFRESH_METHOD: &str = "wb/refreshComponents";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Adapter between a line-oriented JSON transport and a [`Navigator`].
pub struct Host {
    navigator: Arc<Navigator>,
    refreshes: Mutex<Vec<JoinHandle<()>>>,
}

impl Host {
    pub fn new(navigator: Arc<Navigator>) -> Self {
        Self {
            navigator,
            refreshes: Mutex::new(Vec::new()),
        }
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    /// Reads one message per line until EOF, `shutdown` or `exit`.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!("Serving component navigation for {}", self.navigator.root().display());

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let (response, flow) = self.handle_line(&line).await;
            if let Some(response) = response {
                writer.write_all(response.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            if flow == Flow::Exit {
                break;
            }
        }

        self.wait_for_refreshes().await;
        tracing::debug!("Host loop stopped");
        Ok(())
    }

    /// Handles one raw line; returns the serialized response, if any.
    pub async fn handle_line(&self, line: &str) -> (Option<String>, Flow) {
        let message: IncomingMessage = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!("Malformed message: {}", e);
                let response = OutgoingMessage::error(
                    Value::Null,
                    ErrorObject {
                        code: PARSE_ERROR,
                        message: format!("Parse error: {}", e),
                    },
                );
                return (encode(&response), Flow::Continue);
            }
        };

        let (response, flow) = self.handle(message).await;
        (response.as_ref().and_then(encode), flow)
    }

    pub async fn handle(&self, message: IncomingMessage) -> (Option<OutgoingMessage>, Flow) {
        let IncomingMessage { id, method, params } = message;

        let (result, flow) = match method.as_str() {
            "exit" => return (None, Flow::Exit),
            "shutdown" => {
                self.wait_for_refreshes().await;
                (Ok(Value::Null), Flow::Exit)
            }
            "refreshIndex" | LEGACY_REFRESH_METHOD => {
                self.spawn_refresh();
                (Ok(json!({ "accepted": true })), Flow::Continue)
            }
            _ => {
                let navigator = self.navigator.clone();
                let method_name = method.clone();
                let result = tokio::task::spawn_blocking(move || dispatch(&navigator, &method_name, params))
                    .await
                    .unwrap_or_else(|e| Err(NavigatorError::Protocol(format!("handler failed: {}", e))));
                (result, Flow::Continue)
            }
        };

        let Some(id) = id else {
            if let Err(e) = result {
                tracing::debug!("Notification {} failed: {}", method, e);
            }
            return (None, flow);
        };

        let response = match result {
            Ok(value) => OutgoingMessage::result(id, value),
            Err(e) => OutgoingMessage::error(id, ErrorObject::from(&e)),
        };
        (Some(response), flow)
    }

    /// Starts a rebuild in the background; queries keep using the current generation.
    fn spawn_refresh(&self) {
        let navigator = self.navigator.clone();
        let handle = tokio::task::spawn_blocking(move || match navigator.refresh_index() {
            RefreshOutcome::Ran { passes, last } => {
                tracing::debug!("Refresh finished after {} passes: {:?}", passes, last);
            }
            RefreshOutcome::Coalesced => {
                tracing::debug!("Refresh coalesced into the running rebuild");
            }
        });

        let mut refreshes = self.refreshes.lock();
        refreshes.retain(|h| !h.is_finished());
        refreshes.push(handle);
    }

    /// Waits for every refresh started so far.
    pub async fn wait_for_refreshes(&self) {
        let pending: Vec<JoinHandle<()>> = std::mem::take(&mut *self.refreshes.lock());
        for handle in pending {
            if let Err(e) = handle.await {
                tracing::warn!("Refresh task failed: {}", e);
            }
        }
    }
}

fn encode(response: &OutgoingMessage) -> Option<String> {
    match serde_json::to_string(response) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!("Failed to encode response: {}", e);
            let fallback = OutgoingMessage::error(
                response.id.clone(),
                ErrorObject {
                    code: INTERNAL_ERROR,
                    message: e.to_string(),
                },
            );
            serde_json::to_string(&fallback).ok()
        }
    }
}

fn params<T: DeserializeOwned>(method: &str, params: Value) -> Result<T> {
    serde_json::from_value(params)
        .map_err(|e| NavigatorError::Protocol(format!("invalid params for {}: {}", method, e)))
}

fn position(p: &PositionParams) -> Position {
    Position::new(p.line, p.column)
}

/// Synchronous request/notification handling against the navigator.
fn dispatch(navigator: &Navigator, method: &str, raw: Value) -> Result<Value> {
    let queries = navigator.dispatcher();

    let value = match method {
        "initialize" => json!({
            "serverInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
            "capabilities": {
                "definitionProvider": true,
                "referencesProvider": true,
                "hoverProvider": true,
                "completionProvider": { "triggerCharacters": COMPLETION_TRIGGERS },
            },
        }),
        "definition" => {
            let p: PositionParams = params(method, raw)?;
            let location = queries.go_to_definition(&p.uri, position(&p));
            serde_json::to_value(location.as_ref().map(WireLocation::from))?
        }
        "references" => {
            let p: PositionParams = params(method, raw)?;
            let locations: Vec<WireLocation> = queries
                .find_references(&p.uri, position(&p))
                .iter()
                .map(WireLocation::from)
                .collect();
            serde_json::to_value(locations)?
        }
        "hover" => {
            let p: PositionParams = params(method, raw)?;
            serde_json::to_value(queries.hover(&p.uri, position(&p)))?
        }
        "completion" => {
            let p: PositionParams = params(method, raw)?;
            serde_json::to_value(queries.completion(&p.uri, position(&p)))?
        }
        "components" => {
            let records = navigator.index().list();
            serde_json::to_value(records.iter().map(|r| r.as_ref()).collect::<Vec<_>>())?
        }
        "status" => serde_json::to_value(navigator.status())?,
        "documentOpened" => {
            let p: DocumentTextParams = params(method, raw)?;
            navigator.document_opened(&p.uri, &p.text);
            Value::Null
        }
        "documentChanged" => {
            let p: DocumentTextParams = params(method, raw)?;
            navigator.document_changed(&p.uri, &p.text);
            Value::Null
        }
        "documentClosed" => {
            let p: DocumentUriParams = params(method, raw)?;
            navigator.document_closed(&p.uri);
            Value::Null
        }
        other => return Err(NavigatorError::UnknownMethod(other.to_string())),
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::NavigatorConfig;
    use tempfile::TempDir;

    fn host(root: &std::path::Path) -> Host {
        Host::new(Arc::new(Navigator::new(NavigatorConfig::new(root))))
    }

    async fn request(host: &Host, line: &str) -> Value {
        let (response, _) = host.handle_line(line).await;
        serde_json::from_str(&response.expect("request must be answered")).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_reports_capabilities() {
        let temp_dir = TempDir::new().unwrap();
        let host = host(temp_dir.path());

        let response = request(&host, r#"{"id":1,"method":"initialize"}"#).await;

        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["capabilities"]["definitionProvider"], true);
        assert_eq!(
            response["result"]["capabilities"]["completionProvider"]["triggerCharacters"],
            json!(["<", "-"])
        );
    }

    #[tokio::test]
    async fn test_malformed_json_returns_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let host = host(temp_dir.path());

        let response = request(&host, "{not json").await;

        assert_eq!(response["id"], Value::Null);
        assert_eq!(response["error"]["code"], PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let temp_dir = TempDir::new().unwrap();
        let host = host(temp_dir.path());

        let response = request(&host, r#"{"id":"a","method":"rename"}"#).await;

        assert_eq!(response["id"], "a");
        assert_eq!(response["error"]["code"], crate::host::protocol::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_params() {
        let temp_dir = TempDir::new().unwrap();
        let host = host(temp_dir.path());

        let response = request(&host, r#"{"id":3,"method":"definition","params":{"uri":"x"}}"#).await;

        assert_eq!(response["error"]["code"], crate::host::protocol::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let temp_dir = TempDir::new().unwrap();
        let host = host(temp_dir.path());

        let (response, flow) = host
            .handle_line(r#"{"method":"documentOpened","params":{"uri":"file:///a.html","text":"<p>"}}"#)
            .await;

        assert!(response.is_none());
        assert_eq!(flow, Flow::Continue);
        assert!(host.navigator().documents().contains("file:///a.html"));
    }

    #[tokio::test]
    async fn test_refresh_is_acknowledged() {
        let temp_dir = TempDir::new().unwrap();
        let host = host(temp_dir.path());

        let response = request(&host, r#"{"id":9,"method":"refreshIndex"}"#).await;
        assert_eq!(response["result"]["accepted"], true);

        host.wait_for_refreshes().await;
        assert_eq!(host.navigator().index().generation(), 1);
    }

    #[tokio::test]
    async fn test_exit_stops_without_response() {
        let temp_dir = TempDir::new().unwrap();
        let host = host(temp_dir.path());

        let (response, flow) = host.handle_line(r#"{"method":"exit"}"#).await;

        assert!(response.is_none());
        assert_eq!(flow, Flow::Exit);
    }
}
