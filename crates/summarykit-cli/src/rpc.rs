//! JSON-RPC 2.0 server and client over TCP
//!
//! Framing is one JSON object per line in both directions. Each connection
//! is served by its own task; requests on one connection are answered in
//! order.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use summarykit::{
    ExtractError, ExtractionResult, ParseRequest, ParseTestRequest, ParserService, METHOD_PARSE,
    METHOD_PARSE_TEST,
};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

/// Method returning the service description and wire schemas
pub const METHOD_DESCRIBE: &str = "Describe";

/// Deadline applied by the client to a whole call
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON-RPC 2.0 request
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcRequest {
    fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(id)),
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC 2.0 response
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    fn extract_error(id: Option<Value>, err: &ExtractError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: err.code(),
                message: err.to_string(),
                data: Some(json!({
                    "kind": err.kind(),
                    "retryable": err.is_retryable(),
                })),
            }),
        }
    }
}

/// Dispatches JSON-RPC requests to a [`ParserService`]
pub struct RpcServer {
    service: ParserService,
}

impl RpcServer {
    pub fn new(service: ParserService) -> Self {
        Self { service }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            METHOD_PARSE => {
                let req: ParseRequest = match serde_json::from_value(request.params) {
                    Ok(req) => req,
                    Err(e) => {
                        return JsonRpcResponse::error(
                            request.id,
                            -32602,
                            format!("Invalid params: {}", e),
                        )
                    }
                };
                respond(request.id, self.service.parse(req).await)
            }
            METHOD_PARSE_TEST => {
                let req: ParseTestRequest = match serde_json::from_value(request.params) {
                    Ok(req) => req,
                    Err(e) => {
                        return JsonRpcResponse::error(
                            request.id,
                            -32602,
                            format!("Invalid params: {}", e),
                        )
                    }
                };
                respond(request.id, self.service.parse_test(req).await)
            }
            METHOD_DESCRIBE => JsonRpcResponse::success(request.id, self.service.describe()),
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    /// Handle one framed line, returning the framed reply if one is due
    ///
    /// Notifications (requests without an id) are executed but not
    /// answered.
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                let response = JsonRpcResponse::error(None, -32700, format!("Parse error: {}", e));
                return Some(serde_json::to_string(&response).unwrap_or_default());
            }
        };

        let is_notification = request.id.is_none();
        let response = self.handle_request(request).await;
        if is_notification {
            return None;
        }
        Some(serde_json::to_string(&response).unwrap_or_default())
    }

    async fn handle_connection(&self, stream: TcpStream) -> std::io::Result<()> {
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(reply) = self.handle_line(&line).await {
                writer.write_all(reply.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        Ok(())
    }
}

fn respond(id: Option<Value>, outcome: Result<ExtractionResult, ExtractError>) -> JsonRpcResponse {
    match outcome {
        Ok(result) => {
            JsonRpcResponse::success(id, serde_json::to_value(&result).unwrap_or_default())
        }
        Err(e) => {
            warn!(error = %e, kind = e.kind(), "Request failed");
            JsonRpcResponse::extract_error(id, &e)
        }
    }
}

/// Bind `address` and serve until the process exits
pub async fn run_server(address: &str, service: ParserService) -> std::io::Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!(address = %listener.local_addr()?, "Listening");
    serve(listener, service).await;
    Ok(())
}

/// Accept connections on `listener` forever
pub async fn serve(listener: TcpListener, service: ParserService) {
    let server = Arc::new(RpcServer::new(service));

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "Failed to accept connection");
                continue;
            }
        };
        debug!(%peer, "Accepted connection");

        let server = Arc::clone(&server);
        tokio::spawn(async move {
            if let Err(e) = server.handle_connection(stream).await {
                warn!(%peer, error = %e, "Connection closed with error");
            }
        });
    }
}

/// Errors seen by the RPC client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not reach or talk to the server
    #[error("Connection failed: {0}")]
    Io(#[from] std::io::Error),

    /// The deadline expired before a reply arrived
    #[error("Call timed out after {0:?}")]
    Timeout(Duration),

    /// The reply was not valid JSON-RPC
    #[error("Malformed reply: {0}")]
    Malformed(String),

    /// The server answered with an error
    #[error("Server error {code}: {message}{}", retry_hint(.retryable))]
    Rpc {
        code: i32,
        message: String,
        retryable: bool,
    },
}

fn retry_hint(retryable: &bool) -> &'static str {
    if *retryable {
        " (retryable)"
    } else {
        ""
    }
}

/// Send one request line and read one reply line
async fn exchange(
    address: &str,
    method: &str,
    params: Value,
) -> Result<JsonRpcResponse, ClientError> {
    let mut stream = TcpStream::connect(address).await?;
    let request = JsonRpcRequest::new(1, method, params);
    let mut line =
        serde_json::to_string(&request).map_err(|e| ClientError::Malformed(e.to_string()))?;
    line.push('\n');
    stream.write_all(line.as_bytes()).await?;
    stream.flush().await?;

    let mut reply = String::new();
    BufReader::new(stream).read_line(&mut reply).await?;
    if reply.is_empty() {
        return Err(ClientError::Malformed(
            "connection closed before reply".to_string(),
        ));
    }
    serde_json::from_str(&reply).map_err(|e| ClientError::Malformed(e.to_string()))
}

/// Call `method` on the server at `address` and return its result
pub async fn call(
    address: &str,
    method: &str,
    params: Value,
    deadline: Duration,
) -> Result<Value, ClientError> {
    let response = tokio::time::timeout(deadline, exchange(address, method, params))
        .await
        .map_err(|_| ClientError::Timeout(deadline))??;

    if let Some(error) = response.error {
        let retryable = error
            .data
            .as_ref()
            .and_then(|d| d.get("retryable"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        return Err(ClientError::Rpc {
            code: error.code,
            message: error.message,
            retryable,
        });
    }

    response
        .result
        .ok_or_else(|| ClientError::Malformed("reply has neither result nor error".to_string()))
}

/// Call `Parse` or `ParseTest` and decode the summary
pub async fn call_extract(
    address: &str,
    method: &str,
    params: Value,
) -> Result<ExtractionResult, ClientError> {
    let value = call(address, method, params, CLIENT_TIMEOUT).await?;
    serde_json::from_value(value).map_err(|e| ClientError::Malformed(e.to_string()))
}
