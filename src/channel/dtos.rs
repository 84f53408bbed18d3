use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One call from the UI, as decoded by the host's message codec.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: &str, arguments: Value) -> Self {
        Self {
            method: method.to_string(),
            arguments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodResponse {
    Success { result: Value },
    Error { code: String, message: String },
    NotImplemented,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAppListArgs {
    pub apps: Vec<Value>,
    #[serde(rename = "allowList")]
    pub allow_list: bool,
    /// Optional; `null` means no directories.
    #[serde(default, alias = "categories")]
    pub dirs: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StartOnLoginArgs {
    Flag(bool),
    Map { enabled: bool },
}

impl StartOnLoginArgs {
    pub fn enabled(&self) -> bool {
        match self {
            StartOnLoginArgs::Flag(enabled) | StartOnLoginArgs::Map { enabled } => *enabled,
        }
    }
}
