//! Handler for the `com.routine.applist` method channel.
//!
//! The Flutter UI pushes the block configuration through `updateAppList`;
//! the remaining calls are the small set the runner has always answered.

mod dtos;

pub use dtos::{MethodCall, MethodResponse, StartOnLoginArgs, UpdateAppListArgs};

use crate::blocklist::{BlockListStore, ListMode};
use crate::constants::APP_LIST_CHANNEL;
use crate::error::AppError;
use log::{debug, info, warn};
use serde_json::Value;
use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct AppListChannel {
    store: Arc<BlockListStore>,
    engine_ready: AtomicBool,
    start_on_login: AtomicBool,
}

impl AppListChannel {
    pub fn new(store: Arc<BlockListStore>) -> Self {
        Self {
            store,
            engine_ready: AtomicBool::new(false),
            start_on_login: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &'static str {
        APP_LIST_CHANNEL
    }

    pub fn is_engine_ready(&self) -> bool {
        self.engine_ready.load(Ordering::SeqCst)
    }

    pub fn handle(&self, call: MethodCall) -> MethodResponse {
        info!("Received {}", call.method);

        let result = match call.method.as_str() {
            "engineReady" => Ok(self.engine_ready()),
            "updateAppList" => self.update_app_list(call.arguments),
            "setStartOnLogin" => self.set_start_on_login(call.arguments),
            "getStartOnLogin" => Ok(Value::Bool(self.start_on_login.load(Ordering::SeqCst))),
            other => {
                warn!("Unknown method on {APP_LIST_CHANNEL}: {other}");
                return MethodResponse::NotImplemented;
            }
        };

        match result {
            Ok(result) => MethodResponse::Success { result },
            Err(e) => {
                warn!("{} failed: {e}", call.method);
                error_response(&e)
            }
        }
    }

    /// Decode one JSON-encoded call and handle it.
    pub fn handle_json(&self, raw: &str) -> MethodResponse {
        match serde_json::from_str::<MethodCall>(raw) {
            Ok(call) => self.handle(call),
            Err(e) => error_response(&AppError::from(e)),
        }
    }

    fn engine_ready(&self) -> Value {
        self.engine_ready.store(true, Ordering::SeqCst);
        Value::Bool(true)
    }

    /// Replace the block configuration. Rejected payloads leave it untouched.
    pub fn update_app_list(&self, arguments: Value) -> Result<Value, AppError> {
        let args: UpdateAppListArgs = serde_json::from_value(arguments).map_err(|e| {
            debug!("Rejected updateAppList payload: {e}");
            AppError::InvalidArguments {
                method: "updateAppList".into(),
            }
        })?;

        let apps = strings(args.apps);
        let dirs = strings(args.dirs.unwrap_or_default());
        self.store
            .set_configuration(ListMode::from_allow_flag(args.allow_list), &apps, &dirs);

        Ok(Value::Bool(true))
    }

    fn set_start_on_login(&self, arguments: Value) -> Result<Value, AppError> {
        let args: StartOnLoginArgs =
            serde_json::from_value(arguments).map_err(|_| AppError::InvalidArguments {
                method: "setStartOnLogin".into(),
            })?;
        self.start_on_login.store(args.enabled(), Ordering::SeqCst);
        Ok(Value::Bool(true))
    }
}

fn error_response(e: &AppError) -> MethodResponse {
    MethodResponse::Error {
        code: e.code().to_string(),
        message: e.to_string(),
    }
}

/// Keep string items, skip anything else the UI sent.
fn strings(values: Vec<Value>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|value| match value {
            Value::String(s) => Some(s),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => None,
        })
        .collect()
}

/// Serve newline-delimited JSON calls from `input`, one JSON response per
/// line on `output`, until EOF.
pub fn serve_lines<R, W>(channel: &AppListChannel, input: R, mut output: W) -> Result<(), AppError>
where
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = channel.handle_json(&line);
        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    fn setup() -> (Arc<BlockListStore>, AppListChannel) {
        let store = Arc::new(BlockListStore::with_exclusions([r"C:\Windows\explorer.exe"]));
        let channel = AppListChannel::new(Arc::clone(&store));
        (store, channel)
    }

    fn success(result: Value) -> MethodResponse {
        MethodResponse::Success { result }
    }

    #[test]
    fn test_update_app_list_applies_configuration() {
        let (store, channel) = setup();
        let response = channel.handle(MethodCall::new(
            "updateAppList",
            json!({ "apps": ["steam.exe"], "allowList": false, "dirs": [r"C:\Games\"] }),
        ));

        assert_eq!(response, success(json!(true)));
        assert_eq!(store.mode(), ListMode::Deny);
        assert!(store.is_blocked(r"D:\Steam\steam.exe"));
        assert!(store.is_blocked(r"C:\Games\other.exe"));
        assert!(!store.is_blocked(r"C:\Tools\editor.exe"));
    }

    #[test]
    fn test_update_app_list_allow_mode() {
        let (store, channel) = setup();
        channel.handle(MethodCall::new(
            "updateAppList",
            json!({ "apps": ["chrome.exe"], "allowList": true }),
        ));

        assert_eq!(store.mode(), ListMode::Allow);
        assert!(!store.is_blocked("chrome.exe"));
        assert!(store.is_blocked("steam.exe"));
    }

    #[test]
    fn test_update_app_list_accepts_categories_alias() {
        let (store, channel) = setup();
        channel.handle(MethodCall::new(
            "updateAppList",
            json!({ "apps": [], "allowList": false, "categories": [r"C:\Games\"] }),
        ));

        assert!(store.is_blocked(r"C:\Games\app.exe"));
    }

    #[test]
    fn test_update_app_list_null_dirs_means_none() {
        let (store, channel) = setup();
        let response = channel.handle(MethodCall::new(
            "updateAppList",
            json!({ "apps": ["steam"], "allowList": false, "dirs": null }),
        ));

        assert_eq!(response, success(json!(true)));
        assert!(store.snapshot().directories.is_empty());
        assert!(store.is_blocked("steam.exe"));
    }

    #[test]
    fn test_update_app_list_skips_non_string_items() {
        let (store, channel) = setup();
        let response = channel.handle(MethodCall::new(
            "updateAppList",
            json!({ "apps": ["steam", 42, null, {"name": "x"}], "allowList": false }),
        ));

        assert_eq!(response, success(json!(true)));
        assert_eq!(store.snapshot().members.len(), 1);
    }

    #[test]
    fn test_update_app_list_missing_fields_leaves_configuration() {
        let (store, channel) = setup();
        channel.handle(MethodCall::new(
            "updateAppList",
            json!({ "apps": ["steam"], "allowList": false }),
        ));
        let before = store.snapshot();

        for arguments in [
            json!({ "allowList": true }),
            json!({ "apps": ["chrome"] }),
            json!({ "apps": "chrome", "allowList": true }),
            json!({ "apps": [], "allowList": "yes" }),
            Value::Null,
            json!(["chrome"]),
        ] {
            let response = channel.handle(MethodCall::new("updateAppList", arguments));
            assert_eq!(
                response,
                MethodResponse::Error {
                    code: "invalid_arguments".into(),
                    message: "Arguments for updateAppList are invalid".into(),
                }
            );
        }

        assert_eq!(store.snapshot(), before);
        assert!(store.is_blocked("steam.exe"));
    }

    #[test]
    fn test_engine_ready() {
        let (_store, channel) = setup();
        assert!(!channel.is_engine_ready());
        assert_eq!(channel.handle(MethodCall::new("engineReady", Value::Null)), success(json!(true)));
        assert!(channel.is_engine_ready());
    }

    #[test]
    fn test_start_on_login_round_trip() {
        let (_store, channel) = setup();
        assert_eq!(channel.handle(MethodCall::new("getStartOnLogin", Value::Null)), success(json!(false)));

        channel.handle(MethodCall::new("setStartOnLogin", json!({ "enabled": true })));
        assert_eq!(channel.handle(MethodCall::new("getStartOnLogin", Value::Null)), success(json!(true)));

        channel.handle(MethodCall::new("setStartOnLogin", json!(false)));
        assert_eq!(channel.handle(MethodCall::new("getStartOnLogin", Value::Null)), success(json!(false)));
    }

    #[test]
    fn test_set_start_on_login_rejects_garbage() {
        let (_store, channel) = setup();
        let response = channel.handle(MethodCall::new("setStartOnLogin", json!("soon")));
        assert!(matches!(response, MethodResponse::Error { .. }));
    }

    #[test]
    fn test_unknown_method_is_not_implemented() {
        let (_store, channel) = setup();
        assert_eq!(
            channel.handle(MethodCall::new("getRunningApps", Value::Null)),
            MethodResponse::NotImplemented
        );
    }

    #[test]
    fn test_handle_json_malformed() {
        let (_store, channel) = setup();
        let response = channel.handle_json("{not json");
        assert!(matches!(response, MethodResponse::Error { ref code, .. } if code == "malformed_message"));
    }

    #[test]
    fn test_response_wire_shape() {
        let ok = serde_json::to_value(success(json!(true))).unwrap();
        assert_eq!(ok, json!({ "status": "success", "result": true }));

        let missing = serde_json::to_value(MethodResponse::NotImplemented).unwrap();
        assert_eq!(missing, json!({ "status": "notImplemented" }));
    }

    #[test]
    fn test_serve_lines_answers_each_call() {
        let (store, channel) = setup();
        let input = concat!(
            r#"{"method":"engineReady"}"#,
            "\n\n",
            r#"{"method":"updateAppList","arguments":{"apps":["steam"],"allowList":false}}"#,
            "\n",
            r#"{"method":"updateAppList","arguments":{}}"#,
            "\n",
        );
        let mut output = Vec::new();

        serve_lines(&channel, Cursor::new(input), &mut output).unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["status"], "success");
        assert_eq!(lines[1]["status"], "success");
        assert_eq!(lines[2]["status"], "error");
        assert!(store.is_blocked("steam.exe"));
    }
}
