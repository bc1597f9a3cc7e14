use serde::{Deserialize, Serialize};

/// `type` discriminant of every message the console shim posts to the host.
pub const CONSOLE_BRIDGE_TYPE: &str = "console-log";

/// Marker substituted for circular references during argument stringification
/// inside the sandbox.
pub const CIRCULAR_MARKER: &str = "[Circular]";

/// One intercepted console call or uncaught error/rejection, as delivered
/// over the sandbox-to-host message channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleBridgeMessage {
  #[serde(rename = "type")]
  pub kind: String,
  pub data: ConsoleLogData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleLogData {
  /// Console method name (`log`, `warn`, `error`, ...) or a synthetic method
  /// for uncaught errors and rejections.
  pub method: String,
  /// Best-effort string form of the arguments, space-joined.
  pub message: String,
  /// Milliseconds since the epoch, as the sandbox clock saw it.
  pub timestamp: f64,
}

impl ConsoleBridgeMessage {
  pub fn is_console_log(&self) -> bool {
    self.kind == CONSOLE_BRIDGE_TYPE
  }
}

#[test]
fn wire_shape_round_trips() {
  let json = r#"{"type":"console-log","data":{"method":"warn","message":"careful","timestamp":1700000000000.0}}"#;
  let message: ConsoleBridgeMessage = serde_json::from_str(json).unwrap();
  assert!(message.is_console_log());
  assert_eq!(message.data.method, "warn");
  assert_eq!(serde_json::from_str::<ConsoleBridgeMessage>(&serde_json::to_string(&message).unwrap()).unwrap(), message);
}
