/// Console-interception shim injected into every synthesized document.
///
/// Mirrors all console output and uncaught errors/rejections to the host as
/// `{ type: "console-log", data: { method, message, timestamp } }` messages.
/// The target origin is deliberately `"*"`: the document is synthesized
/// locally, so the channel is not a security boundary beyond the execution
/// sandbox itself.
pub const CONSOLE_SHIM: &str = r#"(function () {
  function serialize(value) {
    if (typeof value === "string") return value;
    try {
      var seen = new WeakSet();
      var out = JSON.stringify(value, function (key, inner) {
        if (typeof inner === "object" && inner !== null) {
          if (seen.has(inner)) return "[Circular]";
          seen.add(inner);
        }
        if (typeof inner === "function") return "[Function: " + (inner.name || "anonymous") + "]";
        return inner;
      });
      return out === undefined ? String(value) : out;
    } catch (error) {
      try { return String(value); } catch (coercionError) { return "[Unserializable]"; }
    }
  }
  function post(method, args) {
    var message = "";
    try { message = args.map(serialize).join(" "); } catch (error) {}
    try {
      parent.postMessage({ type: "console-log", data: { method: method, message: message, timestamp: Date.now() } }, "*");
    } catch (error) {}
  }
  ["log", "info", "warn", "error", "debug"].forEach(function (method) {
    var original = console[method];
    console[method] = function () {
      var args = Array.prototype.slice.call(arguments);
      post(method, args);
      if (original) original.apply(console, args);
    };
  });
  window.addEventListener("error", function (event) {
    post("error", [event.message + " (" + (event.filename || "?") + ":" + event.lineno + ")"]);
  });
  window.addEventListener("unhandledrejection", function (event) {
    post("error", ["Unhandled promise rejection: " + serialize(event.reason)]);
  });
})();"#;
