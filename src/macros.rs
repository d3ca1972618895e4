//! Internal macros for V8 scope boilerplate.

/// Allocate a V8 string or bail out with the given error variant.
///
/// # Example
/// ```ignore
/// let code = v8_str!(scope, source, ScriptError::Engine)?;
/// ```
macro_rules! v8_str {
    ($scope:expr, $text:expr, $err:path) => {
        v8::String::new($scope, $text)
            .ok_or_else(|| $err(format!("failed to allocate string ({} bytes)", $text.len())))
    };
}

/// Collect exception information from a `v8::TryCatch` scope.
///
/// Falls back to "Unknown exception" when the engine reports no exception value
/// (for example when execution was terminated).
macro_rules! exception_details {
    ($tc:expr) => {{
        let tc = $tc;

        let message = tc
            .exception()
            .and_then(|e| e.to_string(tc))
            .map(|s| s.to_rust_string_lossy(tc))
            .unwrap_or_else(|| "Unknown exception".to_string());

        let mut details = $crate::error::ExceptionDetails {
            message,
            ..Default::default()
        };

        if let Some(msg) = tc.message() {
            details.resource_name = msg
                .get_script_resource_name(tc)
                .filter(|name| !name.is_undefined())
                .and_then(|name| name.to_string(tc))
                .map(|s| s.to_rust_string_lossy(tc));
            details.line = msg.get_line_number(tc);
            details.start_column = msg.get_start_column();
            details.end_column = msg.get_end_column();
            details.source_line = msg
                .get_source_line(tc)
                .map(|s| s.to_rust_string_lossy(tc));
        }

        details
    }};
}
