// Integration tests for the process-wide logger
// Note: everything that touches the global registry lives in one test so the
// steps run in order against a single initialization.

use cartolog::{
    context_with_correlation_id, context_with_new_request_id, ctx_err, ctx_info, Attr,
    Context, GenericLevel, Handler, Level, LoggerConfig, SharedBuffer,
};
use serde_json::Value;

fn records(buf: &SharedBuffer) -> Vec<Value> {
    buf.lines()
        .iter()
        .map(|line| serde_json::from_str(line).expect("every line is JSON"))
        .collect()
}

/// Main integration test that covers multiple scenarios
#[test]
fn test_logging_comprehensive() {
    temp_env::with_var("FUZZ_MODE", None::<&str>, || {
        let buf = SharedBuffer::new();
        cartolog::init(LoggerConfig {
            level: "info".to_string(),
            include_caller: true,
            ..LoggerConfig::with_output(buf.clone())
        });
        assert_eq!(cartolog::get_level(), Level::Info);

        // Basic leveled logging through the free functions
        cartolog::debug().msg("filtered out");
        cartolog::info().str("key", "value").msg("Test message");
        let first = records(&buf);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0]["message"], "Test message");
        assert!(first[0]["caller"]
            .as_str()
            .unwrap()
            .contains("logging_integration_test.rs:"));
        buf.clear();

        // Correlation propagation through contexts
        let ctx = context_with_correlation_id(&Context::background(), "corr-123");
        ctx_info(&ctx).msg("test");
        assert!(buf.contents().contains("\"correlation_id\":\"corr-123\""));

        let ctx = context_with_new_request_id(&ctx);
        ctx_err(&ctx, "upstream timeout").msg("request failed");
        let last = records(&buf).pop().unwrap();
        assert_eq!(last["correlation_id"], "corr-123");
        assert_eq!(last["request_id"].as_str().unwrap().len(), 36);
        assert_eq!(last["error"], "upstream timeout");
        buf.clear();

        // Threshold changes apply to loggers already handed out
        let component = cartolog::with_component("sync");
        component.debug().msg("before");
        cartolog::set_level_string("debug");
        component.debug().msg("after");
        assert!(cartolog::is_level_enabled(Level::Debug));
        let lines = buf.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("after"));
        buf.clear();

        // Generic adapter round trip onto the same sink
        let generic = cartolog::new_generic_logger();
        generic.info(
            "test",
            [Attr::group(
                "request",
                vec![Attr::string("method", "GET"), Attr::int("status", 200)],
            )],
        );
        let record = records(&buf).pop().unwrap();
        assert_eq!(record["request.method"], "GET");
        assert_eq!(record["request.status"], 200);

        let warn_only = cartolog::new_generic_logger_with_level("warn");
        assert!(!warn_only.handler().enabled(GenericLevel::INFO));
        assert!(warn_only.handler().enabled(GenericLevel::WARN));
        buf.clear();

        // A per-logger level below the global one still enables debug
        cartolog::set_level(Level::Info);
        let verbose = cartolog::new_generic_logger_with_level("debug");
        assert!(verbose.handler().enabled(GenericLevel::DEBUG));
        assert!(!cartolog::is_level_enabled(Level::Debug));
        verbose.debug("verbose detail", []);
        let record = records(&buf).pop().unwrap();
        assert_eq!(record["level"], "debug");
        assert_eq!(record["message"], "verbose detail");
        buf.clear();

        // Security events land on the global sink with the auth component
        cartolog::security_logger().log_login_failure("jo", "local", "10.0.0.1", "bad token");
        let record = records(&buf).pop().unwrap();
        assert_eq!(record["component"], "auth");
        assert_eq!(record["error"], "authentication error");
        buf.clear();

        // Re-initialization swaps the output wholesale
        let second = SharedBuffer::new();
        cartolog::init(LoggerConfig {
            format: "console".to_string(),
            include_timestamp: false,
            ..LoggerConfig::with_output(second.clone())
        });
        cartolog::warn().int("count", 3).msg("switched");
        assert!(buf.contents().is_empty());
        assert_eq!(second.contents(), "WRN switched count=3\n");
    });
}
