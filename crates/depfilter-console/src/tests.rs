use super::*;

fn visitor(event: &str) -> EventVisitor {
    EventVisitor {
        event: Some(event.to_string()),
        ..EventVisitor::default()
    }
}

#[test]
fn test_rejected_mentions_package_version_and_line() {
    let mut v = visitor("rejected");
    v.package = Some("torch".into());
    v.version = Some("1.12.5".into());
    v.line = Some(4);

    let output = format_event(&v, Level::DEBUG);
    assert!(output.contains("torch"));
    assert!(output.contains("1.12.5"));
    assert!(output.contains("line"));
    assert!(output.contains('4'));
}

#[test]
fn test_constraints_loaded_defaults_path() {
    let mut v = visitor("constraints_loaded");
    v.count = Some(4);
    let output = format_event(&v, Level::INFO);
    assert!(output.contains("<memory>"));
}

#[test]
fn test_unknown_event_without_message_is_silent() {
    let v = visitor("something_else");
    assert!(format_event(&v, Level::INFO).is_empty());
}

#[test]
fn test_plain_message_is_printed() {
    let v = EventVisitor {
        message: Some("hello".into()),
        ..EventVisitor::default()
    };
    assert!(format_event(&v, Level::WARN).contains("hello"));
}

#[test]
fn test_init_is_idempotent() {
    init();
    init_with("depfilter=trace");
    tracing::info!(target: "depfilter_rules", event = "constraints_loaded", count = 1u64);
}
