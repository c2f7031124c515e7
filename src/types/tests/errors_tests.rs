use crate::types::errors::{DistributionError, DistributionParseError};

#[test]
fn test_distribution_error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.ini");
    let err = DistributionError::from(io_err);

    match err {
        DistributionError::Io(msg) => assert!(msg.contains("missing.ini")),
        _ => panic!("Expected DistributionError::Io"),
    }
}

#[test]
fn test_distribution_error_serialization() {
    let err = DistributionError::StoreUnavailable("not loaded".to_string());

    // DistributionError serializes as just its Display string
    let serialized = serde_json::to_string(&err).unwrap();
    assert_eq!(serialized, "\"Record store unavailable: not loaded\"");
}

#[test]
fn test_parse_error_display_includes_line_number() {
    let err = DistributionParseError::new(12, "Outfit = |A++B", "empty operand around '+'");

    assert_eq!(err.to_string(), "line 12: empty operand around '+'");
    assert_eq!(err.line_content, "Outfit = |A++B");
}
