use super::*;
use std::collections::HashSet;

#[test]
fn codes_are_unique() {
    let names: HashSet<_> = ErrorCode::ALL.iter().map(ErrorCode::as_str).collect();
    assert_eq!(names.len(), ErrorCode::ALL.len());
}

#[test]
fn every_code_is_classified() {
    for code in ErrorCode::ALL {
        let name = code.as_str();
        assert_eq!(name.len(), 5, "{name}");
        assert!(
            ["E1", "E2", "E3", "E4", "E9"].iter().any(|p| name.starts_with(p)),
            "{name} has no phase"
        );
        assert!(!code.description().is_empty());
    }
}

#[test]
fn phase_predicates() {
    assert!(ErrorCode::E2001.is_type_error());
    assert!(!ErrorCode::E3001.is_type_error());
    assert!(ErrorCode::E3002.is_literal_error());
    assert_eq!(ErrorCode::E4001.to_string(), "E4001");
}
