use super::*;
use pretty_assertions::assert_eq;

#[test]
fn builder_collects_parts() {
    let diag = Diagnostic::error(ErrorCode::E2004)
        .with_message("operator 'not' requires boolean operand")
        .with_label(Span::new(2, 7), "found f64")
        .with_secondary_label(Span::new(0, 1), "operator here")
        .with_note("booleans are u8")
        .with_suggestion("compare against zero instead");

    assert!(diag.is_error());
    assert_eq!(diag.primary_span(), Some(Span::new(2, 7)));
    assert_eq!(diag.labels.len(), 2);
}

#[test]
fn display_lists_labels_notes_and_help() {
    let diag = Diagnostic::error(ErrorCode::E2003)
        .with_message("unresolved symbol: x")
        .with_label(Span::new(0, 1), "not found in this scope")
        .with_note("declared names are case sensitive")
        .with_suggestion("did you mean `X`?");

    assert_eq!(
        diag.to_string(),
        "error [E2003]: unresolved symbol: x\n  \
         --> 0..1: not found in this scope\n  \
         = note: declared names are case sensitive\n  \
         = help: did you mean `X`?"
    );
}

#[test]
fn type_mismatch_names_both_types() {
    let diag = type_mismatch(Span::new(0, 5), "str", "f64", "arithmetic");
    assert_eq!(diag.code, ErrorCode::E2001);
    assert_eq!(
        diag.message,
        "type mismatch: cannot use str and f64 in arithmetic operation"
    );
}

#[test]
fn warning_is_not_error() {
    let diag = Diagnostic::warning(ErrorCode::E2010).with_message("narrowing");
    assert!(!diag.is_error());
    assert_eq!(diag.primary_span(), None);
}
