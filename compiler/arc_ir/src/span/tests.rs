use super::*;

#[test]
fn merge_covers_both() {
    let a = Span::new(4, 9);
    let b = Span::new(1, 6);
    assert_eq!(a.merge(b), Span::new(1, 9));
}

#[test]
fn len_and_empty() {
    assert_eq!(Span::new(3, 8).len(), 5);
    assert!(Span::new(3, 3).is_empty());
    assert!(Span::DUMMY.is_dummy());
}

#[test]
fn range_overflow_is_reported() {
    let too_big = usize::try_from(u64::from(u32::MAX) + 1).unwrap_or(usize::MAX);
    if too_big > u32::MAX as usize {
        assert_eq!(
            Span::try_from_range(too_big..too_big),
            Err(SpanError::StartTooLarge(too_big))
        );
    }
    assert_eq!(Span::try_from_range(2..5), Ok(Span::new(2, 5)));
}
