use super::*;

#[test]
fn skip_spaces_stops_at_first_non_space() {
    let mut pos = 0;
    skip_spaces(b"   A", &mut pos);
    assert_eq!(pos, 3);
}

#[test]
fn skip_spaces_on_no_leading_space_is_a_no_op() {
    let mut pos = 2;
    skip_spaces(b"AB", &mut pos);
    assert_eq!(pos, 2);
}

#[test]
fn peek_past_the_end_is_none() {
    assert_eq!(peek(b"AB", 5), None);
    assert_eq!(peek(b"AB", 1), Some(b'B'));
}
