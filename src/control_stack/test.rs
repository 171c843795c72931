use super::*;
use crate::memory::ProgramBuffer;

fn for_frame(var: u8) -> ForFrame {
    ForFrame {
        var,
        terminal: 10,
        step: 1,
        resume_line: Some(42),
        resume_txt: 3,
    }
}

#[test]
fn push_and_find_round_trips_a_for_frame() {
    let mut buf = ProgramBuffer::new(256);
    push_for(&mut buf, for_frame(b'I')).unwrap();
    let (_, found) = find_for(&buf, b'I').expect("frame should be found");
    assert_eq!(found, for_frame(b'I'));
}

#[test]
fn scan_finds_the_most_recent_matching_for() {
    let mut buf = ProgramBuffer::new(256);
    push_for(&mut buf, for_frame(b'I')).unwrap();
    let mut newer = for_frame(b'I');
    newer.terminal = 99;
    push_for(&mut buf, newer).unwrap();

    let (_, found) = find_for(&buf, b'I').unwrap();
    assert_eq!(found.terminal, 99);
}

#[test]
fn next_skips_past_intervening_gosub_frames_to_find_its_for() {
    let mut buf = ProgramBuffer::new(256);
    push_for(&mut buf, for_frame(b'I')).unwrap();
    push_gosub(
        &mut buf,
        GosubFrame {
            resume_line: Some(1),
            resume_txt: 0,
        },
    )
    .unwrap();

    let (_, found) = find_for(&buf, b'I').expect("GOSUB frame above it must not hide the FOR");
    assert_eq!(found.var, b'I');
}

#[test]
fn return_matches_the_topmost_gosub_and_leaves_older_frames_alone() {
    let mut buf = ProgramBuffer::new(256);
    push_gosub(
        &mut buf,
        GosubFrame {
            resume_line: Some(10),
            resume_txt: 0,
        },
    )
    .unwrap();
    push_for(&mut buf, for_frame(b'I')).unwrap();
    push_gosub(
        &mut buf,
        GosubFrame {
            resume_line: Some(20),
            resume_txt: 5,
        },
    )
    .unwrap();

    let (offset, matched) = find_gosub(&buf).expect("a GOSUB frame is on top");
    assert_eq!(matched.resume_line, Some(20));
    remove(&mut buf, offset, GOSUB_FRAME_BYTES);

    // The abandoned FOR is still there underneath, untouched.
    let (_, surviving_for) = find_for(&buf, b'I').expect("FOR below the popped GOSUB remains");
    assert_eq!(surviving_for.var, b'I');
    // And the original, older GOSUB survives too.
    let (_, outer) = find_gosub(&buf).expect("outer GOSUB remains");
    assert_eq!(outer.resume_line, Some(10));
}

#[test]
fn next_pop_on_fall_through_removes_only_the_matched_for() {
    let mut buf = ProgramBuffer::new(256);
    push_for(&mut buf, for_frame(b'I')).unwrap();
    push_for(&mut buf, for_frame(b'J')).unwrap();

    let (offset, _) = find_for(&buf, b'J').unwrap();
    remove(&mut buf, offset, FOR_FRAME_BYTES);

    assert_eq!(find_for(&buf, b'J'), Err(ErrorKind::JumpPointNotFound));
    let (_, still_there) = find_for(&buf, b'I').expect("the other FOR frame must survive");
    assert_eq!(still_there.var, b'I');
}

#[test]
fn update_for_rewrites_the_loop_variable_in_place() {
    let mut buf = ProgramBuffer::new(256);
    push_for(&mut buf, for_frame(b'I')).unwrap();
    let (offset, mut frame) = find_for(&buf, b'I').unwrap();
    frame.terminal = 7;
    update_for(&mut buf, offset, &frame);

    let (_, reread) = find_for(&buf, b'I').unwrap();
    assert_eq!(reread.terminal, 7);
}

#[test]
fn at_least_five_nested_for_frames_fit_before_overflow() {
    let mut buf = ProgramBuffer::new(crate::constants::VARIABLE_REGION_BYTES + FOR_FRAME_BYTES * 5);
    for i in 0..5 {
        push_for(&mut buf, for_frame(b'A' + i as u8)).unwrap();
    }
    assert_eq!(
        push_for(&mut buf, for_frame(b'Z')),
        Err(ErrorKind::StackOverflow)
    );
}

#[test]
fn absent_for_or_gosub_is_an_error() {
    let buf = ProgramBuffer::new(256);
    assert_eq!(find_for(&buf, b'I'), Err(ErrorKind::JumpPointNotFound));
    assert!(find_gosub(&buf).is_none());
}

#[test]
fn next_for_the_outer_variable_while_inner_loop_is_still_open_errors() {
    let mut buf = ProgramBuffer::new(256);
    push_for(&mut buf, for_frame(b'J')).unwrap();
    push_for(&mut buf, for_frame(b'I')).unwrap();

    assert_eq!(find_for(&buf, b'J'), Err(ErrorKind::JumpPointNotFound));
}
