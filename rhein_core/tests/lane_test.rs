use rhein_core::chart::Note;
use rhein_core::gameplay::lane::{lanes, Lane};

#[test]
fn test_lane_pops_in_chart_order() {
    let mut lane = Lane::new(0);
    for beat in [1.0, 2.0, 3.0] {
        lane.push_in_order(Note::new(0, beat, 0.0));
    }

    assert_eq!(lane.len(), 3);
    assert_eq!(lane.peek().map(|n| n.beat), Some(1.0));
    assert_eq!(lane.pop_front().map(|n| n.beat), Some(1.0));
    assert_eq!(lane.pop_front().map(|n| n.beat), Some(2.0));
    assert_eq!(lane.pop_front().map(|n| n.beat), Some(3.0));
    assert!(lane.is_empty());
}

#[test]
fn test_pop_on_empty_lane_is_a_no_op() {
    let mut lane = Lane::new(3);
    assert!(lane.pop_front().is_none());
    assert!(lane.peek().is_none());
    assert!(lane.is_empty());
}

#[test]
fn test_pop_keeps_note_state() {
    let mut lane = Lane::new(1);
    lane.push_in_order(Note::new(1, 1.0, 0.0));
    lane.push_in_order(Note::new(1, 2.0, 0.0));

    // Popping does not judge
    let note = lane.pop_front().unwrap();
    assert!(!note.is_judged());

    lane.peek_mut().unwrap().destroy();
    let note = lane.pop_front().unwrap();
    assert!(note.is_destroyed());
}

#[test]
fn test_equal_beats_keep_insertion_order() {
    let mut lane = Lane::new(0);
    lane.push_in_order(Note::new(0, 1.0, 0.0));
    lane.push_in_order(Note::new(0, 1.0, 0.5));

    assert_eq!(lane.pop_front().unwrap().length, 0.0);
    assert_eq!(lane.pop_front().unwrap().length, 0.5);
}

#[test]
fn test_lanes_are_indexed() {
    let all = lanes(4);
    assert_eq!(all.len(), 4);
    assert!(all.iter().enumerate().all(|(i, l)| l.index == i && l.is_empty()));
}
