use super::model::{Playlist, Track, next_wrapping, prev_wrapping, successor};

fn t(title: &str) -> Track {
    Track {
        path: std::path::PathBuf::new(),
        title: title.into(),
        artist: None,
        album: None,
        duration: None,
        display: title.into(),
    }
}

fn abc() -> Playlist {
    Playlist::new(vec![t("A"), t("B"), t("C")])
}

#[test]
fn next_with_no_current_selects_first() {
    assert_eq!(next_wrapping(3, None), Some(0));
}

#[test]
fn next_on_last_wraps_to_first() {
    assert_eq!(next_wrapping(3, Some(2)), Some(0));
    assert_eq!(next_wrapping(3, Some(0)), Some(1));
}

#[test]
fn prev_with_no_current_selects_last() {
    assert_eq!(prev_wrapping(3, None), Some(2));
}

#[test]
fn prev_on_first_wraps_to_last() {
    assert_eq!(prev_wrapping(3, Some(0)), Some(2));
    assert_eq!(prev_wrapping(3, Some(2)), Some(1));
}

#[test]
fn successor_does_not_wrap() {
    assert_eq!(successor(3, 0), Some(1));
    assert_eq!(successor(3, 1), Some(2));
    assert_eq!(successor(3, 2), None);
}

#[test]
fn empty_list_navigation_is_a_no_op() {
    assert_eq!(next_wrapping(0, None), None);
    assert_eq!(prev_wrapping(0, None), None);
    assert_eq!(successor(0, 0), None);
}

#[test]
fn select_keeps_exactly_one_marker() {
    let mut pl = abc();
    assert_eq!(pl.selected(), None);

    pl.select(0);
    assert_eq!(pl.selected(), Some(0));

    pl.select(2);
    assert_eq!(pl.selected(), Some(2));

    pl.clear_selection();
    assert_eq!(pl.selected(), None);
}

#[test]
fn select_out_of_range_is_ignored() {
    let mut pl = abc();
    pl.select(1);
    pl.select(99);
    assert_eq!(pl.selected(), Some(1));
}

#[test]
fn playlist_navigation_delegates_to_pure_helpers() {
    let pl = abc();
    assert_eq!(pl.next_wrapping(None), Some(0));
    assert_eq!(pl.next_wrapping(Some(2)), Some(0));
    assert_eq!(pl.prev_wrapping(Some(0)), Some(2));
    assert_eq!(pl.successor(2), None);
}
