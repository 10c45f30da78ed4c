//! Unit tests for the session window

use goldenbullx::signals::SessionWindow;

#[test]
fn default_session_is_five_to_twenty_two() {
    let session = SessionWindow::default();
    assert_eq!((session.start_hour(), session.end_hour()), (5, 22));
    assert!(!session.contains(4));
    assert!(session.contains(5));
    assert!(session.contains(21));
    assert!(!session.contains(22));
}

#[test]
fn full_day_session_contains_every_hour() {
    let session = SessionWindow::new(0, 24).unwrap();
    assert!((0..24).all(|hour| session.contains(hour)));
}

#[test]
fn invalid_ranges_are_rejected() {
    assert!(SessionWindow::new(22, 5).is_err());
    assert!(SessionWindow::new(8, 8).is_err());
    assert!(SessionWindow::new(5, 25).is_err());
}
