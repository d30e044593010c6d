use std::time::{Duration, Instant};
use wormloop::focus::{FocusState, HoldKind};

#[test]
fn tap_toggles_visibility_exactly_once() {
    let base = Instant::now();
    let mut focus = FocusState::new(true);

    focus.press(base);
    assert!(focus.focused(), "press grants focus");
    assert!(focus.visible(), "visibility only changes on release");

    let kind = focus.release(base + Duration::from_millis(100));
    assert_eq!(kind, Some(HoldKind::Tap));
    assert!(!focus.focused());
    assert!(!focus.visible(), "tap toggles visibility");

    focus.press(base + Duration::from_secs(1));
    focus.release(base + Duration::from_millis(1100));
    assert!(focus.visible(), "second tap toggles it back");
}

#[test]
fn boundary_499ms_is_a_tap() {
    let base = Instant::now();
    let mut focus = FocusState::new(true);
    focus.press(base);
    let kind = focus.release(base + Duration::from_millis(499));
    assert_eq!(kind, Some(HoldKind::Tap));
    assert!(!focus.visible());
}

#[test]
fn boundary_500ms_is_a_hold() {
    let base = Instant::now();
    let mut focus = FocusState::new(true);
    focus.press(base);
    let kind = focus.release(base + Duration::from_millis(500));
    assert_eq!(kind, Some(HoldKind::Hold));
    assert!(focus.visible(), "a hold never changes visibility");
}

#[test]
fn hold_grants_focus_for_its_duration_only() {
    let base = Instant::now();
    let mut focus = FocusState::new(false);

    focus.press(base);
    assert!(focus.focused());
    focus.release(base + Duration::from_secs(3));
    assert!(!focus.focused(), "release always drops focus");
    assert!(!focus.visible(), "held past the threshold, visibility untouched");
}

#[test]
fn custom_threshold_is_respected() {
    let base = Instant::now();
    let mut focus = FocusState::with_threshold(true, Duration::from_millis(200));
    focus.press(base);
    assert_eq!(focus.release(base + Duration::from_millis(250)), Some(HoldKind::Hold));
    assert!(focus.visible());
}
