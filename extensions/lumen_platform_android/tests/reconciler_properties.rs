use std::sync::Arc;

use lumen_core::{ButtonMask, InputBuffer, InputEvent, Modifiers, MouseButton, Vector2};
use lumen_platform_android::pointer::android_buttons;
use lumen_platform_android::{
    InputSource, KeyboardTranslator, MotionAction, PointerTracker, TouchPoint, TouchReconciler,
};

fn touch_log(events: &[InputEvent]) -> Vec<(i32, bool)> {
    events
        .iter()
        .filter_map(|event| match event {
            InputEvent::ScreenTouch(t) => Some((t.index, t.pressed)),
            _ => None,
        })
        .collect()
}

fn drag_count(events: &[InputEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, InputEvent::ScreenDrag(_)))
        .count()
}

#[test]
fn gesture_begin_releases_previous_contacts_before_pressing_new_ones() {
    let buffer = InputBuffer::shared();
    let mut reconciler = TouchReconciler::new(buffer.clone());

    for (previous, next) in [(0usize, 1usize), (2, 3), (3, 1), (1, 4)] {
        let old: Vec<TouchPoint> = (0..previous)
            .map(|i| TouchPoint::new(i as i32, i as f32, 0.0))
            .collect();
        let new: Vec<TouchPoint> = (0..next)
            .map(|i| TouchPoint::new(10 + i as i32, 0.0, i as f32))
            .collect();

        reconciler.process_touch(MotionAction::Up, 0, &[]);
        if previous > 0 {
            reconciler.process_touch(MotionAction::Down, 0, &old);
        }
        buffer.drain();

        reconciler.process_touch(MotionAction::Down, 0, &new);
        let log = touch_log(&buffer.drain());

        let expected: Vec<(i32, bool)> = old
            .iter()
            .map(|p| (p.id, false))
            .chain(new.iter().map(|p| (p.id, true)))
            .collect();
        assert_eq!(log, expected, "previous {} next {}", previous, next);
        assert_eq!(reconciler.active(), new.as_slice());
    }
}

#[test]
fn move_with_wrong_contact_count_is_ignored() {
    let buffer = InputBuffer::shared();
    let mut reconciler = TouchReconciler::new(buffer.clone());
    let down = [TouchPoint::new(0, 1.0, 1.0), TouchPoint::new(1, 2.0, 2.0)];
    reconciler.process_touch(MotionAction::Down, 0, &down);
    buffer.drain();

    reconciler.process_touch(MotionAction::Move, 0, &[TouchPoint::new(0, 9.0, 9.0)]);
    reconciler.process_touch(
        MotionAction::Move,
        0,
        &[
            TouchPoint::new(0, 9.0, 9.0),
            TouchPoint::new(1, 9.0, 9.0),
            TouchPoint::new(2, 9.0, 9.0),
        ],
    );

    assert_eq!(buffer.pending(), 0);
    assert_eq!(reconciler.active(), &down);
}

#[test]
fn move_emits_one_drag_per_changed_contact() {
    let buffer = InputBuffer::shared();
    let mut reconciler = TouchReconciler::new(buffer.clone());
    reconciler.process_touch(
        MotionAction::Down,
        0,
        &[TouchPoint::new(3, 10.0, 10.0), TouchPoint::new(7, 50.0, 50.0)],
    );
    buffer.drain();

    reconciler.process_touch(
        MotionAction::Move,
        0,
        &[TouchPoint::new(7, 50.0, 50.0), TouchPoint::new(3, 10.0, 10.0)],
    );
    assert_eq!(drag_count(&buffer.drain()), 0);

    reconciler.process_touch(
        MotionAction::Move,
        0,
        &[TouchPoint::new(3, 12.5, 7.0), TouchPoint::new(7, 50.0, 50.0)],
    );
    let events = buffer.drain();
    assert_eq!(events.len(), 1);
    match events[0] {
        InputEvent::ScreenDrag(drag) => {
            assert_eq!(drag.index, 3);
            assert_eq!(drag.position, Vector2::new(12.5, 7.0));
            assert_eq!(drag.relative, Vector2::new(2.5, -3.0));
        }
        other => panic!("expected drag, got {:?}", other),
    }
}

#[test]
fn unmatched_contact_is_skipped_without_aborting_batch() {
    let buffer = InputBuffer::shared();
    let mut reconciler = TouchReconciler::new(buffer.clone());
    reconciler.process_touch(
        MotionAction::Down,
        0,
        &[TouchPoint::new(0, 0.0, 0.0), TouchPoint::new(1, 0.0, 0.0)],
    );
    buffer.drain();

    reconciler.process_touch(
        MotionAction::Move,
        0,
        &[TouchPoint::new(5, 3.0, 3.0), TouchPoint::new(1, 4.0, 4.0)],
    );

    let events = buffer.drain();
    assert_eq!(drag_count(&events), 1);
    assert_eq!(reconciler.active()[0].position, Vector2::ZERO);
    assert_eq!(reconciler.active()[1].position, Vector2::new(4.0, 4.0));
}

#[test]
fn secondary_contacts_are_added_and_removed() {
    let buffer = InputBuffer::shared();
    let mut reconciler = TouchReconciler::new(buffer.clone());
    let first = TouchPoint::new(0, 1.0, 1.0);
    let second = TouchPoint::new(1, 2.0, 2.0);

    reconciler.process_touch(MotionAction::Down, 0, &[first]);
    reconciler.process_touch(MotionAction::PointerDown, 1, &[first, second]);
    reconciler.process_touch(MotionAction::PointerUp, 0, &[first, second]);
    assert_eq!(reconciler.active(), &[second]);

    reconciler.process_touch(MotionAction::Cancel, 0, &[]);
    assert!(reconciler.active().is_empty());

    assert_eq!(
        touch_log(&buffer.drain()),
        vec![(0, true), (1, true), (0, false), (1, false)]
    );
}

#[test]
fn duplicate_pointer_down_does_not_stall_later_drags() {
    let buffer = InputBuffer::shared();
    let mut reconciler = TouchReconciler::new(buffer.clone());
    let batch = [TouchPoint::new(0, 0.0, 0.0), TouchPoint::new(1, 0.0, 0.0)];

    reconciler.process_touch(MotionAction::Down, 0, &batch[..1]);
    reconciler.process_touch(MotionAction::PointerDown, 1, &batch);
    reconciler.process_touch(MotionAction::PointerDown, 1, &batch);
    assert_eq!(reconciler.active().len(), 2);
    buffer.drain();

    reconciler.process_touch(
        MotionAction::Move,
        0,
        &[TouchPoint::new(0, 3.0, 0.0), TouchPoint::new(1, 9.0, 9.0)],
    );
    assert_eq!(drag_count(&buffer.drain()), 2);
}

#[test]
fn button_press_then_release_restores_mask() {
    let buffer = InputBuffer::shared();
    let mut tracker = PointerTracker::new(buffer.clone());
    let position = Vector2::new(5.0, 5.0);

    for (android, button) in [
        (android_buttons::PRIMARY, MouseButton::Left),
        (android_buttons::SECONDARY, MouseButton::Right),
        (android_buttons::TERTIARY, MouseButton::Middle),
        (android_buttons::BACK, MouseButton::XButton1),
        (android_buttons::FORWARD, MouseButton::XButton2),
    ] {
        let before = tracker.button_state();
        tracker.process_mouse_event(
            InputSource::MOUSE,
            MotionAction::ButtonPress,
            android,
            position,
            0.0,
            0.0,
            Modifiers::empty(),
        );
        tracker.process_mouse_event(
            InputSource::MOUSE,
            MotionAction::ButtonRelease,
            0,
            position,
            0.0,
            0.0,
            Modifiers::empty(),
        );
        assert_eq!(tracker.button_state(), before);

        let events = buffer.drain();
        let buttons: Vec<(MouseButton, bool)> = events
            .iter()
            .filter_map(|event| match event {
                InputEvent::MouseButton(b) => Some((b.button_index, b.pressed)),
                _ => None,
            })
            .collect();
        assert_eq!(buttons, vec![(button, true), (button, false)]);
    }
}

#[test]
fn vertical_scroll_synthesizes_wheel_click() {
    let buffer = InputBuffer::shared();
    let mut tracker = PointerTracker::new(buffer.clone());

    tracker.process_mouse_event(
        InputSource::MOUSE,
        MotionAction::Scroll,
        android_buttons::PRIMARY,
        Vector2::new(1.0, 2.0),
        2.0,
        0.0,
        Modifiers::empty(),
    );

    let events = buffer.drain();
    assert_eq!(events.len(), 2);
    let (InputEvent::MouseButton(press), InputEvent::MouseButton(release)) =
        (events[0], events[1])
    else {
        panic!("expected two button events, got {:?}", events);
    };

    assert_eq!(press.button_index, MouseButton::WheelUp);
    assert!(press.pressed);
    assert_eq!(press.factor, 2.0);
    assert_eq!(press.button_mask, ButtonMask::LEFT | ButtonMask::WHEEL_UP);

    assert_eq!(release.button_index, MouseButton::WheelUp);
    assert!(!release.pressed);
    assert_eq!(release.button_mask, ButtonMask::LEFT);

    tracker.process_mouse_event(
        InputSource::MOUSE,
        MotionAction::Scroll,
        0,
        Vector2::ZERO,
        0.0,
        0.0,
        Modifiers::empty(),
    );
    assert_eq!(buffer.pending(), 0);
}

#[test]
fn mismatched_surrogate_pair_emits_no_key_events() {
    let buffer = InputBuffer::shared();
    let mut keyboard = KeyboardTranslator::new(buffer.clone());

    keyboard.process_key_event(0, 0, 0xD83D, true);
    keyboard.process_key_event(0, 0, 0xD83D, true);
    assert_eq!(buffer.pending(), 0);

    let fresh = Arc::new(InputBuffer::new());
    let mut keyboard = KeyboardTranslator::new(fresh.clone());
    keyboard.process_key_event(0, 0, 0xDC00, true);
    assert_eq!(fresh.pending(), 0);
    assert_eq!(keyboard.dropped_units(), 1);
}
