//! Android touch input handling
//!
//! Reconciles raw Android touch batches into discrete touch press, release
//! and drag events.
//!
//! Android reports every contact on every `MotionEvent`; the engine wants one
//! event per change. [`TouchReconciler`] keeps the set of active contacts and
//! diffs each batch against it.

use lumen_core::{InputEvent, ScreenDrag, ScreenTouch, SharedInputSink, Vector2};
use smallvec::SmallVec;

/// `MotionEvent` action codes (`AMOTION_EVENT_ACTION_*`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum MotionAction {
    /// First contact of a gesture
    Down = 0,
    /// Last contact lifted
    Up = 1,
    Move = 2,
    Cancel = 3,
    Outside = 4,
    /// A secondary contact was added
    PointerDown = 5,
    /// A secondary contact was lifted
    PointerUp = 6,
    HoverMove = 7,
    Scroll = 8,
    HoverEnter = 9,
    HoverExit = 10,
    ButtonPress = 11,
    ButtonRelease = 12,
}

impl MotionAction {
    /// Decode a raw action, ignoring the pointer index bits
    pub const fn from_raw(action: i32) -> Option<Self> {
        let action = match action & ACTION_MASK {
            0 => MotionAction::Down,
            1 => MotionAction::Up,
            2 => MotionAction::Move,
            3 => MotionAction::Cancel,
            4 => MotionAction::Outside,
            5 => MotionAction::PointerDown,
            6 => MotionAction::PointerUp,
            7 => MotionAction::HoverMove,
            8 => MotionAction::Scroll,
            9 => MotionAction::HoverEnter,
            10 => MotionAction::HoverExit,
            11 => MotionAction::ButtonPress,
            12 => MotionAction::ButtonRelease,
            _ => return None,
        };
        Some(action)
    }
}

/// Mask selecting the action from a raw `MotionEvent` action value
pub const ACTION_MASK: i32 = 0xff;

/// Input device source flags (`AINPUT_SOURCE_*`)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InputSource(pub i32);

impl InputSource {
    pub const KEYBOARD: InputSource = InputSource(0x0000_0101);
    pub const DPAD: InputSource = InputSource(0x0000_0201);
    pub const GAMEPAD: InputSource = InputSource(0x0000_0401);
    pub const TOUCHSCREEN: InputSource = InputSource(0x0000_1002);
    pub const MOUSE: InputSource = InputSource(0x0000_2002);
    pub const STYLUS: InputSource = InputSource(0x0000_4002);
    pub const TRACKBALL: InputSource = InputSource(0x0001_0004);
    pub const MOUSE_RELATIVE: InputSource = InputSource(0x0002_0004);
    pub const TOUCHPAD: InputSource = InputSource(0x0010_0008);
    pub const JOYSTICK: InputSource = InputSource(0x0100_0010);

    /// Whether every bit of `other` is set
    pub const fn contains(self, other: InputSource) -> bool {
        self.0 & other.0 == other.0
    }

    /// True pointing device: positions are absolute window coordinates
    pub const fn is_mouse(self) -> bool {
        self.contains(InputSource::MOUSE)
    }
}

/// One physical contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Pointer ID, stable for the lifetime of the contact
    pub id: i32,
    /// Position in window space
    pub position: Vector2,
}

impl TouchPoint {
    pub const fn new(id: i32, x: f32, y: f32) -> Self {
        Self {
            id,
            position: Vector2::new(x, y),
        }
    }
}

/// Active touch set, sized for typical multi-touch screens
pub type TouchSet = SmallVec<[TouchPoint; 10]>;

/// Converts Android touch batches into touch press/release/drag events
pub struct TouchReconciler {
    sink: SharedInputSink,
    touches: TouchSet,
}

impl TouchReconciler {
    pub fn new(sink: SharedInputSink) -> Self {
        Self {
            sink,
            touches: TouchSet::new(),
        }
    }

    /// Contacts currently held down
    pub fn active(&self) -> &[TouchPoint] {
        &self.touches
    }

    /// Process one `MotionEvent` batch
    ///
    /// `pointer_id` is the contact the action refers to (only meaningful for
    /// `PointerDown`/`PointerUp`); `points` holds every contact in the batch.
    pub fn process_touch(&mut self, action: MotionAction, pointer_id: i32, points: &[TouchPoint]) {
        match action {
            MotionAction::Down => self.gesture_begin(points),
            MotionAction::Move => self.motion(points),
            MotionAction::Up | MotionAction::Cancel => self.release_all(),
            MotionAction::PointerDown => self.pointer_down(pointer_id, points),
            MotionAction::PointerUp => self.pointer_up(pointer_id),
            _ => {}
        }
    }

    fn gesture_begin(&mut self, points: &[TouchPoint]) {
        // A new gesture while contacts are still held means an up was missed.
        self.release_all();

        self.touches.extend_from_slice(points);
        for point in &self.touches {
            self.send_touch(point, true);
        }
    }

    fn motion(&mut self, points: &[TouchPoint]) {
        if self.touches.len() != points.len() {
            tracing::error!(
                "Touch move with {} contacts, {} active - skipping batch",
                points.len(),
                self.touches.len()
            );
            return;
        }

        for touch in self.touches.iter_mut() {
            let Some(point) = points.iter().find(|p| p.id == touch.id) else {
                tracing::warn!("Touch move missing active contact {}", touch.id);
                continue;
            };

            if touch.position == point.position {
                continue;
            }

            self.sink
                .accumulate_input_event(InputEvent::ScreenDrag(ScreenDrag {
                    index: touch.id,
                    position: point.position,
                    relative: point.position - touch.position,
                }));
            touch.position = point.position;
        }
    }

    fn release_all(&mut self) {
        for point in &self.touches {
            self.send_touch(point, false);
        }
        self.touches.clear();
    }

    fn pointer_down(&mut self, pointer_id: i32, points: &[TouchPoint]) {
        let Some(point) = points.iter().find(|p| p.id == pointer_id) else {
            return;
        };

        // Ids stay unique; a repeated down only moves the held contact.
        if let Some(held) = self.touches.iter_mut().find(|t| t.id == pointer_id) {
            tracing::warn!("Touch down for already active contact {}", pointer_id);
            held.position = point.position;
            return;
        }

        self.touches.push(*point);
        self.send_touch(point, true);
    }

    fn pointer_up(&mut self, pointer_id: i32) {
        if let Some(index) = self.touches.iter().position(|t| t.id == pointer_id) {
            let point = self.touches.remove(index);
            self.send_touch(&point, false);
        }
    }

    fn send_touch(&self, point: &TouchPoint, pressed: bool) {
        self.sink
            .accumulate_input_event(InputEvent::ScreenTouch(ScreenTouch {
                index: point.id,
                position: point.position,
                pressed,
            }));
    }
}

impl std::fmt::Debug for TouchReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TouchReconciler")
            .field("touches", &self.touches)
            .finish()
    }
}

/// Converts an NDK `MotionEvent` into an action, its pointer ID and the contact list
#[cfg(target_os = "android")]
pub fn touch_batch(
    event: &android_activity::input::MotionEvent<'_>,
) -> Option<(MotionAction, i32, TouchSet)> {
    let action = MotionAction::from_raw(u32::from(event.action()) as i32)?;

    let points: TouchSet = event
        .pointers()
        .map(|p| TouchPoint::new(p.pointer_id(), p.x(), p.y()))
        .collect();

    let pointer_id = points
        .get(event.pointer_index())
        .map(|p| p.id)
        .unwrap_or_default();

    Some((action, pointer_id, points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::InputBuffer;
    use std::sync::Arc;

    fn reconciler() -> (Arc<InputBuffer>, TouchReconciler) {
        let buffer = InputBuffer::shared();
        let reconciler = TouchReconciler::new(buffer.clone());
        (buffer, reconciler)
    }

    fn touches(events: &[InputEvent]) -> Vec<(i32, bool)> {
        events
            .iter()
            .filter_map(|event| match event {
                InputEvent::ScreenTouch(t) => Some((t.index, t.pressed)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_raw_action_ignores_pointer_index_bits() {
        // ACTION_POINTER_DOWN for pointer index 1
        assert_eq!(
            MotionAction::from_raw(0x0105),
            Some(MotionAction::PointerDown)
        );
        assert_eq!(MotionAction::from_raw(2), Some(MotionAction::Move));
        assert_eq!(MotionAction::from_raw(42), None);
    }

    #[test]
    fn test_source_mouse_requires_all_bits() {
        assert!(InputSource::MOUSE.is_mouse());
        assert!(!InputSource::TOUCHSCREEN.is_mouse());
        assert!(!InputSource::MOUSE_RELATIVE.is_mouse());
        assert!(InputSource(0x2002 | 0x0101).is_mouse());
    }

    #[test]
    fn test_gesture_begin_presses_in_contact_order() {
        let (buffer, mut reconciler) = reconciler();
        reconciler.process_touch(
            MotionAction::Down,
            0,
            &[TouchPoint::new(4, 1.0, 1.0), TouchPoint::new(2, 5.0, 5.0)],
        );

        assert_eq!(touches(&buffer.drain()), vec![(4, true), (2, true)]);
        assert_eq!(reconciler.active().len(), 2);
    }

    #[test]
    fn test_gesture_begin_releases_stale_contacts_first() {
        let (buffer, mut reconciler) = reconciler();
        reconciler.process_touch(
            MotionAction::Down,
            0,
            &[TouchPoint::new(0, 1.0, 1.0), TouchPoint::new(1, 2.0, 2.0)],
        );
        buffer.drain();

        reconciler.process_touch(MotionAction::Down, 7, &[TouchPoint::new(7, 3.0, 3.0)]);

        assert_eq!(
            touches(&buffer.drain()),
            vec![(0, false), (1, false), (7, true)]
        );
        assert_eq!(reconciler.active(), &[TouchPoint::new(7, 3.0, 3.0)]);
    }

    #[test]
    fn test_move_with_count_mismatch_is_skipped() {
        let (buffer, mut reconciler) = reconciler();
        reconciler.process_touch(MotionAction::Down, 0, &[TouchPoint::new(0, 1.0, 1.0)]);
        buffer.drain();

        reconciler.process_touch(
            MotionAction::Move,
            0,
            &[TouchPoint::new(0, 9.0, 9.0), TouchPoint::new(1, 2.0, 2.0)],
        );

        assert_eq!(buffer.pending(), 0);
        assert_eq!(reconciler.active(), &[TouchPoint::new(0, 1.0, 1.0)]);
    }

    #[test]
    fn test_move_emits_drag_only_for_changed_contacts() {
        let (buffer, mut reconciler) = reconciler();
        reconciler.process_touch(
            MotionAction::Down,
            0,
            &[TouchPoint::new(0, 1.0, 1.0), TouchPoint::new(1, 5.0, 5.0)],
        );
        buffer.drain();

        // Same positions: nothing to report
        reconciler.process_touch(
            MotionAction::Move,
            0,
            &[TouchPoint::new(1, 5.0, 5.0), TouchPoint::new(0, 1.0, 1.0)],
        );
        assert_eq!(buffer.pending(), 0);

        reconciler.process_touch(
            MotionAction::Move,
            0,
            &[TouchPoint::new(0, 1.0, 1.0), TouchPoint::new(1, 7.5, 4.0)],
        );

        let events = buffer.drain();
        assert_eq!(
            events,
            vec![InputEvent::ScreenDrag(ScreenDrag {
                index: 1,
                position: Vector2::new(7.5, 4.0),
                relative: Vector2::new(2.5, -1.0),
            })]
        );
        assert_eq!(reconciler.active()[1].position, Vector2::new(7.5, 4.0));
    }

    #[test]
    fn test_move_skips_unmatched_contact_and_continues() {
        let (buffer, mut reconciler) = reconciler();
        reconciler.process_touch(
            MotionAction::Down,
            0,
            &[TouchPoint::new(0, 0.0, 0.0), TouchPoint::new(1, 0.0, 0.0)],
        );
        buffer.drain();

        reconciler.process_touch(
            MotionAction::Move,
            0,
            &[TouchPoint::new(9, 3.0, 3.0), TouchPoint::new(1, 2.0, 0.0)],
        );

        let events = buffer.drain();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], InputEvent::ScreenDrag(ScreenDrag { index: 1, .. })));
    }

    #[test]
    fn test_up_and_cancel_release_everything() {
        for action in [MotionAction::Up, MotionAction::Cancel] {
            let (buffer, mut reconciler) = reconciler();
            reconciler.process_touch(
                MotionAction::Down,
                0,
                &[TouchPoint::new(0, 1.0, 1.0), TouchPoint::new(1, 2.0, 2.0)],
            );
            buffer.drain();

            reconciler.process_touch(action, 0, &[]);
            assert_eq!(touches(&buffer.drain()), vec![(0, false), (1, false)]);
            assert!(reconciler.active().is_empty());

            // Releasing an empty set is silent
            reconciler.process_touch(action, 0, &[]);
            assert_eq!(buffer.pending(), 0);
        }
    }

    #[test]
    fn test_secondary_pointers_are_added_and_removed() {
        let (buffer, mut reconciler) = reconciler();
        reconciler.process_touch(MotionAction::Down, 0, &[TouchPoint::new(0, 1.0, 1.0)]);
        reconciler.process_touch(
            MotionAction::PointerDown,
            3,
            &[TouchPoint::new(0, 1.0, 1.0), TouchPoint::new(3, 8.0, 8.0)],
        );
        reconciler.process_touch(MotionAction::PointerUp, 0, &[]);

        assert_eq!(
            touches(&buffer.drain()),
            vec![(0, true), (3, true), (0, false)]
        );
        assert_eq!(reconciler.active(), &[TouchPoint::new(3, 8.0, 8.0)]);

        // Unknown pointer ids are ignored
        reconciler.process_touch(MotionAction::PointerUp, 42, &[]);
        reconciler.process_touch(MotionAction::PointerDown, 42, &[TouchPoint::new(3, 8.0, 8.0)]);
        assert_eq!(buffer.pending(), 0);
    }

    #[test]
    fn test_repeated_pointer_down_keeps_ids_unique() {
        let (buffer, mut reconciler) = reconciler();
        reconciler.process_touch(MotionAction::Down, 0, &[TouchPoint::new(0, 0.0, 0.0)]);
        reconciler.process_touch(
            MotionAction::PointerDown,
            1,
            &[TouchPoint::new(0, 0.0, 0.0), TouchPoint::new(1, 5.0, 5.0)],
        );
        reconciler.process_touch(
            MotionAction::PointerDown,
            1,
            &[TouchPoint::new(0, 0.0, 0.0), TouchPoint::new(1, 6.0, 6.0)],
        );

        assert_eq!(touches(&buffer.drain()), vec![(0, true), (1, true)]);
        assert_eq!(
            reconciler.active(),
            &[TouchPoint::new(0, 0.0, 0.0), TouchPoint::new(1, 6.0, 6.0)]
        );
    }
}
