//! Window events and typed listeners
//!
//! The display server reports window lifecycle changes, surface resizes,
//! flushed input and committed text through one tagged [`WindowEvent`].
//! Interested parties register a [`WindowListener`] and get a [`ListenerId`]
//! back for removal.

use lumen_core::{InputEvent, Rect2i};
use slotmap::SlotMap;

/// Something happened to the window
#[derive(Clone, Debug, PartialEq)]
pub enum WindowEvent {
    /// Pointer entered the window
    MouseEnter,
    /// Pointer left the window
    MouseExit,
    /// Window gained focus
    FocusIn,
    /// Window lost focus
    FocusOut,
    /// The platform asked the window to close
    CloseRequest,
    /// The system back action was triggered
    GoBackRequest,
    /// Screen density changed
    DpiChange,
    /// The drawable area changed
    RectChanged(Rect2i),
    /// An accumulated input event was flushed to the window
    Input(InputEvent),
    /// Text was committed by an input method
    Text(String),
}

/// Receives window events
pub trait WindowListener {
    fn on_window_event(&mut self, event: &WindowEvent);
}

impl<F> WindowListener for F
where
    F: FnMut(&WindowEvent),
{
    fn on_window_event(&mut self, event: &WindowEvent) {
        self(event)
    }
}

slotmap::new_key_type! {
    /// Handle returned by [`WindowListeners::add`]
    pub struct ListenerId;
}

/// Registry of window listeners, notified in registration order
#[derive(Default)]
pub struct WindowListeners {
    listeners: SlotMap<ListenerId, Box<dyn WindowListener>>,
    order: Vec<ListenerId>,
}

impl WindowListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn add(&mut self, listener: Box<dyn WindowListener>) -> ListenerId {
        let id = self.listeners.insert(listener);
        self.order.push(id);
        id
    }

    /// Unregister a listener. Returns false if it was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        if self.listeners.remove(id).is_none() {
            return false;
        }
        self.order.retain(|existing| *existing != id);
        true
    }

    /// Deliver an event to every listener
    pub fn dispatch(&mut self, event: &WindowEvent) {
        for id in &self.order {
            if let Some(listener) = self.listeners.get_mut(*id) {
                listener.on_window_event(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for WindowListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowListeners")
            .field("len", &self.len())
            .finish()
    }
}
