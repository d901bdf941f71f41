//! Native activity host
//!
//! Pumps android-activity lifecycle and input events into an
//! [`AndroidDisplayServer`]. The server is created on the first
//! `InitWindow`, once a native window exists to build the surface on.

use std::sync::Arc;
use std::time::Duration;

use android_activity::input::{
    Axis, InputEvent as AndroidInputEvent, KeyAction, KeyEvent, KeyMapChar, MotionEvent,
};
use android_activity::{AndroidApp, InputStatus, MainEvent, PollEvent};

use lumen_core::{JoyAxis, SharedInputSink, Size2i, Vector2};
use lumen_platform::{DisplayConfig, DisplayServer, GraphicsSurfaceProvider, Result, WindowEvent};

use crate::display::AndroidDisplayServer;
use crate::input::{touch_batch, InputSource, MotionAction};
use crate::jni_services::JniPlatformServices;
use crate::joypad::{hat_from_axes, joy_button_from_android, JoypadEvent};
use crate::logging::init_logging;
use crate::services::PlatformServices;

const STICK_AXES: [(Axis, JoyAxis); 4] = [
    (Axis::X, JoyAxis::LEFT_X),
    (Axis::Y, JoyAxis::LEFT_Y),
    (Axis::Z, JoyAxis::RIGHT_X),
    (Axis::Rz, JoyAxis::RIGHT_Y),
];

const TRIGGER_AXES: [(Axis, JoyAxis); 2] = [
    (Axis::Ltrigger, JoyAxis::TRIGGER_LEFT),
    (Axis::Rtrigger, JoyAxis::TRIGGER_RIGHT),
];

/// Owns the activity event loop
pub struct AndroidHost {
    app: AndroidApp,
    config: DisplayConfig,
    sink: SharedInputSink,
    services: Arc<JniPlatformServices>,
    server: Option<AndroidDisplayServer>,
    running: bool,
}

impl AndroidHost {
    /// Install logging from `config.log_filter` and bind the Java services
    pub fn new(app: AndroidApp, config: DisplayConfig, sink: SharedInputSink) -> Result<Self> {
        init_logging(&config.log_filter);

        let services = Arc::new(JniPlatformServices::new(&app)?);
        Ok(Self {
            app,
            config,
            sink,
            services,
            server: None,
            running: true,
        })
    }

    /// Run until the activity is destroyed
    ///
    /// `on_frame` runs once per loop iteration after input was flushed to
    /// the window listeners.
    pub fn run<F>(mut self, mut on_frame: F) -> Result<()>
    where
        F: FnMut(&mut AndroidDisplayServer),
    {
        tracing::info!("Entering Android event loop");

        while self.running {
            let app = self.app.clone();
            app.poll_events(Some(Duration::from_millis(16)), |event| {
                self.handle_poll_event(event)
            });

            self.pump_input();

            if let Some(server) = self.server.as_mut() {
                server.process_events();
                on_frame(server);
            }
        }

        tracing::info!("Android event loop exited");
        Ok(())
    }

    fn surface_provider(&self) -> Option<Box<dyn GraphicsSurfaceProvider>> {
        #[cfg(feature = "gpu")]
        {
            Some(Box::new(crate::surface::WgpuSurfaceProvider::new(
                self.app.clone(),
                self.config.rendering_driver,
            )))
        }
        #[cfg(not(feature = "gpu"))]
        {
            None
        }
    }

    fn update_display_size(&self) -> Size2i {
        let size = self
            .app
            .native_window()
            .map(|w| Size2i::new(w.width(), w.height()))
            .unwrap_or_default();
        self.services.set_display_size(size);
        size
    }

    fn handle_poll_event(&mut self, event: PollEvent<'_>) {
        let PollEvent::Main(event) = event else {
            return;
        };

        match event {
            MainEvent::InitWindow { .. } => {
                let size = self.update_display_size();
                tracing::info!("Native window initialized: {}x{}", size.width, size.height);

                match self.server.as_mut() {
                    Some(server) => server.reset_window(),
                    None => {
                        let services: Arc<dyn PlatformServices> = self.services.clone();
                        match AndroidDisplayServer::new(
                            self.config.clone(),
                            Some(services),
                            Arc::clone(&self.sink),
                            self.surface_provider(),
                        ) {
                            Ok(server) => self.server = Some(server),
                            Err(e) => {
                                tracing::error!("Failed to create display server: {}", e);
                                self.running = false;
                            }
                        }
                    }
                }
            }
            MainEvent::TerminateWindow { .. } => {
                tracing::info!("Native window terminated");
                if let Some(server) = self.server.as_mut() {
                    server.release_window();
                }
            }
            MainEvent::WindowResized { .. } => {
                let size = self.update_display_size();
                if let Some(server) = self.server.as_mut() {
                    server.notify_surface_changed(size.width, size.height);
                }
            }
            MainEvent::GainedFocus => self.send_window_event(WindowEvent::FocusIn),
            MainEvent::LostFocus => self.send_window_event(WindowEvent::FocusOut),
            MainEvent::ConfigChanged { .. } => self.send_window_event(WindowEvent::DpiChange),
            MainEvent::Destroy => {
                tracing::info!("Activity destroyed");
                self.send_window_event(WindowEvent::CloseRequest);
                self.running = false;
            }
            MainEvent::LowMemory => tracing::warn!("Low memory warning"),
            _ => {}
        }
    }

    fn send_window_event(&mut self, event: WindowEvent) {
        if let Some(server) = self.server.as_mut() {
            server.send_window_event(event);
        }
    }

    fn pump_input(&mut self) {
        let Some(server) = self.server.as_mut() else {
            return;
        };

        let mut events = match self.app.input_events_iter() {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!("Failed to get input events iterator: {:?}", e);
                return;
            }
        };

        let app = &self.app;
        while events.next(|event| match event {
            AndroidInputEvent::MotionEvent(motion) => handle_motion(server, motion),
            AndroidInputEvent::KeyEvent(key) => handle_key(app, server, key),
            _ => InputStatus::Unhandled,
        }) {}
    }
}

fn handle_motion(server: &mut AndroidDisplayServer, motion: &MotionEvent<'_>) -> InputStatus {
    let source = InputSource(u32::from(motion.source()) as i32);

    if source.contains(InputSource::JOYSTICK) || source.contains(InputSource::GAMEPAD) {
        handle_joystick(server, motion);
        return InputStatus::Handled;
    }

    let Some(action) = MotionAction::from_raw(u32::from(motion.action()) as i32) else {
        return InputStatus::Unhandled;
    };

    if source.contains(InputSource::TOUCHSCREEN) && !source.contains(InputSource::STYLUS) {
        if let Some((action, pointer_id, points)) = touch_batch(motion) {
            server.process_touch(action, pointer_id, &points);
        }
        return InputStatus::Handled;
    }

    let Some(pointer) = motion.pointers().next() else {
        return InputStatus::Unhandled;
    };
    let position = Vector2::new(pointer.x(), pointer.y());

    match action {
        MotionAction::HoverMove | MotionAction::HoverEnter | MotionAction::HoverExit => {
            server.process_hover(action, position);
        }
        _ => server.process_mouse_event(
            source,
            action,
            motion.button_state().0 as i32,
            position,
            pointer.axis_value(Axis::Vscroll),
            pointer.axis_value(Axis::Hscroll),
        ),
    }
    InputStatus::Handled
}

fn handle_joystick(server: &mut AndroidDisplayServer, motion: &MotionEvent<'_>) {
    let Some(pointer) = motion.pointers().next() else {
        return;
    };
    let device = motion.device_id();

    for (axis, joy_axis) in STICK_AXES {
        server.process_joy_event(JoypadEvent::axis(
            device,
            joy_axis,
            pointer.axis_value(axis),
        ));
    }
    // Triggers report [0, 1]
    for (axis, joy_axis) in TRIGGER_AXES {
        server.process_joy_event(JoypadEvent::axis(
            device,
            joy_axis,
            pointer.axis_value(axis) * 2.0 - 1.0,
        ));
    }

    let hat = hat_from_axes(pointer.axis_value(Axis::HatX), pointer.axis_value(Axis::HatY));
    server.process_joy_event(JoypadEvent::hat(device, hat));
}

fn handle_key(
    app: &AndroidApp,
    server: &mut AndroidDisplayServer,
    key: &KeyEvent<'_>,
) -> InputStatus {
    let pressed = match key.action() {
        KeyAction::Down => true,
        KeyAction::Up => false,
        _ => return InputStatus::Unhandled,
    };
    let keycode = u32::from(key.key_code()) as i32;

    if let Some(button) = joy_button_from_android(keycode) {
        server.process_joy_event(JoypadEvent::button(key.device_id(), button, pressed));
        return InputStatus::Handled;
    }

    let character = app
        .device_key_character_map(key.device_id())
        .ok()
        .and_then(|map| map.get(key.key_code(), key.meta_state()).ok());

    match character {
        Some(KeyMapChar::Unicode(c)) | Some(KeyMapChar::CombiningAccent(c)) => {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                server.process_key_event(keycode, key.scan_code(), u32::from(*unit), pressed);
            }
        }
        _ => server.process_key_event(keycode, key.scan_code(), 0, pressed),
    }
    InputStatus::Handled
}
