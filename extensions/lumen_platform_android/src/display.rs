//! Android display server
//!
//! Single window, single screen. Capability queries go to the injected
//! [`PlatformServices`], translated input goes to the injected input sink,
//! and the main window surface is owned through a [`GraphicsSurfaceProvider`].

use std::sync::Arc;

use lumen_core::{ButtonMask, Point2i, Rect2i, SensorKind, SharedInputSink, Size2i, Vector2, Vector3};
use lumen_platform::{
    Cursor, DisplayConfig, DisplayServer, Feature, GraphicsSurfaceProvider, ListenerId, MouseMode,
    ObjectId, PlatformError, RenderingDriver, Result, ScreenOrientation, VSyncMode,
    VirtualKeyboardRequest, WindowEvent, WindowFlag, WindowId, WindowListener, WindowListeners,
    WindowMode, MAIN_WINDOW_ID, SCREEN_OF_MAIN_WINDOW,
};

use crate::input::{InputSource, MotionAction, TouchPoint, TouchReconciler};
use crate::joypad::{self, JoypadEvent};
use crate::keyboard::{KeyOutcome, KeyboardTranslator};
use crate::pointer::PointerTracker;
use crate::services::{PlatformServices, POINTER_ICON_NULL};

/// Android `PointerIcon` type for a cursor shape
pub const fn pointer_icon(shape: Cursor) -> i32 {
    match shape {
        Cursor::Default => 1000,
        Cursor::Pointer => 1002,
        Cursor::Text => 1008,
        Cursor::Crosshair => 1007,
        Cursor::Move => 1013,
        Cursor::NotAllowed => 1012,
        Cursor::ResizeNS => 1015,
        Cursor::ResizeEW => 1014,
        Cursor::ResizeNESW => 1017,
        Cursor::ResizeNWSE => 1016,
        Cursor::Grab => 1020,
        Cursor::Grabbing => 1021,
        Cursor::Wait | Cursor::Progress => 1004,
        Cursor::Help => 1003,
        Cursor::None => POINTER_ICON_NULL,
    }
}

/// Display server for Android activities
pub struct AndroidDisplayServer {
    config: DisplayConfig,
    services: Option<Arc<dyn PlatformServices>>,
    sink: SharedInputSink,
    surface: Option<Box<dyn GraphicsSurfaceProvider>>,
    listeners: WindowListeners,

    touch: TouchReconciler,
    pointer: PointerTracker,
    keyboard: KeyboardTranslator,

    keep_screen_on: bool,
    vsync_mode: VSyncMode,
    clipboard: String,
    attached_instance: ObjectId,
    mouse_mode: MouseMode,
    cursor_shape: Cursor,
}

impl AndroidDisplayServer {
    /// Create the display server and the main window surface
    ///
    /// Surface failures are reported to the user through
    /// [`PlatformServices::alert`] before the error is returned.
    pub fn new(
        config: DisplayConfig,
        services: Option<Arc<dyn PlatformServices>>,
        sink: SharedInputSink,
        surface: Option<Box<dyn GraphicsSurfaceProvider>>,
    ) -> Result<Self> {
        let mut server = Self {
            keep_screen_on: config.keep_screen_on,
            vsync_mode: config.vsync_mode,
            touch: TouchReconciler::new(Arc::clone(&sink)),
            pointer: PointerTracker::new(Arc::clone(&sink)),
            keyboard: KeyboardTranslator::new(Arc::clone(&sink)),
            config,
            services,
            sink,
            surface: None,
            listeners: WindowListeners::new(),
            clipboard: String::new(),
            attached_instance: ObjectId::default(),
            mouse_mode: MouseMode::Visible,
            cursor_shape: Cursor::Default,
        };

        if let Some(services) = server.services.as_deref() {
            services.set_keep_screen_on(server.keep_screen_on);
        }

        if let Some(surface) = surface {
            if let Err(e) = server.create_main_surface(surface) {
                if let Some(services) = server.services.as_deref() {
                    services.alert(
                        "Your device does not support the selected graphics driver.",
                        "Unable to initialize video driver",
                    );
                }
                return Err(e);
            }
        }

        tracing::info!(
            "Android display server ready ({}, vsync {:?})",
            server.config.rendering_driver,
            server.config.vsync_mode
        );
        Ok(server)
    }

    fn create_main_surface(&mut self, mut surface: Box<dyn GraphicsSurfaceProvider>) -> Result<()> {
        if surface.driver() != self.config.rendering_driver {
            tracing::warn!(
                "Configured rendering driver {} but surface provider implements {}",
                self.config.rendering_driver,
                surface.driver()
            );
        }

        surface
            .initialize()
            .map_err(|e| PlatformError::SurfaceCreation(format!("initialize: {}", e)))?;

        let size = self.display_size();
        if let Err(e) = surface.window_create(
            MAIN_WINDOW_ID,
            self.config.vsync_mode,
            size.width.max(0) as u32,
            size.height.max(0) as u32,
        ) {
            surface.finalize();
            return Err(PlatformError::SurfaceCreation(format!(
                "main window: {}",
                e
            )));
        }

        self.surface = Some(surface);
        Ok(())
    }

    /// Rendering drivers this build can create surfaces for
    ///
    /// Empty unless the wgpu surface provider is compiled in.
    pub fn rendering_drivers() -> Vec<RenderingDriver> {
        if cfg!(all(target_os = "android", feature = "gpu")) {
            vec![RenderingDriver::Vulkan, RenderingDriver::OpenGl3]
        } else {
            Vec::new()
        }
    }

    /// Configuration the server was created with
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Whether a graphics surface is currently owned
    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Touch contacts currently held
    pub fn active_touches(&self) -> &[TouchPoint] {
        self.touch.active()
    }

    fn services(&self, operation: &'static str) -> Option<&dyn PlatformServices> {
        let services = self.services.as_deref();
        if services.is_none() {
            tracing::error!("{}", PlatformError::ServicesUnavailable(operation));
        }
        services
    }

    fn display_size(&self) -> Size2i {
        self.services("display_size")
            .map(|services| services.display_size())
            .unwrap_or_default()
    }

    // Window notifications

    /// Notify every listener
    pub fn send_window_event(&mut self, event: WindowEvent) {
        self.listeners.dispatch(&event);
    }

    /// Deliver text committed by the input method
    pub fn send_input_text(&mut self, text: &str) {
        self.listeners.dispatch(&WindowEvent::Text(text.to_owned()));
    }

    /// The native surface was resized
    pub fn notify_surface_changed(&mut self, width: i32, height: i32) {
        tracing::debug!("Surface changed: {}x{}", width, height);
        self.listeners
            .dispatch(&WindowEvent::RectChanged(Rect2i::new(0, 0, width, height)));
    }

    /// Recreate the main window surface after the native window changed
    ///
    /// The surface keeps the last vsync mode set on the window. If it cannot
    /// be recreated the provider is finalized and dropped.
    pub fn reset_window(&mut self) {
        let size = self.display_size();
        let vsync_mode = self.vsync_mode;
        let Some(surface) = self.surface.as_mut() else {
            tracing::warn!("reset_window called without a graphics surface");
            return;
        };

        surface.window_destroy(MAIN_WINDOW_ID);

        if let Err(e) = surface.window_create(
            MAIN_WINDOW_ID,
            vsync_mode,
            size.width.max(0) as u32,
            size.height.max(0) as u32,
        ) {
            tracing::error!("Failed to reset window surface: {}", e);
            if let Some(mut surface) = self.surface.take() {
                surface.finalize();
            }
        }
    }

    /// The native window went away; drop its surface until the next reset
    pub fn release_window(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.window_destroy(MAIN_WINDOW_ID);
        }
    }

    // Input ingestion

    /// Touch batch from a touchscreen `MotionEvent`
    pub fn process_touch(&mut self, action: MotionAction, pointer_id: i32, points: &[TouchPoint]) {
        self.touch.process_touch(action, pointer_id, points);
    }

    /// Hover from a stylus or mouse
    pub fn process_hover(&mut self, action: MotionAction, position: Vector2) {
        let modifiers = self.keyboard.modifiers();
        self.pointer.process_hover(action, position, modifiers);
    }

    /// Button, motion or scroll action from a mouse-like device
    pub fn process_mouse_event(
        &mut self,
        source: InputSource,
        action: MotionAction,
        android_mask: i32,
        position: Vector2,
        vertical_factor: f32,
        horizontal_factor: f32,
    ) {
        let modifiers = self.keyboard.modifiers();
        self.pointer.process_mouse_event(
            source,
            action,
            android_mask,
            position,
            vertical_factor,
            horizontal_factor,
            modifiers,
        );
    }

    pub fn process_double_tap(&mut self, android_mask: i32, position: Vector2) {
        let modifiers = self.keyboard.modifiers();
        self.pointer.process_double_tap(android_mask, position, modifiers);
    }

    pub fn process_pan(&mut self, position: Vector2) {
        let modifiers = self.keyboard.modifiers();
        self.pointer.process_pan(position, modifiers);
    }

    /// Key event carrying one UTF-16 code unit
    pub fn process_key_event(&mut self, keycode: i32, scancode: i32, unicode: u32, pressed: bool) {
        if self.keyboard.process_key_event(keycode, scancode, unicode, pressed)
            == KeyOutcome::SentGoBack
        {
            self.listeners.dispatch(&WindowEvent::GoBackRequest);
        }
    }

    pub fn process_joy_event(&mut self, event: JoypadEvent) {
        joypad::forward_joy_event(self.sink.as_ref(), event);
    }

    pub fn process_accelerometer(&mut self, value: Vector3) {
        joypad::forward_sensor(self.sink.as_ref(), SensorKind::Accelerometer, value);
    }

    pub fn process_gravity(&mut self, value: Vector3) {
        joypad::forward_sensor(self.sink.as_ref(), SensorKind::Gravity, value);
    }

    pub fn process_magnetometer(&mut self, value: Vector3) {
        joypad::forward_sensor(self.sink.as_ref(), SensorKind::Magnetometer, value);
    }

    pub fn process_gyroscope(&mut self, value: Vector3) {
        joypad::forward_sensor(self.sink.as_ref(), SensorKind::Gyroscope, value);
    }
}

impl DisplayServer for AndroidDisplayServer {
    fn name(&self) -> &'static str {
        "Android"
    }

    fn has_feature(&self, feature: Feature) -> bool {
        matches!(
            feature,
            Feature::CursorShape
                | Feature::Mouse
                | Feature::Clipboard
                | Feature::KeepScreenOn
                | Feature::Orientation
                | Feature::TouchScreen
                | Feature::VirtualKeyboard
        )
    }

    fn clipboard_set(&mut self, text: &str) {
        let Some(services) = self.services("clipboard_set") else {
            return;
        };
        if !services.set_clipboard(text) {
            text.clone_into(&mut self.clipboard);
        }
    }

    fn clipboard_get(&self) -> String {
        let Some(services) = self.services("clipboard_get") else {
            return String::new();
        };
        services
            .clipboard()
            .unwrap_or_else(|| self.clipboard.clone())
    }

    fn screen_set_keep_on(&mut self, enable: bool) {
        let Some(services) = self.services("screen_set_keep_on") else {
            return;
        };
        services.set_keep_screen_on(enable);
        self.keep_screen_on = enable;
    }

    fn screen_is_kept_on(&self) -> bool {
        self.keep_screen_on
    }

    fn screen_set_orientation(&mut self, orientation: ScreenOrientation, _screen: i32) {
        if let Some(services) = self.services("screen_set_orientation") {
            services.set_screen_orientation(orientation);
        }
    }

    fn screen_get_orientation(&self, _screen: i32) -> ScreenOrientation {
        self.services("screen_get_orientation")
            .map(|services| services.screen_orientation())
            .unwrap_or(ScreenOrientation::Landscape)
    }

    fn screen_count(&self) -> i32 {
        1
    }

    fn screen_position(&self, _screen: i32) -> Point2i {
        Point2i::ZERO
    }

    fn screen_size(&self, _screen: i32) -> Size2i {
        self.display_size()
    }

    fn screen_usable_rect(&self, _screen: i32) -> Rect2i {
        self.services("screen_usable_rect")
            .map(|services| services.screen_usable_rect())
            .unwrap_or_default()
    }

    fn screen_dpi(&self, _screen: i32) -> i32 {
        self.services("screen_dpi")
            .map(|services| services.screen_dpi())
            .unwrap_or(0)
    }

    fn screen_is_touchscreen(&self, _screen: i32) -> bool {
        true
    }

    fn virtual_keyboard_show(&mut self, request: &VirtualKeyboardRequest) {
        let Some(services) = self.services("virtual_keyboard_show") else {
            return;
        };
        if services.has_virtual_keyboard() {
            services.show_virtual_keyboard(request);
        } else {
            tracing::error!("Virtual keyboard not available");
        }
    }

    fn virtual_keyboard_hide(&mut self) {
        let Some(services) = self.services("virtual_keyboard_hide") else {
            return;
        };
        if services.has_virtual_keyboard() {
            services.hide_virtual_keyboard();
        } else {
            tracing::error!("Virtual keyboard not available");
        }
    }

    fn virtual_keyboard_height(&self) -> i32 {
        self.services("virtual_keyboard_height")
            .map(|services| services.virtual_keyboard_height())
            .unwrap_or(0)
    }

    fn window_list(&self) -> Vec<WindowId> {
        vec![MAIN_WINDOW_ID]
    }

    fn window_at_screen_position(&self, _position: Point2i) -> WindowId {
        MAIN_WINDOW_ID
    }

    fn window_attach_instance_id(&mut self, instance: ObjectId, _window: WindowId) {
        self.attached_instance = instance;
    }

    fn window_attached_instance_id(&self, _window: WindowId) -> ObjectId {
        self.attached_instance
    }

    // Android windows are always fullscreen and owned by the activity;
    // placement, sizing and decoration requests are ignored.

    fn window_set_title(&mut self, _title: &str, _window: WindowId) {}

    fn window_current_screen(&self, _window: WindowId) -> i32 {
        SCREEN_OF_MAIN_WINDOW
    }

    fn window_set_current_screen(&mut self, _screen: i32, _window: WindowId) {}

    fn window_position(&self, _window: WindowId) -> Point2i {
        Point2i::ZERO
    }

    fn window_set_position(&mut self, _position: Point2i, _window: WindowId) {}

    fn window_set_transient(&mut self, _window: WindowId, _parent: WindowId) {}

    fn window_max_size(&self, _window: WindowId) -> Size2i {
        Size2i::ZERO
    }

    fn window_set_max_size(&mut self, _size: Size2i, _window: WindowId) {}

    fn window_min_size(&self, _window: WindowId) -> Size2i {
        Size2i::ZERO
    }

    fn window_set_min_size(&mut self, _size: Size2i, _window: WindowId) {}

    fn window_size(&self, _window: WindowId) -> Size2i {
        self.display_size()
    }

    fn window_set_size(&mut self, _size: Size2i, _window: WindowId) {}

    fn window_real_size(&self, _window: WindowId) -> Size2i {
        self.display_size()
    }

    fn window_mode(&self, _window: WindowId) -> WindowMode {
        WindowMode::Fullscreen
    }

    fn window_set_mode(&mut self, _mode: WindowMode, _window: WindowId) {}

    fn window_is_maximize_allowed(&self, _window: WindowId) -> bool {
        false
    }

    fn window_flag(&self, _flag: WindowFlag, _window: WindowId) -> bool {
        false
    }

    fn window_set_flag(&mut self, _flag: WindowFlag, _enabled: bool, _window: WindowId) {}

    fn window_request_attention(&mut self, _window: WindowId) {}

    fn window_move_to_foreground(&mut self, _window: WindowId) {}

    fn window_can_draw(&self, _window: WindowId) -> bool {
        true
    }

    fn can_any_window_draw(&self) -> bool {
        true
    }

    fn window_vsync_mode(&self, _window: WindowId) -> VSyncMode {
        self.vsync_mode
    }

    fn window_set_vsync_mode(&mut self, mode: VSyncMode, window: WindowId) {
        if window != MAIN_WINDOW_ID {
            return;
        }
        self.vsync_mode = mode;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_vsync_mode(window, mode);
        }
    }

    fn add_window_listener(&mut self, listener: Box<dyn WindowListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_window_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn mouse_set_mode(&mut self, mode: MouseMode) {
        if self.mouse_mode == mode {
            return;
        }
        let Some(services) = self.services("mouse_set_mode") else {
            return;
        };

        match mode {
            MouseMode::Hidden | MouseMode::ConfinedHidden => {
                services.set_pointer_icon(POINTER_ICON_NULL)
            }
            _ => services.set_pointer_icon(pointer_icon(self.cursor_shape)),
        }

        if mode == MouseMode::Captured {
            services.request_pointer_capture();
        } else {
            services.release_pointer_capture();
        }

        self.mouse_mode = mode;
    }

    fn mouse_mode(&self) -> MouseMode {
        self.mouse_mode
    }

    fn mouse_position(&self) -> Point2i {
        Point2i::from(self.pointer.position())
    }

    fn mouse_button_state(&self) -> ButtonMask {
        self.pointer.button_state()
    }

    fn cursor_set_shape(&mut self, shape: Cursor) {
        if self.cursor_shape == shape {
            return;
        }
        self.cursor_shape = shape;

        if matches!(self.mouse_mode, MouseMode::Visible | MouseMode::Confined) {
            if let Some(services) = self.services("cursor_set_shape") {
                services.set_pointer_icon(pointer_icon(shape));
            }
        }
    }

    fn cursor_shape(&self) -> Cursor {
        self.cursor_shape
    }

    fn process_events(&mut self) {
        let sink = Arc::clone(&self.sink);
        let listeners = &mut self.listeners;
        sink.flush_accumulated_events(&mut |event| {
            listeners.dispatch(&WindowEvent::Input(event));
        });
    }
}

impl Drop for AndroidDisplayServer {
    fn drop(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.window_destroy(MAIN_WINDOW_ID);
            surface.finalize();
        }
    }
}

impl std::fmt::Debug for AndroidDisplayServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AndroidDisplayServer")
            .field("config", &self.config)
            .field("has_services", &self.services.is_some())
            .field("has_surface", &self.surface.is_some())
            .field("listeners", &self.listeners)
            .field("touch", &self.touch)
            .field("pointer", &self.pointer)
            .field("keyboard", &self.keyboard)
            .field("mouse_mode", &self.mouse_mode)
            .field("cursor_shape", &self.cursor_shape)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::HeadlessServices;
    use crate::surface::HeadlessSurfaceProvider;
    use lumen_core::{InputBuffer, InputEvent};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn server_with(
        services: Option<Arc<HeadlessServices>>,
    ) -> (Arc<InputBuffer>, AndroidDisplayServer) {
        let buffer = InputBuffer::shared();
        let services = services.map(|s| s as Arc<dyn PlatformServices>);
        let server =
            AndroidDisplayServer::new(DisplayConfig::default(), services, buffer.clone(), None)
                .unwrap();
        (buffer, server)
    }

    fn record(server: &mut AndroidDisplayServer) -> Rc<RefCell<Vec<WindowEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        server.add_window_listener(Box::new(move |event: &WindowEvent| {
            sink.borrow_mut().push(event.clone())
        }));
        log
    }

    #[test]
    fn test_pointer_icons() {
        assert_eq!(pointer_icon(Cursor::Default), 1000);
        assert_eq!(pointer_icon(Cursor::Wait), pointer_icon(Cursor::Progress));
        assert_eq!(pointer_icon(Cursor::None), POINTER_ICON_NULL);
    }

    #[test]
    fn test_missing_services_return_sentinels() {
        let (_, mut server) = server_with(None);
        assert_eq!(server.screen_get_orientation(0), ScreenOrientation::Landscape);
        assert_eq!(server.screen_size(0), Size2i::ZERO);
        assert_eq!(server.screen_usable_rect(0), Rect2i::default());
        assert_eq!(server.screen_dpi(0), 0);
        assert_eq!(server.virtual_keyboard_height(), 0);
        assert_eq!(server.clipboard_get(), "");

        server.screen_set_keep_on(false);
        assert!(server.screen_is_kept_on());
    }

    #[test]
    fn test_keep_screen_on_is_applied_at_startup() {
        let services = Arc::new(HeadlessServices::with_display(800, 600));
        let (_, _server) = server_with(Some(Arc::clone(&services)));
        assert!(services.state().keep_screen_on);
    }

    #[test]
    fn test_back_key_sends_go_back_request() {
        let (_, mut server) = server_with(Some(Arc::new(HeadlessServices::with_display(1, 1))));
        let log = record(&mut server);

        server.process_key_event(4, 4, 0, true);
        server.process_key_event(4, 4, 0, false);

        assert_eq!(*log.borrow(), vec![WindowEvent::GoBackRequest]);
    }

    #[test]
    fn test_process_events_dispatches_input() {
        let (buffer, mut server) = server_with(Some(Arc::new(HeadlessServices::with_display(1, 1))));
        let log = record(&mut server);

        server.process_touch(MotionAction::Down, 0, &[TouchPoint::new(0, 3.0, 4.0)]);
        server.process_events();

        assert_eq!(buffer.pending(), 0);
        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert!(matches!(
            log[0],
            WindowEvent::Input(InputEvent::ScreenTouch(touch)) if touch.pressed
        ));
    }

    #[test]
    fn test_reset_keeps_vsync_mode() {
        let buffer = InputBuffer::shared();
        let services: Arc<dyn PlatformServices> = Arc::new(HeadlessServices::with_display(640, 480));
        let mut server = AndroidDisplayServer::new(
            DisplayConfig::default(),
            Some(services),
            buffer,
            Some(Box::new(HeadlessSurfaceProvider::new(RenderingDriver::Vulkan))),
        )
        .unwrap();

        server.window_set_vsync_mode(VSyncMode::Mailbox, MAIN_WINDOW_ID);
        server.reset_window();

        assert!(server.has_surface());
        assert_eq!(server.window_vsync_mode(MAIN_WINDOW_ID), VSyncMode::Mailbox);
    }

    #[test]
    fn test_vsync_for_other_windows_is_ignored() {
        let (_, mut server) = server_with(Some(Arc::new(HeadlessServices::with_display(1, 1))));
        server.window_set_vsync_mode(VSyncMode::Disabled, 7);
        assert_eq!(server.window_vsync_mode(MAIN_WINDOW_ID), VSyncMode::Enabled);

        server.window_set_vsync_mode(VSyncMode::Adaptive, MAIN_WINDOW_ID);
        assert_eq!(server.window_vsync_mode(MAIN_WINDOW_ID), VSyncMode::Adaptive);
    }

    #[test]
    fn test_rendering_drivers_need_wgpu_provider() {
        let drivers = AndroidDisplayServer::rendering_drivers();
        if cfg!(all(target_os = "android", feature = "gpu")) {
            assert_eq!(drivers, vec![RenderingDriver::Vulkan, RenderingDriver::OpenGl3]);
        } else {
            assert!(drivers.is_empty());
        }
    }
}
