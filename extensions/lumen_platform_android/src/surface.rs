//! Graphics surface providers
//!
//! [`WgpuSurfaceProvider`] creates the main window swapchain on device with
//! wgpu. [`HeadlessSurfaceProvider`] tracks surfaces without a GPU, for
//! host builds.

use lumen_platform::{
    GraphicsSurfaceProvider, PlatformError, RenderingDriver, Result, VSyncMode, WindowId,
};

#[cfg(all(target_os = "android", feature = "gpu"))]
pub use self::gpu::WgpuSurfaceProvider;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HeadlessWindow {
    id: WindowId,
    vsync_mode: VSyncMode,
    width: u32,
    height: u32,
}

/// Surface provider that only records window surfaces
#[derive(Debug)]
pub struct HeadlessSurfaceProvider {
    driver: RenderingDriver,
    initialized: bool,
    windows: Vec<HeadlessWindow>,
}

impl HeadlessSurfaceProvider {
    pub fn new(driver: RenderingDriver) -> Self {
        Self {
            driver,
            initialized: false,
            windows: Vec::new(),
        }
    }

    /// Size of a window's surface, if it exists
    pub fn window_size(&self, window: WindowId) -> Option<(u32, u32)> {
        self.find(window).map(|w| (w.width, w.height))
    }

    fn find(&self, window: WindowId) -> Option<&HeadlessWindow> {
        self.windows.iter().find(|w| w.id == window)
    }
}

impl GraphicsSurfaceProvider for HeadlessSurfaceProvider {
    fn driver(&self) -> RenderingDriver {
        self.driver
    }

    fn initialize(&mut self) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn window_create(
        &mut self,
        window: WindowId,
        vsync_mode: VSyncMode,
        width: u32,
        height: u32,
    ) -> Result<()> {
        if !self.initialized {
            return Err(PlatformError::SurfaceCreation(
                "provider is not initialized".to_string(),
            ));
        }
        if self.find(window).is_some() {
            return Err(PlatformError::SurfaceCreation(format!(
                "window {} already has a surface",
                window
            )));
        }
        self.windows.push(HeadlessWindow {
            id: window,
            vsync_mode,
            width,
            height,
        });
        Ok(())
    }

    fn window_destroy(&mut self, window: WindowId) {
        self.windows.retain(|w| w.id != window);
    }

    fn vsync_mode(&self, window: WindowId) -> VSyncMode {
        self.find(window)
            .map(|w| w.vsync_mode)
            .unwrap_or_default()
    }

    fn set_vsync_mode(&mut self, window: WindowId, mode: VSyncMode) {
        if let Some(w) = self.windows.iter_mut().find(|w| w.id == window) {
            w.vsync_mode = mode;
        }
    }

    fn finalize(&mut self) {
        self.windows.clear();
        self.initialized = false;
    }
}

#[cfg(all(target_os = "android", feature = "gpu"))]
mod gpu {
    use std::ptr::NonNull;
    use std::sync::Arc;

    use android_activity::AndroidApp;
    use ndk::native_window::NativeWindow;
    use raw_window_handle::{
        AndroidDisplayHandle, AndroidNdkWindowHandle, RawDisplayHandle, RawWindowHandle,
    };

    use lumen_platform::{
        GraphicsSurfaceProvider, PlatformError, RenderingDriver, Result, VSyncMode, WindowId,
        MAIN_WINDOW_ID,
    };

    fn present_mode(mode: VSyncMode) -> wgpu::PresentMode {
        match mode {
            VSyncMode::Disabled => wgpu::PresentMode::AutoNoVsync,
            VSyncMode::Enabled => wgpu::PresentMode::Fifo,
            VSyncMode::Adaptive => wgpu::PresentMode::FifoRelaxed,
            VSyncMode::Mailbox => wgpu::PresentMode::Mailbox,
        }
    }

    fn surface_error(context: &str, e: impl std::fmt::Display) -> PlatformError {
        PlatformError::SurfaceCreation(format!("{}: {}", context, e))
    }

    struct Gpu {
        adapter: wgpu::Adapter,
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
    }

    struct WindowSurface {
        // Keeps the ANativeWindow referenced while the surface uses it.
        _native_window: NativeWindow,
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
        vsync_mode: VSyncMode,
    }

    /// wgpu swapchain for the activity's native window
    pub struct WgpuSurfaceProvider {
        app: AndroidApp,
        driver: RenderingDriver,
        instance: Option<wgpu::Instance>,
        gpu: Option<Gpu>,
        window: Option<WindowSurface>,
    }

    impl WgpuSurfaceProvider {
        pub fn new(app: AndroidApp, driver: RenderingDriver) -> Self {
            Self {
                app,
                driver,
                instance: None,
                gpu: None,
                window: None,
            }
        }

        pub fn device(&self) -> Option<Arc<wgpu::Device>> {
            self.gpu.as_ref().map(|gpu| Arc::clone(&gpu.device))
        }

        pub fn queue(&self) -> Option<Arc<wgpu::Queue>> {
            self.gpu.as_ref().map(|gpu| Arc::clone(&gpu.queue))
        }

        /// Surface of the main window and its configuration
        pub fn surface(&self) -> Option<(&wgpu::Surface<'static>, &wgpu::SurfaceConfiguration)> {
            self.window.as_ref().map(|w| (&w.surface, &w.config))
        }

        fn create_surface(
            instance: &wgpu::Instance,
            window: &NativeWindow,
        ) -> Result<wgpu::Surface<'static>> {
            let raw_window = NonNull::new(window.ptr().as_ptr() as *mut std::ffi::c_void)
                .ok_or_else(|| {
                    PlatformError::SurfaceCreation("Invalid native window pointer".to_string())
                })?;

            let surface_target = wgpu::SurfaceTargetUnsafe::RawHandle {
                raw_display_handle: RawDisplayHandle::Android(AndroidDisplayHandle::new()),
                raw_window_handle: RawWindowHandle::AndroidNdk(AndroidNdkWindowHandle::new(
                    raw_window,
                )),
            };

            // Safety: the native window is kept alive alongside the surface.
            unsafe { instance.create_surface_unsafe(surface_target) }
                .map_err(|e| surface_error("create_surface", e))
        }

        fn request_gpu(instance: &wgpu::Instance, surface: &wgpu::Surface<'_>) -> Result<Gpu> {
            let adapter = pollster::block_on(instance.request_adapter(
                &wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::HighPerformance,
                    compatible_surface: Some(surface),
                    force_fallback_adapter: false,
                },
            ))
            .ok_or_else(|| PlatformError::SurfaceCreation("No compatible adapter".to_string()))?;

            tracing::info!("Using adapter: {:?}", adapter.get_info());

            let (device, queue) = pollster::block_on(adapter.request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Lumen Android Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                },
                None,
            ))
            .map_err(|e| surface_error("request_device", e))?;

            Ok(Gpu {
                adapter,
                device: Arc::new(device),
                queue: Arc::new(queue),
            })
        }
    }

    impl GraphicsSurfaceProvider for WgpuSurfaceProvider {
        fn driver(&self) -> RenderingDriver {
            self.driver
        }

        fn initialize(&mut self) -> Result<()> {
            let backends = match self.driver {
                RenderingDriver::Vulkan => wgpu::Backends::VULKAN,
                RenderingDriver::OpenGl3 => wgpu::Backends::GL,
            };
            self.instance = Some(wgpu::Instance::new(wgpu::InstanceDescriptor {
                backends,
                ..Default::default()
            }));
            tracing::debug!("wgpu instance created for {}", self.driver);
            Ok(())
        }

        fn window_create(
            &mut self,
            window: WindowId,
            vsync_mode: VSyncMode,
            width: u32,
            height: u32,
        ) -> Result<()> {
            if window != MAIN_WINDOW_ID {
                return Err(PlatformError::Unsupported(format!(
                    "Android has no window {}",
                    window
                )));
            }
            let instance = self.instance.as_ref().ok_or_else(|| {
                PlatformError::SurfaceCreation("provider is not initialized".to_string())
            })?;
            let native_window = self
                .app
                .native_window()
                .ok_or_else(|| PlatformError::SurfaceCreation("No native window".to_string()))?;

            let surface = Self::create_surface(instance, &native_window)?;
            if self.gpu.is_none() {
                self.gpu = Some(Self::request_gpu(instance, &surface)?);
            }
            let Some(gpu) = self.gpu.as_ref() else {
                return Err(PlatformError::SurfaceCreation("No device".to_string()));
            };

            let caps = surface.get_capabilities(&gpu.adapter);
            let format = caps
                .formats
                .iter()
                .find(|f| f.is_srgb())
                .or_else(|| caps.formats.first())
                .copied()
                .ok_or_else(|| {
                    PlatformError::SurfaceCreation("Surface reports no formats".to_string())
                })?;

            let mut present_mode = present_mode(vsync_mode);
            if !caps.present_modes.contains(&present_mode) {
                tracing::warn!(
                    "Present mode {:?} unsupported, falling back to Fifo",
                    present_mode
                );
                present_mode = wgpu::PresentMode::Fifo;
            }

            let config = wgpu::SurfaceConfiguration {
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                format,
                width: width.max(1),
                height: height.max(1),
                present_mode,
                alpha_mode: wgpu::CompositeAlphaMode::Auto,
                view_formats: vec![],
                desired_maximum_frame_latency: 2,
            };
            surface.configure(&gpu.device, &config);

            tracing::info!(
                "Surface created: {}x{} {:?} {:?}",
                config.width,
                config.height,
                format,
                present_mode
            );

            self.window = Some(WindowSurface {
                _native_window: native_window,
                surface,
                config,
                vsync_mode,
            });
            Ok(())
        }

        fn window_destroy(&mut self, window: WindowId) {
            if window == MAIN_WINDOW_ID && self.window.take().is_some() {
                tracing::debug!("Surface destroyed");
            }
        }

        fn vsync_mode(&self, _window: WindowId) -> VSyncMode {
            self.window
                .as_ref()
                .map(|w| w.vsync_mode)
                .unwrap_or_default()
        }

        fn set_vsync_mode(&mut self, _window: WindowId, mode: VSyncMode) {
            let (Some(gpu), Some(window)) = (self.gpu.as_ref(), self.window.as_mut()) else {
                return;
            };
            window.vsync_mode = mode;
            window.config.present_mode = present_mode(mode);
            window.surface.configure(&gpu.device, &window.config);
        }

        fn finalize(&mut self) {
            self.window = None;
            self.gpu = None;
            self.instance = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_requires_initialize() {
        let mut provider = HeadlessSurfaceProvider::new(RenderingDriver::Vulkan);
        assert!(provider.window_create(0, VSyncMode::Enabled, 10, 10).is_err());

        provider.initialize().unwrap();
        provider.window_create(0, VSyncMode::Adaptive, 10, 20).unwrap();
        assert_eq!(provider.window_size(0), Some((10, 20)));
        assert_eq!(provider.vsync_mode(0), VSyncMode::Adaptive);

        provider.window_destroy(0);
        assert_eq!(provider.window_size(0), None);
    }

    #[test]
    fn test_headless_rejects_duplicate_window() {
        let mut provider = HeadlessSurfaceProvider::new(RenderingDriver::OpenGl3);
        provider.initialize().unwrap();
        provider.window_create(0, VSyncMode::Enabled, 1, 1).unwrap();
        assert!(provider.window_create(0, VSyncMode::Enabled, 1, 1).is_err());
    }
}
