//! JNI-backed platform services
//!
//! Calls helper methods on the hosting activity object. The activity is
//! expected to expose:
//!
//! | Method | Signature |
//! |--------|-----------|
//! | `getClipboard` (optional) | `()Ljava/lang/String;` |
//! | `setClipboard` (optional) | `(Ljava/lang/String;)V` |
//! | `setKeepScreenOn` | `(Z)V` |
//! | `getScreenOrientation` | `()I` |
//! | `setScreenOrientation` | `(I)V` |
//! | `getScreenDPI` | `()I` |
//! | `screenGetUsableRect` | `()[I` |
//! | `hasVirtualKeyboard` | `()Z` |
//! | `showKeyboard` | `(Ljava/lang/String;ZIII)V` |
//! | `hideKeyboard` | `()V` |
//! | `getVirtualKeyboardHeight` | `()I` |
//! | `setPointerIcon` | `(I)V` |
//! | `requestPointerCapture` | `()V` |
//! | `releasePointerCapture` | `()V` |
//! | `alert` | `(Ljava/lang/String;Ljava/lang/String;)V` |

use std::sync::{Mutex, PoisonError};

use android_activity::AndroidApp;
use jni::objects::{GlobalRef, JIntArray, JObject, JString, JValue};
use jni::{JNIEnv, JavaVM};

use lumen_core::{Rect2i, Size2i};
use lumen_platform::{PlatformError, Result, ScreenOrientation, VirtualKeyboardRequest};

use crate::services::PlatformServices;

fn jni_error(e: jni::errors::Error) -> PlatformError {
    PlatformError::Jni(e.to_string())
}

/// [`PlatformServices`] over the activity's Java helper methods
pub struct JniPlatformServices {
    vm: JavaVM,
    activity: GlobalRef,
    has_get_clipboard: bool,
    has_set_clipboard: bool,
    display_size: Mutex<Size2i>,
}

impl JniPlatformServices {
    /// Bind to the activity of a running app
    pub fn new(app: &AndroidApp) -> Result<Self> {
        // Safety: android-activity hands out the process VM and a live activity reference.
        let vm = unsafe { JavaVM::from_raw(app.vm_as_ptr().cast()) }.map_err(jni_error)?;
        let activity = unsafe { JObject::from_raw(app.activity_as_ptr().cast()) };

        let mut env = vm.attach_current_thread().map_err(jni_error)?;
        let activity = env.new_global_ref(&activity).map_err(jni_error)?;

        let has_get_clipboard =
            has_method(&mut env, &activity, "getClipboard", "()Ljava/lang/String;");
        let has_set_clipboard =
            has_method(&mut env, &activity, "setClipboard", "(Ljava/lang/String;)V");
        drop(env);

        tracing::debug!(
            "JNI services bound (clipboard get: {}, set: {})",
            has_get_clipboard,
            has_set_clipboard
        );

        let display_size = app
            .native_window()
            .map(|w| Size2i::new(w.width(), w.height()))
            .unwrap_or_default();

        Ok(Self {
            vm,
            activity,
            has_get_clipboard,
            has_set_clipboard,
            display_size: Mutex::new(display_size),
        })
    }

    /// Record the size of the native window
    pub fn set_display_size(&self, size: Size2i) {
        *self
            .display_size
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = size;
    }

    fn with_env<R>(
        &self,
        method: &str,
        f: impl FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> jni::errors::Result<R>,
    ) -> Option<R> {
        let result = self
            .vm
            .attach_current_thread()
            .map_err(jni_error)
            .and_then(|mut env| {
                let result = f(&mut env, self.activity.as_obj()).map_err(jni_error);
                if env.exception_check().unwrap_or(false) {
                    let _ = env.exception_describe();
                    let _ = env.exception_clear();
                }
                result
            });

        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("{} failed: {}", method, e);
                None
            }
        }
    }

    fn call_void(&self, method: &str, sig: &str, args: &[JValue<'_, '_>]) {
        self.with_env(method, |env, activity| {
            env.call_method(activity, method, sig, args)?.v()
        });
    }

    fn call_int(&self, method: &str) -> i32 {
        self.with_env(method, |env, activity| {
            env.call_method(activity, method, "()I", &[])?.i()
        })
        .unwrap_or(0)
    }

    fn call_bool(&self, method: &str) -> bool {
        self.with_env(method, |env, activity| {
            env.call_method(activity, method, "()Z", &[])?.z()
        })
        .unwrap_or(false)
    }
}

fn has_method(env: &mut JNIEnv<'_>, object: &GlobalRef, name: &str, sig: &str) -> bool {
    let found = env
        .get_object_class(object)
        .and_then(|class| env.get_method_id(&class, name, sig))
        .is_ok();
    if !found && env.exception_check().unwrap_or(false) {
        let _ = env.exception_clear();
    }
    found
}

impl PlatformServices for JniPlatformServices {
    fn clipboard(&self) -> Option<String> {
        if !self.has_get_clipboard {
            return None;
        }
        self.with_env("getClipboard", |env, activity| {
            let text = env
                .call_method(activity, "getClipboard", "()Ljava/lang/String;", &[])?
                .l()?;
            if text.is_null() {
                return Ok(String::new());
            }
            let text = JString::from(text);
            let text: String = env.get_string(&text)?.into();
            Ok(text)
        })
    }

    fn set_clipboard(&self, text: &str) -> bool {
        if !self.has_set_clipboard {
            return false;
        }
        self.with_env("setClipboard", |env, activity| {
            let text = env.new_string(text)?;
            env.call_method(
                activity,
                "setClipboard",
                "(Ljava/lang/String;)V",
                &[JValue::Object(&text)],
            )?
            .v()
        });
        true
    }

    fn set_keep_screen_on(&self, enable: bool) {
        self.call_void("setKeepScreenOn", "(Z)V", &[JValue::Bool(u8::from(enable))]);
    }

    fn screen_orientation(&self) -> ScreenOrientation {
        let raw = self.call_int("getScreenOrientation");
        ScreenOrientation::from_raw(raw).unwrap_or_else(|| {
            tracing::warn!("Unknown screen orientation {}", raw);
            ScreenOrientation::Landscape
        })
    }

    fn set_screen_orientation(&self, orientation: ScreenOrientation) {
        self.call_void(
            "setScreenOrientation",
            "(I)V",
            &[JValue::Int(orientation.to_raw())],
        );
    }

    fn display_size(&self) -> Size2i {
        *self
            .display_size
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn screen_dpi(&self) -> i32 {
        self.call_int("getScreenDPI")
    }

    fn screen_usable_rect(&self) -> Rect2i {
        self.with_env("screenGetUsableRect", |env, activity| {
            let array = env
                .call_method(activity, "screenGetUsableRect", "()[I", &[])?
                .l()?;
            let array = JIntArray::from(array);
            let mut xywh = [0i32; 4];
            env.get_int_array_region(&array, 0, &mut xywh)?;
            Ok(Rect2i::new(xywh[0], xywh[1], xywh[2], xywh[3]))
        })
        .unwrap_or_default()
    }

    fn has_virtual_keyboard(&self) -> bool {
        self.call_bool("hasVirtualKeyboard")
    }

    fn show_virtual_keyboard(&self, request: &VirtualKeyboardRequest) {
        self.with_env("showKeyboard", |env, activity| {
            let existing = env.new_string(&request.existing_text)?;
            env.call_method(
                activity,
                "showKeyboard",
                "(Ljava/lang/String;ZIII)V",
                &[
                    JValue::Object(&existing),
                    JValue::Bool(u8::from(request.multiline)),
                    JValue::Int(request.max_length),
                    JValue::Int(request.cursor_start),
                    JValue::Int(request.cursor_end),
                ],
            )?
            .v()
        });
    }

    fn hide_virtual_keyboard(&self) {
        self.call_void("hideKeyboard", "()V", &[]);
    }

    fn virtual_keyboard_height(&self) -> i32 {
        self.call_int("getVirtualKeyboardHeight")
    }

    fn set_pointer_icon(&self, icon: i32) {
        self.call_void("setPointerIcon", "(I)V", &[JValue::Int(icon)]);
    }

    fn request_pointer_capture(&self) {
        self.call_void("requestPointerCapture", "()V", &[]);
    }

    fn release_pointer_capture(&self) {
        self.call_void("releasePointerCapture", "()V", &[]);
    }

    fn alert(&self, message: &str, title: &str) {
        tracing::error!("{}: {}", title, message);
        self.with_env("alert", |env, activity| {
            let message = env.new_string(message)?;
            let title = env.new_string(title)?;
            env.call_method(
                activity,
                "alert",
                "(Ljava/lang/String;Ljava/lang/String;)V",
                &[JValue::Object(&message), JValue::Object(&title)],
            )?
            .v()
        });
    }
}

impl std::fmt::Debug for JniPlatformServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JniPlatformServices")
            .field("has_get_clipboard", &self.has_get_clipboard)
            .field("has_set_clipboard", &self.has_set_clipboard)
            .field("display_size", &self.display_size())
            .finish()
    }
}
