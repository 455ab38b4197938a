//! Page scheduling primitives for the render loop.
//!
//! `setTimeout` only takes whole milliseconds, while the 24 fps period is
//! 41.67 ms. [`DelayCarry`] carries the fractional remainder from one arm to
//! the next so the long-run average stays on the exact period.

use std::cell::Cell;

#[cfg(feature = "browser")]
use overlay::error::HostError;
#[cfg(feature = "browser")]
use overlay::host::{FrameTiming, OnceHandler};
#[cfg(feature = "browser")]
use wasm_bindgen::JsCast;
#[cfg(feature = "browser")]
use wasm_bindgen::prelude::*;
#[cfg(feature = "browser")]
use web_sys::HtmlVideoElement;

#[cfg(feature = "browser")]
use crate::js::host_error;

#[cfg(test)]
#[path = "timing_test.rs"]
mod timing_test;

/// Turns fractional delays into whole-millisecond ones without drift.
#[derive(Debug, Default)]
pub struct DelayCarry {
    carry: Cell<f64>,
}

impl DelayCarry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole milliseconds to wait for this arm.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn next_delay(&self, delay_ms: f64) -> u32 {
        let wanted = delay_ms.max(0.0) + self.carry.get();
        let whole = wanted.floor();
        self.carry.set(wanted - whole);
        whole as u32
    }
}

#[cfg(feature = "browser")]
#[wasm_bindgen]
extern "C" {
    /// `HTMLVideoElement` with the frame callback API, which `web-sys` only
    /// exposes behind unstable flags.
    #[wasm_bindgen(extends = HtmlVideoElement)]
    type FrameCallbackVideo;

    #[wasm_bindgen(method, catch, js_name = requestVideoFrameCallback)]
    fn request_video_frame_callback(this: &FrameCallbackVideo, callback: &js_sys::Function) -> Result<u32, JsValue>;
}

#[cfg(feature = "browser")]
pub struct BrowserTiming {
    video: HtmlVideoElement,
    carry: DelayCarry,
}

#[cfg(feature = "browser")]
impl BrowserTiming {
    #[must_use]
    pub fn new(video: HtmlVideoElement) -> Self {
        Self { video, carry: DelayCarry::new() }
    }
}

#[cfg(feature = "browser")]
impl FrameTiming for BrowserTiming {
    fn supports_video_frame_callback(&self) -> bool {
        js_sys::Reflect::has(self.video.as_ref(), &JsValue::from_str("requestVideoFrameCallback")).unwrap_or(false)
    }

    fn request_video_frame(&self, callback: OnceHandler) -> Result<(), HostError> {
        let function = Closure::once_into_js(move |_now: f64, _metadata: JsValue| callback());
        self.video
            .unchecked_ref::<FrameCallbackVideo>()
            .request_video_frame_callback(function.unchecked_ref())
            .map(|_| ())
            .map_err(|e| host_error("requestVideoFrameCallback", &e))
    }

    fn set_timeout(&self, delay_ms: f64, callback: OnceHandler) -> Result<(), HostError> {
        let millis = self.carry.next_delay(delay_ms);
        gloo_timers::callback::Timeout::new(millis, move || callback()).forget();
        Ok(())
    }
}
