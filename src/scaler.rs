//! Anime4K as the [`Scaler`] behind the overlay canvas.
//!
//! The library is loaded by the userscript manager before this module runs
//! and exposes `Anime4K.Scaler(gl)` as a factory.

use overlay::error::ScalerError;
use overlay::scaler::{ResizeOptions, Scaler, ScalerBackend, ScalerHandle};
use wasm_bindgen::prelude::*;
use web_sys::HtmlVideoElement;

use crate::js::describe;

#[wasm_bindgen]
extern "C" {
    type Anime4kScaler;

    #[wasm_bindgen(catch, js_namespace = Anime4K, js_name = Scaler)]
    fn create_scaler(gl: &JsValue) -> Result<Anime4kScaler, JsValue>;

    #[wasm_bindgen(method, catch, js_name = inputVideo)]
    fn input_video(this: &Anime4kScaler, video: &HtmlVideoElement) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn resize(this: &Anime4kScaler, ratio: f64, options: &js_sys::Object) -> Result<(), JsValue>;
}

struct Anime4k {
    inner: Anime4kScaler,
    video: HtmlVideoElement,
    options: js_sys::Object,
}

impl Scaler for Anime4k {
    fn set_input_video(&mut self) -> Result<(), ScalerError> {
        self.inner
            .input_video(&self.video)
            .map_err(|e| ScalerError::Failed(describe(&e)))
    }

    fn resize(&mut self, ratio: f64, _options: &ResizeOptions) -> Result<(), ScalerError> {
        self.inner
            .resize(ratio, &self.options)
            .map_err(|e| ScalerError::Failed(describe(&e)))
    }
}

/// Binds Anime4K to the overlay's WebGL context.
pub struct Anime4kBackend {
    context: JsValue,
    video: HtmlVideoElement,
}

impl Anime4kBackend {
    #[must_use]
    pub fn new(context: JsValue, video: HtmlVideoElement) -> Self {
        Self { context, video }
    }
}

impl ScalerBackend for Anime4kBackend {
    fn bind(&self) -> Result<ScalerHandle, ScalerError> {
        let inner = create_scaler(&self.context).map_err(|e| ScalerError::Bind(describe(&e)))?;
        Ok(ScalerHandle::new(Box::new(Anime4k {
            inner,
            video: self.video.clone(),
            options: js_sys::Object::new(),
        })))
    }
}
