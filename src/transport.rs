//! [`Transport`] over the userscript manager's `GM_xmlhttpRequest`.
//!
//! The manager performs the request outside the page's origin policy and
//! reports back through one of `onload`, `onerror` or `ontimeout`. Whichever
//! fires first completes the request; the others are dropped.

use std::cell::RefCell;
use std::rc::Rc;

use overlay::bootstrap::{BinaryRequest, Payload, Transport, TransportResult};
use overlay::error::{HostError, TransportError};
use wasm_bindgen::prelude::*;
use web_sys::{Blob, Url};

use crate::js::{describe, host_error};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_name = GM_xmlhttpRequest)]
    fn gm_xmlhttp_request(details: &js_sys::Object) -> Result<JsValue, JsValue>;
}

type Completion = Rc<RefCell<Option<Box<dyn FnOnce(TransportResult)>>>>;

fn complete(slot: &Completion, result: TransportResult) {
    let pending = slot.borrow_mut().take();
    if let Some(on_complete) = pending {
        on_complete(result);
    }
}

/// Blob body held by the page.
pub struct BlobPayload {
    blob: Blob,
}

impl Payload for BlobPayload {
    fn object_url(&self) -> Result<String, HostError> {
        Url::create_object_url_with_blob(&self.blob).map_err(|e| host_error("URL.createObjectURL", &e))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn byte_len(&self) -> Option<u64> {
        Some(self.blob.size() as u64)
    }
}

/// Turn an `onload` response into a payload.
fn on_load(response: &JsValue) -> TransportResult {
    let status = js_sys::Reflect::get(response, &"status".into())
        .ok()
        .as_ref()
        .and_then(JsValue::as_f64)
        .unwrap_or(0.0);
    if !(200.0..300.0).contains(&status) {
        return Err(TransportError::Failed(format!("HTTP status {status}")));
    }
    let body = js_sys::Reflect::get(response, &"response".into())
        .map_err(|e| TransportError::Failed(describe(&e)))?;
    let blob = body
        .dyn_into::<Blob>()
        .map_err(|_| TransportError::Failed("response body is not a blob".into()))?;
    Ok(Box::new(BlobPayload { blob }))
}

fn set(details: &js_sys::Object, key: &str, value: &JsValue) -> Result<(), TransportError> {
    js_sys::Reflect::set(details, &key.into(), value)
        .map(|_| ())
        .map_err(|e| TransportError::Failed(describe(&e)))
}

#[derive(Default)]
pub struct GmTransport;

impl Transport for GmTransport {
    fn get_binary(
        &self,
        request: BinaryRequest,
        on_complete: Box<dyn FnOnce(TransportResult)>,
    ) -> Result<(), TransportError> {
        let slot: Completion = Rc::new(RefCell::new(Some(on_complete)));
        let details = js_sys::Object::new();
        set(&details, "method", &"GET".into())?;
        set(&details, "url", &request.url.as_str().into())?;
        set(&details, "responseType", &"blob".into())?;
        if let Some(timeout) = request.timeout_ms {
            set(&details, "timeout", &timeout.into())?;
        }

        let load = Rc::clone(&slot);
        let onload = Closure::once_into_js(move |response: JsValue| complete(&load, on_load(&response)));
        let error = Rc::clone(&slot);
        let onerror = Closure::once_into_js(move |response: JsValue| {
            let detail = js_sys::Reflect::get(&response, &"error".into())
                .ok()
                .as_ref()
                .and_then(JsValue::as_string)
                .unwrap_or_else(|| "network error".into());
            complete(&error, Err(TransportError::Failed(detail)));
        });
        let timeout = Rc::clone(&slot);
        let ontimeout = Closure::once_into_js(move |_: JsValue| complete(&timeout, Err(TransportError::TimedOut)));
        set(&details, "onload", &onload)?;
        set(&details, "onerror", &onerror)?;
        set(&details, "ontimeout", &ontimeout)?;

        gm_xmlhttp_request(&details).map_err(|e| {
            slot.borrow_mut().take();
            TransportError::Failed(format!("GM_xmlhttpRequest: {}", describe(&e)))
        })?;
        Ok(())
    }
}
