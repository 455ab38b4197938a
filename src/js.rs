//! Small conversions between `JsValue` failures and the core's error types.

use overlay::error::HostError;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element};

/// Describe a thrown JS value for logging.
pub fn describe(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

pub fn host_error(context: &str, err: &JsValue) -> HostError {
    HostError(format!("{context}: {}", describe(err)))
}

/// First element carrying `class_name`.
pub fn first_by_class(document: &Document, class_name: &str) -> Result<Element, HostError> {
    document
        .get_elements_by_class_name(class_name)
        .item(0)
        .ok_or_else(|| HostError(format!("no .{class_name} element on the page")))
}

/// Cast an element, naming what was expected on failure.
pub fn cast<T: JsCast>(element: Element, expected: &str) -> Result<T, HostError> {
    element
        .dyn_into::<T>()
        .map_err(|el| HostError(format!("expected {expected}, found <{}>", el.tag_name().to_lowercase())))
}
