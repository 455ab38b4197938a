//! Overlay element construction around the Plyr video wrapper.
//!
//! The canvas has to sit exactly on top of the video while both stay centered,
//! which takes two absolutely positioned layers inside a sized outer wrapper:
//!
//! ```text
//! #outer-wrapper                       (sized to the player box, px)
//! ├── #middle-player-wrapper           (absolute, 100% × 100%)
//! │   └── .plyr__video-wrapper         (relative)
//! └── #middle-canvas-wrapper           (absolute, 100% × 100%)
//!     └── #inner-canvas-wrapper        (relative, margin auto, width %)
//!         └── <canvas>                 (pixel size owned by the scaler)
//! ```

#[cfg(feature = "browser")]
use overlay::error::HostError;
#[cfg(feature = "browser")]
use overlay::geometry::BoxSize;
#[cfg(feature = "browser")]
use overlay::host::Overlay;
#[cfg(feature = "browser")]
use wasm_bindgen::JsValue;
#[cfg(feature = "browser")]
use web_sys::{Document, HtmlCanvasElement, HtmlElement};

#[cfg(feature = "browser")]
use crate::js::{cast, host_error};

#[cfg(test)]
#[path = "dom_test.rs"]
mod dom_test;

pub const OUTER_WRAPPER_ID: &str = "outer-wrapper";
pub const MIDDLE_CANVAS_WRAPPER_ID: &str = "middle-canvas-wrapper";
pub const INNER_CANVAS_WRAPPER_ID: &str = "inner-canvas-wrapper";
pub const MIDDLE_PLAYER_WRAPPER_ID: &str = "middle-player-wrapper";

/// CSS length in pixels.
#[must_use]
pub fn px(value: f64) -> String {
    format!("{value}px")
}

/// CSS length in percent.
#[must_use]
pub fn percent(value: u32) -> String {
    format!("{value}%")
}

/// Elements the core writes geometry into.
#[cfg(feature = "browser")]
pub struct OverlayDom {
    outer: HtmlElement,
    inner_canvas_wrapper: HtmlElement,
    canvas: HtmlCanvasElement,
}

#[cfg(feature = "browser")]
impl OverlayDom {
    /// Wrap `player_wrapper` and stack a canvas on top of it.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if an element cannot be created or moved.
    pub fn build(document: &Document, player_wrapper: &HtmlElement, player: BoxSize) -> Result<Self, HostError> {
        let outer = div(document, OUTER_WRAPPER_ID)?;
        set_style(&outer, "width", &px(player.width))?;
        set_style(&outer, "height", &px(player.height))?;

        let middle_canvas_wrapper = layer(document, MIDDLE_CANVAS_WRAPPER_ID)?;
        let inner_canvas_wrapper = div(document, INNER_CANVAS_WRAPPER_ID)?;
        set_style(&inner_canvas_wrapper, "position", "relative")?;
        set_style(&inner_canvas_wrapper, "margin", "auto")?;

        let canvas: HtmlCanvasElement = cast(
            document.create_element("canvas").map_err(|e| host_error("create canvas", &e))?,
            "canvas",
        )?;
        append(&inner_canvas_wrapper, &canvas)?;
        append(&middle_canvas_wrapper, &inner_canvas_wrapper)?;

        let middle_player_wrapper = layer(document, MIDDLE_PLAYER_WRAPPER_ID)?;
        set_style(player_wrapper, "position", "relative")?;

        let parent = player_wrapper
            .parent_element()
            .ok_or_else(|| HostError("video wrapper is detached".into()))?;
        let anchor: &web_sys::Node = player_wrapper;
        parent
            .insert_before(&outer, Some(anchor))
            .map_err(|e| host_error("insert outer wrapper", &e))?;
        append(&outer, &middle_player_wrapper)?;
        append(&middle_player_wrapper, player_wrapper)?;
        append(&outer, &middle_canvas_wrapper)?;

        log::info!("canvas initialized");
        Ok(Self { outer, inner_canvas_wrapper, canvas })
    }

    /// WebGL context of the overlay canvas, for binding the scaler.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when WebGL is unavailable.
    pub fn webgl_context(&self) -> Result<JsValue, HostError> {
        self.canvas
            .get_context("webgl")
            .map_err(|e| host_error("getContext(webgl)", &e))?
            .map(JsValue::from)
            .ok_or_else(|| HostError("webgl is not available".into()))
    }
}

#[cfg(feature = "browser")]
impl Overlay for OverlayDom {
    fn surface_pixel_width(&self) -> u32 {
        self.canvas.width()
    }

    fn set_outer_box(&self, player: BoxSize) -> Result<(), HostError> {
        set_style(&self.outer, "width", &px(player.width))?;
        set_style(&self.outer, "height", &px(player.height))
    }

    fn set_width_percent(&self, value: u32) -> Result<(), HostError> {
        set_style(&self.inner_canvas_wrapper, "width", &percent(value))
    }
}

#[cfg(feature = "browser")]
fn div(document: &Document, id: &str) -> Result<HtmlElement, HostError> {
    let element = document.create_element("div").map_err(|e| host_error("create div", &e))?;
    element.set_id(id);
    cast(element, "div")
}

/// Absolutely positioned full-size layer.
#[cfg(feature = "browser")]
fn layer(document: &Document, id: &str) -> Result<HtmlElement, HostError> {
    let element = div(document, id)?;
    set_style(&element, "position", "absolute")?;
    set_style(&element, "width", "100%")?;
    set_style(&element, "height", "100%")?;
    Ok(element)
}

#[cfg(feature = "browser")]
fn set_style(element: &HtmlElement, property: &str, value: &str) -> Result<(), HostError> {
    element
        .style()
        .set_property(property, value)
        .map_err(|e| host_error(&format!("set {property}"), &e))
}

#[cfg(feature = "browser")]
fn append(parent: &HtmlElement, child: &web_sys::Node) -> Result<(), HostError> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|e| host_error("append child", &e))
}
