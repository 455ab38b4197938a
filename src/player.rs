//! [`PlayerHost`] over the page's Plyr instance.
//!
//! The page declares the Plyr object as a top-level `const player`. That is a
//! script-scope binding, not a property of `window`, so it is imported as a
//! plain identifier. The root element carries the `plyr` class; in fullscreen
//! Plyr stretches that same element over the screen, so one bounding rect
//! serves both regimes.

#[cfg(feature = "browser")]
use std::cell::RefCell;

use overlay::error::HostError;
#[cfg(feature = "browser")]
use overlay::geometry::{BoxSize, LayoutRegime};
#[cfg(feature = "browser")]
use overlay::host::{Handler, PlayerEvent, PlayerHost};
#[cfg(feature = "browser")]
use wasm_bindgen::prelude::*;
#[cfg(feature = "browser")]
use web_sys::Element;

#[cfg(feature = "browser")]
use crate::js::host_error;

#[cfg(test)]
#[path = "player_test.rs"]
mod player_test;

/// The page's player binding, or an error when it is `undefined` or `null`.
///
/// # Errors
///
/// Returns [`HostError`] when the page has not created a player.
pub fn require_player<T>(binding: Option<T>) -> Result<T, HostError> {
    binding.ok_or_else(|| HostError("the page has no `player` object".into()))
}

#[cfg(feature = "browser")]
#[wasm_bindgen]
extern "C" {
    #[derive(Clone)]
    pub type Plyr;

    #[wasm_bindgen(thread_local_v2, js_name = player)]
    static PLAYER: Option<Plyr>;

    #[wasm_bindgen(method, catch)]
    fn on(this: &Plyr, event: &str, callback: &js_sys::Function) -> Result<(), JsValue>;

    #[wasm_bindgen(method, getter)]
    fn paused(this: &Plyr) -> bool;

    #[wasm_bindgen(method, getter)]
    fn fullscreen(this: &Plyr) -> PlyrFullscreen;

    type PlyrFullscreen;

    #[wasm_bindgen(method, getter)]
    fn active(this: &PlyrFullscreen) -> bool;
}

#[cfg(feature = "browser")]
fn event_name(event: PlayerEvent) -> &'static str {
    match event {
        PlayerEvent::EnterFullscreen => "enterfullscreen",
        PlayerEvent::ExitFullscreen => "exitfullscreen",
    }
}

#[cfg(feature = "browser")]
pub struct PlyrHost {
    plyr: Plyr,
    element: Element,
    listeners: RefCell<Vec<Closure<dyn FnMut(JsValue)>>>,
}

#[cfg(feature = "browser")]
impl PlyrHost {
    /// Bind to the page's `player` and its root element.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when the page has not created a player.
    pub fn from_page(element: Element) -> Result<Self, HostError> {
        let plyr = require_player(PLAYER.with(Clone::clone))?;
        Ok(Self { plyr, element, listeners: RefCell::new(Vec::new()) })
    }
}

#[cfg(feature = "browser")]
impl PlayerHost for PlyrHost {
    fn player_box(&self, _regime: LayoutRegime) -> BoxSize {
        let rect = self.element.get_bounding_client_rect();
        BoxSize::new(rect.width(), rect.height())
    }

    fn fullscreen_active(&self) -> bool {
        self.plyr.fullscreen().active()
    }

    fn paused(&self) -> bool {
        self.plyr.paused()
    }

    fn on(&self, event: PlayerEvent, mut handler: Handler) -> Result<(), HostError> {
        let name = event_name(event);
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |_event: JsValue| handler());
        self.plyr
            .on(name, closure.as_ref().unchecked_ref())
            .map_err(|e| host_error(&format!("player.on({name})"), &e))?;
        self.listeners.borrow_mut().push(closure);
        Ok(())
    }
}
