//! Page entry point.
//!
//! The Plyr player is created late by the page, so nothing happens until the
//! window's `load` event. Setup failures before the controller exists are
//! logged once and leave the page untouched.

use std::cell::RefCell;
use std::rc::Rc;

use overlay::config::OverlayConfig;
use overlay::controller::{HostParts, SessionController};
use overlay::error::HostError;
use overlay::geometry::BoxSize;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, HtmlVideoElement};

use crate::dom::OverlayDom;
use crate::js::{cast, first_by_class, host_error};
use crate::player::PlyrHost;
use crate::scaler::Anime4kBackend;
use crate::timing::BrowserTiming;
use crate::transport::GmTransport;
use crate::video::PageVideo;

const PLAYER_CLASS: &str = "plyr";
const VIDEO_WRAPPER_CLASS: &str = "plyr__video-wrapper";

thread_local! {
    static CONTROLLER: RefCell<Option<Rc<SessionController>>> = const { RefCell::new(None) };
}

/// Install logging and schedule the session for page load.
///
/// `options` is an optional JSON object of [`OverlayConfig`] fields. Invalid
/// options are reported and replaced by the defaults.
#[wasm_bindgen]
pub fn start(options: Option<String>) {
    console_error_panic_hook::set_once();

    let (config, rejected) = match OverlayConfig::from_options(options.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (OverlayConfig::default(), Some(e)),
    };
    let level = config.log_level().unwrap_or(log::Level::Info);
    if console_log::init_with_level(level).is_err() {
        // Logger already installed: `start` ran before.
        return;
    }
    if let Some(e) = rejected {
        log::warn!("ignoring overlay options: {e}");
    }

    let Some(window) = web_sys::window() else {
        return;
    };
    let on_load = Closure::once_into_js(move || {
        if let Err(e) = run(config) {
            log::error!("upscaling not started: {e}");
        }
    });
    if let Err(e) = window.add_event_listener_with_callback("load", on_load.unchecked_ref()) {
        log::error!("{}", host_error("listen for load", &e));
    }
}

fn run(config: OverlayConfig) -> Result<(), HostError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| HostError("no document".into()))?;
    let (player_element, video_wrapper, video_element) = find_player(&document)?;

    let player = PlyrHost::from_page(player_element.clone().into())?;
    let rect = player_element.get_bounding_client_rect();
    let dom = OverlayDom::build(&document, &video_wrapper, BoxSize::new(rect.width(), rect.height()))?;
    let backend = Anime4kBackend::new(dom.webgl_context()?, video_element.clone());

    let parts = HostParts {
        player: Rc::new(player),
        video: Rc::new(PageVideo::new(video_element.clone())),
        overlay: Rc::new(dom),
        timing: Rc::new(BrowserTiming::new(video_element)),
        transport: Rc::new(GmTransport),
    };
    let controller = SessionController::new(parts, &backend, config).map_err(|e| HostError(e.to_string()))?;
    controller.attach();
    CONTROLLER.with(|slot| *slot.borrow_mut() = Some(controller));
    Ok(())
}

/// The Plyr root, its video wrapper, and the video inside it.
fn find_player(document: &Document) -> Result<(HtmlElement, HtmlElement, HtmlVideoElement), HostError> {
    let player: HtmlElement = cast(first_by_class(document, PLAYER_CLASS)?, "plyr element")?;
    let wrapper: HtmlElement = cast(first_by_class(document, VIDEO_WRAPPER_CLASS)?, "video wrapper")?;
    let video = wrapper
        .first_element_child()
        .ok_or_else(|| HostError("video wrapper is empty".into()))?;
    let video: HtmlVideoElement = cast(video, "video")?;
    Ok((player, wrapper, video))
}
