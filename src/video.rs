//! [`VideoElement`] over the `<video>` inside the Plyr wrapper.

use std::cell::RefCell;

use overlay::error::HostError;
use overlay::geometry::NaturalSize;
use overlay::host::{Handler, OnceHandler, VideoElement, VideoEvent};
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, HtmlSourceElement, HtmlVideoElement};

use crate::js::host_error;

fn event_name(event: VideoEvent) -> &'static str {
    match event {
        VideoEvent::Playing => "playing",
    }
}

pub struct PageVideo {
    element: HtmlVideoElement,
    listeners: RefCell<Vec<Closure<dyn FnMut()>>>,
}

impl PageVideo {
    #[must_use]
    pub fn new(element: HtmlVideoElement) -> Self {
        Self { element, listeners: RefCell::new(Vec::new()) }
    }
}

impl VideoElement for PageVideo {
    /// The page declares its stream as a `<source>` child; a direct `src`
    /// assignment (ours included) only shows up in `currentSrc`.
    fn source(&self) -> Option<String> {
        self.element
            .first_element_child()
            .and_then(|child| child.dyn_into::<HtmlSourceElement>().ok())
            .map(|source| source.src())
            .filter(|src| !src.is_empty())
            .or_else(|| Some(self.element.current_src()).filter(|src| !src.is_empty()))
    }

    fn set_source(&self, url: &str) -> Result<(), HostError> {
        self.element.set_src(url);
        Ok(())
    }

    fn natural_size(&self) -> NaturalSize {
        NaturalSize { width: self.element.video_width(), height: self.element.video_height() }
    }

    fn subscribe_once(&self, event: VideoEvent, handler: OnceHandler) -> Result<(), HostError> {
        let name = event_name(event);
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        let function = Closure::once_into_js(move || handler());
        self.element
            .add_event_listener_with_callback_and_add_event_listener_options(name, function.unchecked_ref(), &options)
            .map_err(|e| host_error(&format!("addEventListener({name})"), &e))
    }

    fn subscribe(&self, event: VideoEvent, mut handler: Handler) -> Result<(), HostError> {
        let name = event_name(event);
        let closure = Closure::<dyn FnMut()>::new(move || handler());
        self.element
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            .map_err(|e| host_error(&format!("addEventListener({name})"), &e))?;
        self.listeners.borrow_mut().push(closure);
        Ok(())
    }
}
