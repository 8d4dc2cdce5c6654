use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, ResizeObserver, ResizeObserverEntry};

use jigsaw_puzzle_core::Size;

/// Live `ResizeObserver` on one element; disconnects when dropped.
pub(crate) struct ResizeSubscription {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

impl ResizeSubscription {
    pub(crate) fn observe(
        element: &Element,
        on_resize: Rc<dyn Fn(Size)>,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            let rect = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<ResizeObserverEntry>().ok())
                .map(|entry| entry.content_rect())
                .next();
            if let Some(rect) = rect {
                on_resize(Size::new(rect.width(), rect.height()));
            }
        });
        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())?;
        observer.observe(element);
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
