use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, MouseEvent, Touch, TouchEvent};

use jigsaw_puzzle_core::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PointerKind {
    Mouse,
    Touch,
}

impl PointerKind {
    pub(crate) fn from_event_type(value: &str) -> Self {
        if value.starts_with("touch") {
            PointerKind::Touch
        } else {
            PointerKind::Mouse
        }
    }
}

pub(crate) fn mouse_client_point(event: &MouseEvent) -> Point {
    Point::new(event.client_x() as f64, event.client_y() as f64)
}

fn first_touch(event: &TouchEvent) -> Option<Touch> {
    event
        .touches()
        .item(0)
        .or_else(|| event.changed_touches().item(0))
}

pub(crate) fn touch_client_point(event: &TouchEvent) -> Option<Point> {
    let touch = first_touch(event)?;
    Some(Point::new(touch.client_x() as f64, touch.client_y() as f64))
}

/// Converts a viewport point into coordinates relative to `element`'s top-left.
pub(crate) fn relative_to(element: &Element, client: Point) -> Point {
    let rect = element.get_bounding_client_rect();
    Point::new(client.x - rect.left(), client.y - rect.top())
}

fn document_element() -> Option<HtmlElement> {
    web_sys::window()?
        .document()?
        .document_element()?
        .dyn_into::<HtmlElement>()
        .ok()
}

/// Keeps the page from scrolling under a touch drag.
pub(crate) fn lock_page_scroll() {
    if let Some(root) = document_element() {
        let _ = root.style().set_property("overflow", "hidden");
    }
}

pub(crate) fn unlock_page_scroll() {
    if let Some(root) = document_element() {
        let _ = root.style().remove_property("overflow");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn pointer_kind_from_event_type() {
        assert_eq!(PointerKind::from_event_type("touchstart"), PointerKind::Touch);
        assert_eq!(PointerKind::from_event_type("touchcancel"), PointerKind::Touch);
        assert_eq!(PointerKind::from_event_type("mousedown"), PointerKind::Mouse);
        assert_eq!(PointerKind::from_event_type("mouseleave"), PointerKind::Mouse);
    }

    #[wasm_bindgen_test]
    fn scroll_lock_round_trip() {
        lock_page_scroll();
        let root = document_element().expect("document element");
        assert_eq!(
            root.style().get_property_value("overflow").ok().as_deref(),
            Some("hidden")
        );
        unlock_page_scroll();
        assert_eq!(
            root.style().get_property_value("overflow").ok().as_deref(),
            Some("")
        );
    }
}
