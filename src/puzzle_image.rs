use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlImageElement;

use jigsaw_puzzle_core::PuzzleError;

fn load_error(src: &str, reason: &str) -> PuzzleError {
    PuzzleError::ImageLoad {
        src: src.to_string(),
        reason: reason.to_string(),
    }
}

/// Image event handlers for one in-flight load; dropping detaches and
/// frees them.
struct PendingLoad {
    img: HtmlImageElement,
    _onload: Closure<dyn FnMut()>,
    _onerror: Closure<dyn FnMut()>,
}

impl Drop for PendingLoad {
    fn drop(&mut self) {
        self.img.set_onload(None);
        self.img.set_onerror(None);
    }
}

/// Loads `src` and resolves to the image's natural size.
pub(crate) async fn load_image_size(src: &str) -> Result<(u32, u32), PuzzleError> {
    let img = HtmlImageElement::new().map_err(|_| load_error(src, "failed to create image"))?;
    load_into(&img, src).await
}

async fn load_into(img: &HtmlImageElement, src: &str) -> Result<(u32, u32), PuzzleError> {
    let mut pending = None;
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        let onload = Closure::once(move || {
            let _ = resolve.call0(&JsValue::NULL);
        });
        let onerror = Closure::once(move || {
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("image_load_failed"));
        });
        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        pending = Some(PendingLoad {
            img: img.clone(),
            _onload: onload,
            _onerror: onerror,
        });
    });
    img.set_src(src);
    let settled = wasm_bindgen_futures::JsFuture::from(promise).await;
    drop(pending);
    settled.map_err(|_| load_error(src, "image failed to load"))?;
    let width = img.natural_width();
    let height = img.natural_height();
    if width == 0 || height == 0 {
        return Err(PuzzleError::EmptyImage { width, height });
    }
    Ok((width, height))
}
