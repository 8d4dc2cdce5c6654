use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use js_sys::Date;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlElement, MouseEvent, TouchEvent};
use yew::prelude::*;

use crate::input::{
    lock_page_scroll, mouse_client_point, relative_to, touch_client_point, unlock_page_scroll,
    PointerKind,
};
use crate::puzzle_image::load_image_size;
use crate::resize::ResizeSubscription;
use jigsaw_puzzle_core::{
    scramble_seed, splitmix32, GridSpec, Point, PuzzleError, PuzzleSession, Size, Tile,
    TilePosition, DEFAULT_COLUMNS, DEFAULT_ROWS, PIECE_CLASS, PIECE_DRAGGING_CLASS, ROOT_CLASS,
    SCRAMBLE_BASE,
};

#[derive(Properties, Clone, PartialEq)]
pub struct JigsawPuzzleProps {
    /// Source of the image; any URL or relative path. Empty renders nothing.
    pub image_src: AttrValue,
    #[prop_or(DEFAULT_ROWS)]
    pub rows: u32,
    #[prop_or(DEFAULT_COLUMNS)]
    pub columns: u32,
    /// Fired when the last unsolved tile snaps into place.
    #[prop_or_default]
    pub on_solved: Callback<()>,
    /// Fired when the image cannot be loaded or the grid is invalid.
    #[prop_or_default]
    pub on_load_error: Callback<PuzzleError>,
    /// Fixed scatter seed; a time-derived one is used when absent.
    #[prop_or_default]
    pub seed: Option<u32>,
}

/// The tile element under the pointer plus how the drag was started.
struct DragHandle {
    element: HtmlElement,
    kind: PointerKind,
}

#[derive(Default)]
struct DragHandlers {
    on_move: Option<Rc<dyn Fn(Point) -> bool>>,
    on_release: Option<Rc<dyn Fn()>>,
}

type SharedSession = Rc<RefCell<Option<PuzzleSession>>>;

fn fmt_f64(value: f64) -> String {
    format!("{:.3}", value)
}

fn time_nonce() -> u32 {
    splitmix32(Date::now().max(0.0) as u64 as u32)
}

/// Tiles are absolutely positioned, so the root is always their containing block.
pub(crate) fn root_style(session: Option<&PuzzleSession>) -> String {
    match session.and_then(|session| session.display_height()) {
        Some(height) => format!("position: relative; height: {}px;", fmt_f64(height)),
        None => "position: relative;".to_string(),
    }
}

pub(crate) fn tile_style(tile: &Tile, grid: GridSpec, layout: Size, image_src: &str) -> String {
    let fraction = grid.tile_fraction();
    let background = grid.background_position_percent(tile.correct_position);
    let pixel = tile.pixel_position(layout);
    format!(
        "position: absolute; width: {}%; height: {}%; background-image: url(\"{}\"); \
         background-size: {}px {}px; background-position: {}% {}%; left: {}px; top: {}px;",
        fmt_f64(fraction.width * 100.0),
        fmt_f64(fraction.height * 100.0),
        image_src.replace('"', "%22"),
        fmt_f64(layout.width),
        fmt_f64(layout.height),
        fmt_f64(background.x),
        fmt_f64(background.y),
        fmt_f64(pixel.x),
        fmt_f64(pixel.y)
    )
}

/// Tile element a pointer event started on. Yew delegates listeners to the
/// mount host, so `currentTarget` is the host rather than the tile.
pub(crate) fn piece_element(event: &Event) -> Option<HtmlElement> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .closest(&format!(".{PIECE_CLASS}"))
        .ok()??
        .dyn_into::<HtmlElement>()
        .ok()
}

fn apply_drag_position(element: &HtmlElement, position: Point) {
    let style = element.style();
    let _ = style.set_property("left", &format!("{}px", fmt_f64(position.x)));
    let _ = style.set_property("top", &format!("{}px", fmt_f64(position.y)));
}

fn drag_listener<F>(target: &Element, event_type: &'static str, handler: F) -> EventListener
where
    F: FnMut(&Event) + 'static,
{
    EventListener::new_with_options(
        target,
        event_type,
        EventListenerOptions::enable_prevent_default(),
        handler,
    )
}

#[function_component(JigsawPuzzle)]
pub fn jigsaw_puzzle(props: &JigsawPuzzleProps) -> Html {
    let session: SharedSession = use_mut_ref(|| None::<PuzzleSession>);
    let container = use_mut_ref(|| None::<Size>);
    let load_seq = use_mut_ref(|| 0u64);
    let drag_handle = use_mut_ref(|| None::<DragHandle>);
    let drag_handlers = use_mut_ref(DragHandlers::default);
    let root_ref = use_node_ref();
    let force_update = use_force_update();
    let has_root = !props.image_src.is_empty();

    {
        let session = session.clone();
        let container = container.clone();
        let load_seq = load_seq.clone();
        let force_update = force_update.clone();
        let on_load_error = props.on_load_error.clone();
        use_effect_with(
            (props.image_src.clone(), props.rows, props.columns, props.seed),
            move |(image_src, rows, columns, seed)| {
                let generation = {
                    let mut seq = load_seq.borrow_mut();
                    *seq = seq.wrapping_add(1);
                    *seq
                };
                if session.borrow_mut().take().is_some() {
                    force_update.force_update();
                }
                if !image_src.is_empty() {
                    match GridSpec::new(*rows, *columns) {
                        Err(err) => {
                            gloo::console::warn!("jigsaw puzzle: invalid grid", err.to_string());
                            on_load_error.emit(err);
                        }
                        Ok(grid) => {
                            let src = image_src.to_string();
                            let seed = seed
                                .unwrap_or_else(|| scramble_seed(SCRAMBLE_BASE, time_nonce(), grid));
                            spawn_local(async move {
                                let result = load_image_size(&src).await.and_then(|(width, height)| {
                                    PuzzleSession::new(grid, width, height, seed)
                                });
                                if *load_seq.borrow() != generation {
                                    return;
                                }
                                match result {
                                    Ok(mut next) => {
                                        let image = next.image_size();
                                        gloo::console::log!(
                                            "jigsaw puzzle: image loaded",
                                            src,
                                            image.width,
                                            image.height
                                        );
                                        if let Some(size) = *container.borrow() {
                                            next.resize(size);
                                        }
                                        *session.borrow_mut() = Some(next);
                                        force_update.force_update();
                                    }
                                    Err(err) => {
                                        gloo::console::warn!(
                                            "jigsaw puzzle: image load failed",
                                            err.to_string()
                                        );
                                        on_load_error.emit(err);
                                    }
                                }
                            });
                        }
                    }
                }
                || ()
            },
        );
    }

    {
        let session = session.clone();
        let container = container.clone();
        let drag_handlers = drag_handlers.clone();
        let root_ref = root_ref.clone();
        let force_update = force_update.clone();
        use_effect_with(has_root, move |_| {
            let mut subscription = None;
            let mut listeners = Vec::new();
            if let Some(root) = root_ref.cast::<HtmlElement>() {
                let on_resize: Rc<dyn Fn(Size)> = Rc::new(move |size: Size| {
                    *container.borrow_mut() = Some(size);
                    if let Some(session) = session.borrow_mut().as_mut() {
                        session.resize(size);
                    }
                    force_update.force_update();
                });
                on_resize(Size::new(
                    root.offset_width() as f64,
                    root.offset_height() as f64,
                ));
                match ResizeSubscription::observe(&root, on_resize) {
                    Ok(observer) => subscription = Some(observer),
                    Err(_) => gloo::console::warn!("jigsaw puzzle: resize observer unavailable"),
                }

                let move_handlers = drag_handlers.clone();
                listeners.push(drag_listener(&root, "mousemove", move |event| {
                    let Some(event) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    let handler = move_handlers.borrow().on_move.clone();
                    if let Some(handler) = handler {
                        if handler(mouse_client_point(event)) {
                            event.stop_propagation();
                            event.prevent_default();
                        }
                    }
                }));
                let touch_move_handlers = drag_handlers.clone();
                listeners.push(drag_listener(&root, "touchmove", move |event| {
                    let Some(event) = event.dyn_ref::<TouchEvent>() else {
                        return;
                    };
                    let Some(point) = touch_client_point(event) else {
                        return;
                    };
                    let handler = touch_move_handlers.borrow().on_move.clone();
                    if let Some(handler) = handler {
                        if handler(point) {
                            event.stop_propagation();
                            event.prevent_default();
                        }
                    }
                }));
                for event_type in ["mouseup", "mouseleave", "touchend", "touchcancel"] {
                    let release_handlers = drag_handlers.clone();
                    listeners.push(drag_listener(&root, event_type, move |_event| {
                        let handler = release_handlers.borrow().on_release.clone();
                        if let Some(handler) = handler {
                            handler();
                        }
                    }));
                }
                for event_type in ["dragenter", "dragover"] {
                    listeners.push(drag_listener(&root, event_type, |event| {
                        event.stop_propagation();
                        event.prevent_default();
                    }));
                }
            }
            move || {
                drop(listeners);
                drop(subscription);
            }
        });
    }

    let on_move: Rc<dyn Fn(Point) -> bool> = {
        let session = session.clone();
        let drag_handle = drag_handle.clone();
        let root_ref = root_ref.clone();
        Rc::new(move |client: Point| {
            let handle = drag_handle.borrow();
            let Some(handle) = handle.as_ref() else {
                return false;
            };
            let Some(root) = root_ref.cast::<Element>() else {
                return false;
            };
            let pointer = relative_to(&root, client);
            let position = session
                .borrow_mut()
                .as_mut()
                .and_then(|session| session.drag_move(pointer));
            match position {
                Some(position) => {
                    apply_drag_position(&handle.element, position);
                    true
                }
                None => false,
            }
        })
    };

    let on_release: Rc<dyn Fn()> = {
        let session = session.clone();
        let drag_handle = drag_handle.clone();
        let force_update = force_update.clone();
        let on_solved = props.on_solved.clone();
        Rc::new(move || {
            let Some(handle) = drag_handle.borrow_mut().take() else {
                return;
            };
            if handle.kind == PointerKind::Touch {
                unlock_page_scroll();
            }
            let _ = handle.element.class_list().remove_1(PIECE_DRAGGING_CLASS);
            let outcome = session
                .borrow_mut()
                .as_mut()
                .and_then(|session| session.release());
            force_update.force_update();
            if outcome.is_some_and(|outcome| outcome.puzzle_solved) {
                gloo::console::log!("jigsaw puzzle: solved");
                on_solved.emit(());
            }
        })
    };

    {
        let mut handlers = drag_handlers.borrow_mut();
        handlers.on_move = Some(on_move);
        handlers.on_release = Some(on_release);
    }

    let begin_drag: Rc<dyn Fn(TilePosition, &Event, Point)> = {
        let session = session.clone();
        let drag_handle = drag_handle.clone();
        let root_ref = root_ref.clone();
        Rc::new(move |position: TilePosition, event: &Event, client: Point| {
            if drag_handle.borrow().is_some() {
                return;
            }
            let Some(element) = piece_element(event) else {
                return;
            };
            let Some(root) = root_ref.cast::<Element>() else {
                return;
            };
            let pointer = relative_to(&root, client);
            let started = session
                .borrow_mut()
                .as_mut()
                .is_some_and(|session| session.begin_drag(position, pointer));
            if !started {
                return;
            }
            let kind = PointerKind::from_event_type(&event.type_());
            if kind == PointerKind::Touch {
                lock_page_scroll();
            }
            let _ = element.class_list().add_1(PIECE_DRAGGING_CLASS);
            *drag_handle.borrow_mut() = Some(DragHandle { element, kind });
        })
    };

    if !has_root {
        return html! {};
    }

    let session_ref = session.borrow();
    let tiles: Html = match session_ref
        .as_ref()
        .and_then(|session| session.layout_size().map(|layout| (session, layout)))
    {
        Some((session, layout)) => session
            .tiles()
            .iter()
            .map(|tile| {
                let position = tile.correct_position;
                let on_mouse_down = {
                    let begin_drag = begin_drag.clone();
                    Callback::from(move |event: MouseEvent| {
                        begin_drag(position, &event, mouse_client_point(&event));
                    })
                };
                let on_touch_start = {
                    let begin_drag = begin_drag.clone();
                    Callback::from(move |event: TouchEvent| {
                        if let Some(point) = touch_client_point(&event) {
                            begin_drag(position, &event, point);
                        }
                    })
                };
                html! {
                    <div
                        key={position.to_string()}
                        data-position={position.to_string()}
                        draggable="false"
                        class={tile.class_name()}
                        style={tile_style(tile, session.grid(), layout, &props.image_src)}
                        onmousedown={on_mouse_down}
                        ontouchstart={on_touch_start}
                    />
                }
            })
            .collect(),
        None => html! {},
    };
    let style = root_style(session_ref.as_ref());

    html! {
        <div ref={root_ref} class={ROOT_CLASS} style={style}>
            { tiles }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_error_panic_hook::set_once as set_panic_hook;
    use gloo::timers::future::TimeoutFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn test_root(id: &str) -> Element {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .expect("document available");
        let root = document.create_element("div").expect("create test root");
        root.set_id(id);
        document
            .body()
            .expect("body available")
            .append_child(&root)
            .expect("append test root");
        root
    }

    #[wasm_bindgen_test]
    fn tile_style_places_and_crops() {
        let grid = GridSpec::new(3, 4).unwrap();
        let mut session = PuzzleSession::new(grid, 1200, 900, 3).unwrap();
        session.resize(Size::new(800.0, 10.0));
        let layout = session.layout_size().unwrap();
        let tile = session.tile(5).unwrap().clone();
        let style = tile_style(&tile, grid, layout, "cat.jpg");
        assert!(style.contains("width: 25.000%"));
        assert!(style.contains("height: 33.333%"));
        assert!(style.contains("background-image: url(\"cat.jpg\")"));
        assert!(style.contains("background-size: 800.000px 600.000px"));
        assert!(style.contains("background-position: 33.333% 50.000%"));
        let pixel = tile.pixel_position(layout);
        assert!(style.contains(&format!("left: {}px", fmt_f64(pixel.x))));
        assert!(style.contains(&format!("top: {}px", fmt_f64(pixel.y))));
    }

    #[wasm_bindgen_test]
    fn root_style_waits_for_container() {
        let grid = GridSpec::default();
        let mut session = PuzzleSession::new(grid, 400, 200, 1).unwrap();
        assert_eq!(root_style(Some(&session)), "position: relative;");
        session.resize(Size::new(300.0, 0.0));
        assert_eq!(
            root_style(Some(&session)),
            "position: relative; height: 150.000px;"
        );
        assert_eq!(root_style(None), "position: relative;");
    }

    #[wasm_bindgen_test(async)]
    async fn empty_image_src_renders_nothing() {
        set_panic_hook();
        let root = test_root("jigsaw-empty-root");
        let props = JigsawPuzzleProps {
            image_src: AttrValue::from(""),
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            on_solved: Callback::noop(),
            on_load_error: Callback::noop(),
            seed: None,
        };
        let _handle =
            yew::Renderer::<JigsawPuzzle>::with_root_and_props(root.clone(), props).render();
        TimeoutFuture::new(10).await;
        assert_eq!(root.child_element_count(), 0);
    }

    #[wasm_bindgen_test(async)]
    async fn invalid_grid_reports_error() {
        set_panic_hook();
        let root = test_root("jigsaw-invalid-root");
        let reported = Rc::new(RefCell::new(None::<PuzzleError>));
        let reported_cb = reported.clone();
        let props = JigsawPuzzleProps {
            image_src: AttrValue::from("cat.jpg"),
            rows: 0,
            columns: DEFAULT_COLUMNS,
            on_solved: Callback::noop(),
            on_load_error: Callback::from(move |err| {
                *reported_cb.borrow_mut() = Some(err);
            }),
            seed: Some(1),
        };
        let _handle =
            yew::Renderer::<JigsawPuzzle>::with_root_and_props(root.clone(), props).render();
        TimeoutFuture::new(10).await;
        assert_eq!(
            reported.borrow().clone(),
            Some(PuzzleError::EmptyGrid {
                rows: 0,
                columns: DEFAULT_COLUMNS
            })
        );
        assert_eq!(
            root.query_selector_all(".jigsaw-puzzle__piece")
                .map(|list| list.length())
                .unwrap_or(0),
            0
        );
    }

    #[wasm_bindgen_test(async)]
    async fn loaded_image_renders_one_box_per_tile() {
        set_panic_hook();
        let root = test_root("jigsaw-loaded-root");
        root.set_attribute("style", "width: 400px;")
            .expect("size test root");
        let props = JigsawPuzzleProps {
            image_src: AttrValue::from(
                "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7",
            ),
            rows: 2,
            columns: 3,
            on_solved: Callback::noop(),
            on_load_error: Callback::noop(),
            seed: Some(7),
        };
        let _handle =
            yew::Renderer::<JigsawPuzzle>::with_root_and_props(root.clone(), props).render();
        let start = Date::now();
        let count = loop {
            let count = root
                .query_selector_all(".jigsaw-puzzle__piece")
                .map(|list| list.length())
                .unwrap_or(0);
            if count > 0 || Date::now() - start > 5000.0 {
                break count;
            }
            TimeoutFuture::new(10).await;
        };
        assert_eq!(count, 6);
    }

    const PIXEL_GIF: &str =
        "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

    fn mouse_event(kind: &str, client: Point) -> MouseEvent {
        let init = web_sys::MouseEventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        init.set_client_x(client.x.round() as i32);
        init.set_client_y(client.y.round() as i32);
        MouseEvent::new_with_mouse_event_init_dict(kind, &init).expect("create mouse event")
    }

    fn piece_at(root: &Element, position: usize) -> HtmlElement {
        root.query_selector(&format!("[data-position=\"{position}\"]"))
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            .expect("piece rendered")
    }

    fn style_px(element: &HtmlElement, property: &str) -> f64 {
        element
            .style()
            .get_property_value(property)
            .ok()
            .and_then(|value| value.trim_end_matches("px").parse::<f64>().ok())
            .expect("pixel style")
    }

    #[wasm_bindgen_test(async)]
    async fn dragging_pieces_onto_slots_solves_puzzle() {
        set_panic_hook();
        let host = test_root("jigsaw-drag-root");
        host.set_attribute("style", "width: 400px;")
            .expect("size test root");
        let solved_calls = Rc::new(std::cell::Cell::new(0u32));
        let solved_cb = solved_calls.clone();
        let props = JigsawPuzzleProps {
            image_src: AttrValue::from(PIXEL_GIF),
            rows: 2,
            columns: 2,
            on_solved: Callback::from(move |()| solved_cb.set(solved_cb.get() + 1)),
            on_load_error: Callback::noop(),
            seed: Some(11),
        };
        let _handle =
            yew::Renderer::<JigsawPuzzle>::with_root_and_props(host.clone(), props).render();
        let start = Date::now();
        loop {
            let count = host
                .query_selector_all(".jigsaw-puzzle__piece")
                .map(|list| list.length())
                .unwrap_or(0);
            if count == 4 {
                break;
            }
            assert!(Date::now() - start < 5000.0, "pieces not rendered after 5s");
            TimeoutFuture::new(10).await;
        }
        let puzzle = host
            .query_selector(".jigsaw-puzzle")
            .ok()
            .flatten()
            .expect("puzzle root rendered");
        let host_element = host.clone().dyn_into::<HtmlElement>().expect("host element");
        let grid = GridSpec::new(2, 2).unwrap();
        let layout = Size::new(400.0, 400.0);

        for position in 0..grid.tile_count() {
            let piece = piece_at(&host, position);
            let piece_rect = piece.get_bounding_client_rect();
            let puzzle_rect = puzzle.get_bounding_client_rect();
            let down = Point::new(
                (piece_rect.left() + 2.0).round(),
                (piece_rect.top() + 2.0).round(),
            );
            piece
                .dispatch_event(&mouse_event("mousedown", down))
                .expect("dispatch mousedown");
            assert!(piece.class_list().contains(PIECE_DRAGGING_CLASS));
            assert!(!host_element.class_list().contains(PIECE_DRAGGING_CLASS));

            let grab = Point::new(down.x - piece_rect.left(), down.y - piece_rect.top());
            let target = layout.scale(grid.target_fraction(position));
            let pointer = Point::new(
                puzzle_rect.left() + target.x + grab.x,
                puzzle_rect.top() + target.y + grab.y,
            );
            puzzle
                .dispatch_event(&mouse_event("mousemove", pointer))
                .expect("dispatch mousemove");
            assert!((style_px(&piece, "left") - target.x).abs() <= 1.0);
            assert!((style_px(&piece, "top") - target.y).abs() <= 1.0);
            assert_eq!(
                host_element.style().get_property_value("left").ok().as_deref(),
                Some("")
            );
            assert_eq!(solved_calls.get(), 0);

            puzzle
                .dispatch_event(&mouse_event("mouseup", pointer))
                .expect("dispatch mouseup");
            TimeoutFuture::new(10).await;
            let piece = piece_at(&host, position);
            assert!(!piece.class_list().contains(PIECE_DRAGGING_CLASS));
            assert!(piece.class_list().contains(jigsaw_puzzle_core::PIECE_SOLVED_CLASS));
        }

        assert_eq!(solved_calls.get(), 1);
        assert_eq!(
            host_element.style().get_property_value("left").ok().as_deref(),
            Some("")
        );
    }

    #[wasm_bindgen_test]
    fn piece_element_resolves_from_inner_target() {
        set_panic_hook();
        let document = web_sys::window()
            .and_then(|window| window.document())
            .expect("document available");
        let piece = document.create_element("div").expect("create piece");
        piece.set_class_name(PIECE_CLASS);
        let inner = document.create_element("span").expect("create inner");
        piece.append_child(&inner).expect("append inner");
        test_root("jigsaw-piece-lookup-root")
            .append_child(&piece)
            .expect("append piece");

        let found = Rc::new(RefCell::new(None::<HtmlElement>));
        let found_cb = found.clone();
        let _listener = EventListener::new(&piece, "mousedown", move |event| {
            *found_cb.borrow_mut() = piece_element(event);
        });
        inner
            .dispatch_event(&mouse_event("mousedown", Point::ORIGIN))
            .expect("dispatch mousedown");
        let found = found.borrow().clone().expect("piece resolved");
        assert_eq!(found.class_name(), PIECE_CLASS);
    }
}
