//! Browser adapter: renders boards into the host page and drives tiles with
//! pointer events. Only compiled for `wasm32`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, PointerEvent, window};

use crate::board::{Board, BoardMode, Cell, RenderPlan};
use crate::config::PuzzleConfig;
use crate::error::PuzzleError;
use crate::geometry::PixelCoordinate;
use crate::session::PuzzleSession;
use crate::slot::SlotId;
use crate::tile::{
    Bounds, DragCallbacks, DragOptions, DragProvider, DropOutcome, TileController, TileState,
    snap_adjustment,
};

const DESTINATION_WRAPPER: &[&str] = &["col-xs-5"];
const SOURCE_WRAPPER: &[&str] = &["col-xs-5", "col-xs-offset-2"];
const LOCKED_CLASS: &str = "puzzle-tile--locked";
const PLAY_FIELD_CLASS: &str = "puzzle--active";

fn wrapper_classes(mode: BoardMode) -> &'static [&'static str] {
    match mode {
        BoardMode::Destination => DESTINATION_WRAPPER,
        BoardMode::Source => SOURCE_WRAPPER,
    }
}

fn js_err(err: PuzzleError) -> JsValue {
    JsError::from(err).into()
}

fn px(value: f64) -> String {
    format!("{value}px")
}

fn bounds_of(element: &Element) -> Bounds {
    let rect = element.get_bounding_client_rect();
    Bounds::new(rect.left(), rect.top(), rect.width(), rect.height())
}

fn mount_point(doc: &Document, id: &str) -> Result<Element, JsValue> {
    doc.get_element_by_id(id).ok_or_else(|| {
        gloo::console::warn!("puzzle: missing mount point", id.to_owned());
        JsValue::from_str(&format!("missing mount point #{id}"))
    })
}

fn div_with_classes(doc: &Document, classes: &[impl AsRef<str>]) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = doc.create_element("div")?.dyn_into()?;
    for class in classes {
        el.class_list().add_1(class.as_ref())?;
    }
    Ok(el)
}

/// Builds DOM nodes from a board's render plan.
pub struct DomRenderer {
    document: Document,
}

impl DomRenderer {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn cell_element(&self, cell: &Cell, plan: &RenderPlan) -> Result<HtmlElement, JsValue> {
        let el = div_with_classes(&self.document, &["well", cell.slot().as_str()][..])?;
        let style = el.style();
        style.set_property("width", &px(plan.cell_size))?;
        style.set_property("height", &px(plan.cell_size))?;
        style.set_property("margin-bottom", &px(plan.gap))?;
        if let Cell::Tile(tile) = cell {
            self.style_tile(&el, tile)?;
        }
        Ok(el)
    }

    fn style_tile(&self, el: &HtmlElement, tile: &TileController) -> Result<(), JsValue> {
        let style = el.style();
        if let (Some(image), Some(pos)) = (tile.image(), tile.background_position()) {
            style.set_property("background-image", &image.css_url())?;
            style.set_property("background-position-x", &px(pos.x))?;
            style.set_property("background-position-y", &px(pos.y))?;
            style.set_property(
                "background-size",
                &format!("{} {}", px(image.pixel_width()), px(image.pixel_height())),
            )?;
        }
        style.set_property("position", "relative")?;
        style.set_property("touch-action", "none")?;
        style.set_property("cursor", "grab")?;
        Ok(())
    }

    /// Appends the board to `container` row by row and returns the element
    /// rendered for each slot.
    pub fn render(
        &self,
        board: &Board,
        plan: &RenderPlan,
        container: &Element,
    ) -> Result<HashMap<SlotId, HtmlElement>, JsValue> {
        let wrapper = div_with_classes(&self.document, &plan.wrapper_classes[..])?;
        let mut rendered = HashMap::new();
        for row in &plan.rows {
            let row_el = div_with_classes(&self.document, &["row"][..])?;
            for column in &row.columns {
                let column_el = div_with_classes(&self.document, &column.classes[..])?;
                let cell = board
                    .cell_at(column.column, column.row)
                    .ok_or_else(|| PuzzleError::invalid(format!("no cell at ({}, {})", column.column, column.row)))
                    .map_err(js_err)?;
                let cell_el = self.cell_element(cell, plan)?;
                column_el.append_child(&cell_el)?;
                row_el.append_child(&column_el)?;
                rendered.insert(cell.slot().clone(), cell_el);
            }
            wrapper.append_child(&row_el)?;
        }
        container.append_child(&wrapper)?;
        Ok(rendered)
    }
}

#[derive(Default)]
struct DragState {
    active: bool,
    disabled: bool,
    revert: bool,
    pointer_start: PixelCoordinate,
    translate_start: PixelCoordinate,
    translate: PixelCoordinate,
}

fn apply_translate(el: &HtmlElement, t: PixelCoordinate) {
    let _ = el
        .style()
        .set_property("transform", &format!("translate({}, {})", px(t.x), px(t.y)));
}

/// Drag provider on pointer events. Snap targets are resolved through an
/// explicit selector -> element map instead of a document query.
pub struct PointerDragProvider {
    targets: HashMap<String, HtmlElement>,
}

impl PointerDragProvider {
    pub fn new(destinations: &HashMap<SlotId, HtmlElement>) -> Self {
        let targets = destinations
            .iter()
            .map(|(slot, el)| (slot.selector(), el.clone()))
            .collect();
        Self { targets }
    }
}

impl DragProvider for PointerDragProvider {
    type Element = HtmlElement;
    type Error = JsValue;

    fn make_draggable(
        &self,
        element: &HtmlElement,
        options: DragOptions,
        callbacks: DragCallbacks,
    ) -> Result<(), JsValue> {
        let target = self
            .targets
            .get(&options.snap_to)
            .cloned()
            .ok_or_else(|| JsValue::from_str(&format!("no snap target {}", options.snap_to)))?;
        let state = Rc::new(RefCell::new(DragState {
            revert: options.revert_on_failed_drop,
            ..DragState::default()
        }));
        let callbacks = Rc::new(RefCell::new(callbacks));

        // pointerdown: start a drag unless the tile refuses
        {
            let el = element.clone();
            let state = state.clone();
            let callbacks = callbacks.clone();
            let closure = Closure::wrap(Box::new(move |evt: PointerEvent| {
                let mut st = state.borrow_mut();
                if st.disabled || !(callbacks.borrow_mut().on_start)() {
                    return;
                }
                evt.prevent_default();
                let _ = el.set_pointer_capture(evt.pointer_id());
                st.active = true;
                st.pointer_start = PixelCoordinate::new(f64::from(evt.client_x()), f64::from(evt.client_y()));
                st.translate_start = st.translate;
                let _ = el.style().set_property("z-index", "10");
            }) as Box<dyn FnMut(_)>);
            element.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // pointermove: follow the pointer, snap, report positions
        {
            let el = element.clone();
            let state = state.clone();
            let callbacks = callbacks.clone();
            let snap_mode = options.snap_mode;
            let radius = options.snap_radius;
            let closure = Closure::wrap(Box::new(move |evt: PointerEvent| {
                let mut st = state.borrow_mut();
                if !st.active {
                    return;
                }
                let pointer = PixelCoordinate::new(f64::from(evt.client_x()), f64::from(evt.client_y()));
                st.translate = PixelCoordinate::new(
                    st.translate_start.x + pointer.x - st.pointer_start.x,
                    st.translate_start.y + pointer.y - st.pointer_start.y,
                );
                apply_translate(&el, st.translate);

                let dragged = bounds_of(&el);
                let goal = bounds_of(&target);
                let adj = snap_adjustment(snap_mode, dragged, goal, radius);
                if adj != PixelCoordinate::ORIGIN {
                    st.translate = PixelCoordinate::new(st.translate.x + adj.x, st.translate.y + adj.y);
                    apply_translate(&el, st.translate);
                }
                let position = PixelCoordinate::new(dragged.left + adj.x, dragged.top + adj.y);

                if (callbacks.borrow_mut().on_drag)(position, goal.origin()) {
                    st.active = false;
                    st.disabled = true;
                    st.revert = false;
                    let _ = el.release_pointer_capture(evt.pointer_id());
                    let _ = el.class_list().add_1(LOCKED_CLASS);
                    let style = el.style();
                    let _ = style.set_property("cursor", "default");
                    let _ = style.set_property("z-index", "auto");
                }
            }) as Box<dyn FnMut(_)>);
            element.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // pointerup / pointercancel: drop, reverting when still allowed
        for event in ["pointerup", "pointercancel"] {
            let el = element.clone();
            let state = state.clone();
            let callbacks = callbacks.clone();
            let closure = Closure::wrap(Box::new(move |evt: PointerEvent| {
                let mut st = state.borrow_mut();
                if !st.active {
                    return;
                }
                st.active = false;
                let _ = el.release_pointer_capture(evt.pointer_id());
                let _ = el.style().set_property("z-index", "auto");
                let outcome = (callbacks.borrow_mut().on_stop)();
                if outcome == DropOutcome::Revert && st.revert {
                    st.translate = st.translate_start;
                    apply_translate(&el, st.translate);
                }
            }) as Box<dyn FnMut(_)>);
            element.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }
}

/// Keeps a running puzzle alive on the JS side.
#[wasm_bindgen]
pub struct PuzzleHandle {
    session: Rc<RefCell<PuzzleSession>>,
}

#[wasm_bindgen]
impl PuzzleHandle {
    pub fn locked_count(&self) -> usize {
        self.session.borrow().locked_count()
    }

    pub fn tile_count(&self) -> usize {
        self.session.borrow().tile_count()
    }

    pub fn is_solved(&self) -> bool {
        self.session.borrow().is_solved()
    }
}

fn tile_callbacks(session: &Rc<RefCell<PuzzleSession>>, slot: SlotId) -> DragCallbacks {
    let on_start = {
        let session = session.clone();
        let slot = slot.clone();
        Box::new(move || match session.borrow_mut().begin_drag(&slot) {
            Ok(started) => started,
            Err(err) => {
                gloo::console::warn!("puzzle: drag start failed", err.to_string());
                false
            }
        }) as Box<dyn FnMut() -> bool>
    };
    let on_drag = {
        let session = session.clone();
        let slot = slot.clone();
        Box::new(move |tile: PixelCoordinate, target: PixelCoordinate| {
            let mut s = session.borrow_mut();
            match s.drag(&slot, tile, target) {
                Ok(TileState::Locked) => {
                    if s.is_solved() {
                        gloo::console::log!("puzzle: solved");
                    } else {
                        let destination = s.destination_of(&slot).map(|pos| pos.to_string()).unwrap_or_default();
                        gloo::console::log!("puzzle: locked", slot.to_string(), destination, s.locked_count());
                    }
                    true
                }
                Ok(_) => false,
                Err(err) => {
                    gloo::console::warn!("puzzle: drag failed", err.to_string());
                    false
                }
            }
        }) as Box<dyn FnMut(PixelCoordinate, PixelCoordinate) -> bool>
    };
    let on_stop = {
        let session = session.clone();
        Box::new(move || match session.borrow_mut().end_drag(&slot) {
            Ok(outcome) => outcome,
            Err(err) => {
                gloo::console::warn!("puzzle: drop failed", err.to_string());
                DropOutcome::Revert
            }
        }) as Box<dyn FnMut() -> DropOutcome>
    };
    DragCallbacks {
        on_start,
        on_drag,
        on_stop,
    }
}

/// Renders both boards of `session` into the host page and wires the tiles.
pub fn mount(session: PuzzleSession, doc: &Document) -> Result<PuzzleHandle, JsValue> {
    let config = session.config().clone();
    let source_container = mount_point(doc, &config.source_container)?;
    let destination_container = mount_point(doc, &config.destination_container)?;
    let play_field = mount_point(doc, &config.play_field)?;

    let renderer = DomRenderer::new(doc.clone());
    let render = |board: &Board, container: &Element| {
        renderer.render(board, &board.render_plan(wrapper_classes(board.mode())), container)
    };
    let destinations = render(session.destination(), &destination_container)?;
    let tiles = render(session.source(), &source_container)?;
    play_field.class_list().add_1(PLAY_FIELD_CLASS)?;

    let provider = PointerDragProvider::new(&destinations);
    let options: Vec<(SlotId, DragOptions)> = session
        .source()
        .tiles()
        .map(|(_, tile)| (tile.slot().clone(), tile.drag_options(config.snap_radius)))
        .collect();
    let session = Rc::new(RefCell::new(session));
    for (slot, opts) in options {
        let el = tiles
            .get(&slot)
            .ok_or_else(|| PuzzleError::invalid(format!("tile {slot} was not rendered")))
            .map_err(js_err)?;
        provider.make_draggable(el, opts, tile_callbacks(&session, slot))?;
    }
    gloo::console::log!("puzzle: mounted", session.borrow().tile_count());
    Ok(PuzzleHandle { session })
}

/// Entry point for the host page. `config` may be `undefined` for the
/// reference layout, or a camelCase object overriding any field.
#[wasm_bindgen]
pub fn start_puzzle(config: JsValue) -> Result<PuzzleHandle, JsValue> {
    let config: PuzzleConfig = if config.is_undefined() || config.is_null() {
        PuzzleConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let session = PuzzleSession::from_config(config).map_err(js_err)?;
    mount(session, &doc)
}
