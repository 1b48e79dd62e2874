//! WebAssembly entry point and the JS-facing event bridge.

use crate::{App, AppConfig, UiAction};
use kurbo::{Point, Vec2};
use peniko::Color;
use serde_json::{Value, json};
use siteboard_core::storage::LocalStorage;
use siteboard_core::{CardId, Key, KeyEvent, MouseButton, PointerEvent};
use siteboard_render::{DrawCommand, css_matrix};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

thread_local! {
    static APP: RefCell<Option<App<LocalStorage>>> = const { RefCell::new(None) };
}

fn with_app<R: Default>(f: impl FnOnce(&mut App<LocalStorage>) -> R) -> R {
    APP.with(|app| match app.borrow_mut().as_mut() {
        Some(app) => f(app),
        None => {
            log::warn!("SiteBoard used before start");
            R::default()
        }
    })
}

/// Initialize the WASM application.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to initialize logger: {}", e).into());
    }
    log::info!("Starting SiteBoard (WASM)");

    let storage = match LocalStorage::new() {
        Ok(storage) => storage,
        Err(e) => {
            log::error!("Board storage unavailable: {}", e);
            return;
        }
    };
    let app = App::new(storage, AppConfig::default());
    APP.with(|slot| *slot.borrow_mut() = Some(app));
}

#[wasm_bindgen]
pub fn pointer_down(x: f64, y: f64, button: i16) -> bool {
    with_app(|app| {
        app.pointer_event(PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::from_dom(button),
        })
    })
}

/// Pointer moves are observed on the window, so drags continue outside the
/// board element.
#[wasm_bindgen]
pub fn pointer_move(x: f64, y: f64) -> bool {
    with_app(|app| app.pointer_event(PointerEvent::Move { position: Point::new(x, y) }))
}

#[wasm_bindgen]
pub fn pointer_up(x: f64, y: f64, button: i16) -> bool {
    with_app(|app| {
        app.pointer_event(PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::from_dom(button),
        })
    })
}

#[wasm_bindgen]
pub fn wheel(x: f64, y: f64, delta_x: f64, delta_y: f64) -> bool {
    with_app(|app| {
        app.pointer_event(PointerEvent::Scroll {
            position: Point::new(x, y),
            delta: Vec2::new(delta_x, delta_y),
        })
    })
}

/// `key` is a DOM `KeyboardEvent.key` value.
#[wasm_bindgen]
pub fn key_down(key: &str) -> bool {
    with_app(|app| app.key_event(KeyEvent::Pressed(Key::from_name(key))))
}

/// Toolbar button by name (`zoomIn`, `zoomOut`, `resetView`, `toggleHelp`).
#[wasm_bindgen]
pub fn action(name: &str) -> bool {
    let Some(action) = UiAction::from_name(name) else {
        log::warn!("Unknown UI action: {}", name);
        return false;
    };
    with_app(|app| {
        app.apply_action(action);
        true
    })
}

#[wasm_bindgen]
pub fn resize(width: f64, height: f64, device_pixel_ratio: f64) {
    with_app(|app| app.resize(width, height, device_pixel_ratio));
}

#[wasm_bindgen]
pub fn card_input(id: u64, text: &str) -> bool {
    with_app(|app| app.card_input(CardId(id), text))
}

#[wasm_bindgen]
pub fn close_card(id: u64) -> bool {
    with_app(|app| app.close_card(CardId(id)))
}

#[wasm_bindgen]
pub fn delete_arrow(id: &str) -> bool {
    with_app(|app| {
        let found = app
            .board()
            .store()
            .arrows()
            .iter()
            .find(|arrow| arrow.id.as_str() == id)
            .map(|arrow| arrow.id.clone());
        match found {
            Some(id) => app.delete_arrow(&id),
            None => false,
        }
    })
}

/// Toolbar and status bar text as JSON.
#[wasm_bindgen]
pub fn ui_state() -> String {
    with_app(|app| {
        let ui = app.ui_state();
        json!({
            "zoom": ui.zoom_label(),
            "status": ui.status_text(),
            "help": ui.help_text(),
        })
        .to_string()
    })
}

/// Build a frame and return it as JSON: the background commands, the CSS
/// transform for the content layer, and the layer commands.
#[wasm_bindgen]
pub fn frame() -> String {
    with_app(|app| match app.render() {
        Ok(list) => json!({
            "background": list.background.iter().map(command_json).collect::<Vec<_>>(),
            "layerTransform": css_matrix(list.layer_transform),
            "layer": list.layer.iter().map(command_json).collect::<Vec<_>>(),
        })
        .to_string(),
        Err(e) => {
            log::error!("Render failed: {}", e);
            String::new()
        }
    })
}

fn command_json(command: &DrawCommand) -> Value {
    match command {
        DrawCommand::Clear(color) => json!({ "op": "clear", "color": to_css(*color) }),
        DrawCommand::Circle { center, radius, color } => json!({
            "op": "circle", "x": center.x, "y": center.y, "r": radius, "color": to_css(*color),
        }),
        DrawCommand::Line { line, width, color } => json!({
            "op": "line", "x0": line.p0.x, "y0": line.p0.y, "x1": line.p1.x, "y1": line.p1.y,
            "width": width, "color": to_css(*color),
        }),
        DrawCommand::Card {
            id,
            rect,
            kind,
            content,
            embed_url,
            focused,
        } => json!({
            "op": "card",
            "id": id.0,
            "x": rect.x0,
            "y": rect.y0,
            "w": rect.width(),
            "h": rect.height(),
            "kind": kind,
            "content": content,
            "url": embed_url,
            "focused": focused,
        }),
        DrawCommand::Handle { card, position, kind } => json!({
            "op": "handle",
            "card": card.0,
            "x": position.x,
            "y": position.y,
            "kind": format!("{:?}", kind),
        }),
        DrawCommand::Arrow {
            id,
            curve,
            head,
            width,
            color,
        } => json!({
            "op": "arrow",
            "id": id.as_str(),
            "path": format!(
                "M {} {} C {} {}, {} {}, {} {}",
                curve.p0.x,
                curve.p0.y,
                curve.p1.x,
                curve.p1.y,
                curve.p2.x,
                curve.p2.y,
                curve.p3.x,
                curve.p3.y
            ),
            "head": head.iter().map(|p| [p.x, p.y]).collect::<Vec<_>>(),
            "width": width,
            "color": to_css(*color),
        }),
        DrawCommand::DeleteButton { arrow, center } => json!({
            "op": "delete", "arrow": arrow.as_str(), "x": center.x, "y": center.y,
        }),
    }
}

/// CSS `rgba()` string for a color.
fn to_css(color: Color) -> String {
    let rgba = color.to_rgba8();
    format!("rgba({}, {}, {}, {})", rgba.r, rgba.g, rgba.b, rgba.a as f64 / 255.0)
}
