// ============================================================================
// APP - Raíz de la aplicación: montaje y re-render
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, get_element_by_id, set_inner_html};
use crate::router;
use crate::state::AppState;
use crate::views::render_app;

/// Aplicación principal. El re-render es completo: se vacía el root y se
/// vuelve a montar la vista de la ruta actual.
pub struct App {
    state: AppState,
    root: Option<Element>,
}

impl App {
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id("app")
            .ok_or_else(|| JsValue::from_str("No #app element found"))?;

        let state = AppState::new();
        state.set_route(router::current_route());

        // Los cambios de estado re-renderizan en batch: un Timeout(0) junta
        // las notificaciones de un mismo tick en un solo render
        state.subscribe_to_changes(|| {
            gloo_timers::callback::Timeout::new(0, crate::rerender_app).forget();
        });

        Ok(Self {
            state,
            root: Some(root),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn render(&mut self) -> Result<(), JsValue> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| JsValue::from_str("App root missing"))?;

        set_inner_html(root, "");
        let view = render_app(&self.state)?;
        append_child(root, &view)?;

        Ok(())
    }
}
