// ============================================================================
// CONSENT CONSOLE - SPA DE ADMINISTRACIÓN DE СОГЛАСИЯ (RUST PURO)
// ============================================================================
// Arquitectura MVVM estricta:
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: Estado + Lógica UI
// - Services: SOLO comunicación API
// - State: State Management con Rc<RefCell>
// - Models: Estructuras compartidas con backend
//
// La lógica de decisión (guard de rutas, plan de bootstrap, pipeline de
// filtrado) es Rust puro y se testea en host; el DOM y el fetch quedan
// detrás de target_arch = "wasm32".
// ============================================================================

mod config;
mod models;
mod router;
mod services;
mod state;
mod utils;
mod viewmodels;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod views;

#[cfg(target_arch = "wasm32")]
mod bootstrap {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;

    use crate::app::App;
    use crate::viewmodels::auth_viewmodel;

    // Instancia global de la app
    thread_local! {
        static APP: RefCell<Option<App>> = RefCell::new(None);
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        if crate::config::CONFIG.enable_logging {
            wasm_logger::init(wasm_logger::Config::default());
        }
        log::info!(
            "🚀 Consent Console ({}) iniciando",
            crate::config::CONFIG.environment
        );

        let mut app = App::new()?;

        // Verificación de sesión antes del primer render: la pantalla
        // inicial es "Загрузка..." salvo en las rutas de consentimiento
        auth_viewmodel::init_auth(app.state());

        app.render()?;
        APP.with(|cell| {
            *cell.borrow_mut() = Some(app);
        });

        // Botón atrás/adelante del navegador. Listener global, registrado
        // UNA sola vez aquí.
        if let Some(window) = web_sys::window() {
            let closure = Closure::wrap(Box::new(move |_event: web_sys::PopStateEvent| {
                APP.with(|cell| {
                    if let Some(ref app) = *cell.borrow() {
                        let route = crate::router::current_route();
                        log::info!("🔄 [MAIN] popstate → {}", route.path());
                        app.state().set_route(route);
                        auth_viewmodel::init_auth(app.state());
                    }
                });
                rerender_app();
            }) as Box<dyn FnMut(web_sys::PopStateEvent)>);

            window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Re-render completo de la app
    pub fn rerender_app() {
        APP.with(|cell| {
            if let Some(ref mut app) = *cell.borrow_mut() {
                if let Err(e) = app.render() {
                    log::error!("❌ [MAIN] Error re-renderizando: {:?}", e);
                }
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
pub use bootstrap::rerender_app;
