// ============================================================================
// APP VIEW - Render raíz: guard de rutas + página actual
// ============================================================================

use wasm_bindgen::JsValue;
use web_sys::Element;

use crate::dom::{append_child, ElementBuilder};
use crate::router::{self, Route, RouteDecision};
use crate::state::AppState;
use crate::views;

/// Renderizar la app completa según la ruta y la sesión actuales.
/// Los redirects del guard usan replace: el botón atrás nunca vuelve a
/// una ruta prohibida.
pub fn render_app(state: &AppState) -> Result<Element, JsValue> {
    let route = state.current_route();

    // Ruta desconocida: a login, sin dejar rastro en el historial
    if route == Route::NotFound {
        router::replace(state, Route::Login)?;
        return render_app(state);
    }

    // Flujo de consentimiento: se sirve sin mirar la sesión
    let requirement = match route.requirement() {
        None => return render_page(state, &route),
        Some(requirement) => requirement,
    };

    // Una sesión que dice estar autenticada sin identidad no pasa del guard
    state.session.enforce_invariant(None);

    let decision = router::decide(
        state.session.is_auth_checked(),
        state.session.is_authenticated(),
        state.session.role(),
        requirement,
    );

    match decision {
        RouteDecision::Loading => render_loading(),
        RouteDecision::Render => render_page(state, &route),
        RouteDecision::RedirectLogin => {
            router::replace(state, Route::Login)?;
            render_page(state, &Route::Login)
        }
        RouteDecision::RedirectHome => {
            router::replace(state, Route::Requests)?;
            render_page(state, &Route::Requests)
        }
    }
}

fn render_page(state: &AppState, route: &Route) -> Result<Element, JsValue> {
    let page = match route {
        Route::Login => views::render_login(state)?,
        Route::Requests => views::render_requests(state)?,
        Route::RequestInfo(id) => views::render_request_info(state, *id)?,
        Route::Users => views::render_users(state)?,
        Route::CreateUser => views::render_create_user(state)?,
        Route::Templates => views::render_templates(state)?,
        Route::Registration => views::render_registration(state)?,
        Route::Consent => views::render_consent(state)?,
        Route::ConsentSuccess => views::render_consent_success()?,
        Route::ConsentError => views::render_consent_error()?,
        Route::NotFound => views::render_login(state)?,
    };

    // Las páginas protegidas llevan navbar
    if state.session.is_authenticated() && route.requirement().is_some() {
        let shell = ElementBuilder::new("div")?.class("app-shell").build();
        let navbar = views::render_navbar(state)?;
        append_child(&shell, &navbar)?;
        append_child(&shell, &page)?;
        return Ok(shell);
    }

    Ok(page)
}

/// Pantalla de carga mientras la verificación de sesión sigue en vuelo
fn render_loading() -> Result<Element, JsValue> {
    let screen = ElementBuilder::new("div")?.class("loading-screen").build();
    let message = ElementBuilder::new("p")?
        .class("loading-text")
        .text("Загрузка...")
        .build();
    append_child(&screen, &message)?;
    Ok(screen)
}
