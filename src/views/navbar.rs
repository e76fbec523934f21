// ============================================================================
// NAVBAR - Barra de navegación de las páginas protegidas
// ============================================================================

use wasm_bindgen::JsValue;
use web_sys::Element;

use crate::dom::{append_child, on_click, ElementBuilder};
use crate::models::Role;
use crate::router::{self, Route};
use crate::state::AppState;
use crate::viewmodels::auth_viewmodel;

pub fn render_navbar(state: &AppState) -> Result<Element, JsValue> {
    let nav = ElementBuilder::new("nav")?.class("navbar").build();

    let brand = ElementBuilder::new("div")?
        .class("navbar-brand")
        .text("Консоль согласий")
        .build();
    append_child(&nav, &brand)?;

    let links = ElementBuilder::new("div")?.class("navbar-links").build();
    append_nav_link(&links, state, "Заявки", Route::Requests)?;
    append_nav_link(&links, state, "Шаблоны", Route::Templates)?;
    if state.session.role() == Some(Role::Admin) {
        append_nav_link(&links, state, "Пользователи", Route::Users)?;
    }
    append_child(&nav, &links)?;

    let session_box = ElementBuilder::new("div")?.class("navbar-session").build();
    let email = ElementBuilder::new("span")?
        .class("navbar-email")
        .text(&state.session.email().unwrap_or_default())
        .build();
    append_child(&session_box, &email)?;

    let logout_btn = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-logout")
        .text("Выйти")
        .build();
    {
        let state = state.clone();
        on_click(&logout_btn, move |_| {
            auth_viewmodel::logout(&state);
        })?;
    }
    append_child(&session_box, &logout_btn)?;
    append_child(&nav, &session_box)?;

    Ok(nav)
}

fn append_nav_link(
    links: &Element,
    state: &AppState,
    label: &str,
    route: Route,
) -> Result<(), JsValue> {
    let mut builder = ElementBuilder::new("a")?
        .class("navbar-link")
        .attr("href", &route.path())?
        .text(label);
    if state.current_route() == route {
        builder = builder.class("navbar-link active");
    }
    let link = builder.build();

    {
        let state = state.clone();
        on_click(&link, move |event| {
            event.prevent_default();
            let _ = router::navigate(&state, route.clone());
        })?;
    }

    append_child(links, &link)?;
    Ok(())
}
