// ============================================================================
// USERS VIEW - Administración de cuentas (sólo admin)
// ============================================================================

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{
    append_child, get_element_by_id, on_click, set_inner_html, set_text_content, ElementBuilder,
};
use crate::models::Account;
use crate::router::{self, Route};
use crate::services::accounts_service;
use crate::state::AppState;
use crate::viewmodels::auth_viewmodel;

const USERS_TBODY_ID: &str = "users-tbody";
const USERS_ERROR_ID: &str = "users-error";

pub fn render_users(state: &AppState) -> Result<Element, JsValue> {
    let page = ElementBuilder::new("div")?.class("users-page").build();

    let header = ElementBuilder::new("div")?.class("page-header").build();
    let title = ElementBuilder::new("h1")?.text("Пользователи").build();
    append_child(&header, &title)?;

    let create_btn = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-primary")
        .text("Создать пользователя")
        .build();
    {
        let state = state.clone();
        on_click(&create_btn, move |_| {
            let _ = router::navigate(&state, Route::CreateUser);
        })?;
    }
    append_child(&header, &create_btn)?;
    append_child(&page, &header)?;

    let error_box = ElementBuilder::new("div")?
        .id(USERS_ERROR_ID)?
        .class("form-error")
        .build();
    append_child(&page, &error_box)?;

    let table = ElementBuilder::new("table")?.class("users-table").build();
    let thead = ElementBuilder::new("thead")?.build();
    let head_row = ElementBuilder::new("tr")?.build();
    for heading in ["E-mail", "Роль", "Состояние", ""] {
        let th = ElementBuilder::new("th")?.text(heading).build();
        append_child(&head_row, &th)?;
    }
    append_child(&thead, &head_row)?;
    append_child(&table, &thead)?;

    let tbody = ElementBuilder::new("tbody")?.id(USERS_TBODY_ID)?.build();
    let loading = ElementBuilder::new("tr")?.build();
    let loading_cell = ElementBuilder::new("td")?
        .attr("colspan", "4")?
        .text("Загрузка...")
        .build();
    append_child(&loading, &loading_cell)?;
    append_child(&tbody, &loading)?;
    append_child(&table, &tbody)?;
    append_child(&page, &table)?;

    // Carga asíncrona de la lista, el tbody se llena al volver
    {
        let state = state.clone();
        spawn_local(async move {
            load_accounts(&state).await;
        });
    }

    Ok(page)
}

async fn load_accounts(state: &AppState) {
    let result = accounts_service::fetch_accounts_page(1, 100).await;
    if auth_viewmodel::handle_reauth(state, &result) {
        return;
    }

    let tbody = match get_element_by_id(USERS_TBODY_ID) {
        Some(tbody) => tbody,
        // La vista ya no está en pantalla
        None => return,
    };
    set_inner_html(&tbody, "");

    let detail = result.detail_or("Ошибка при загрузке пользователей");
    match result.data.filter(|_| result.ok) {
        Some(response) if response.ok => {
            for account in &response.accounts {
                if let Err(e) = append_account_row(&tbody, state, account) {
                    log::error!("❌ [USERS] Error renderizando fila: {:?}", e);
                }
            }
        }
        _ => show_users_error(&detail),
    }
}

fn append_account_row(tbody: &Element, state: &AppState, account: &Account) -> Result<(), JsValue> {
    let tr = ElementBuilder::new("tr")?.build();

    let email = ElementBuilder::new("td")?.text(&account.email).build();
    append_child(&tr, &email)?;

    let role_label = crate::models::Role::parse(&account.role)
        .map(|role| role.label())
        .unwrap_or("—");
    let role = ElementBuilder::new("td")?.text(role_label).build();
    append_child(&tr, &role)?;

    let state_cell = ElementBuilder::new("td")?.text(account.state.label()).build();
    append_child(&tr, &state_cell)?;

    let actions = ElementBuilder::new("td")?.build();
    let toggle = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-secondary")
        .text(match account.state {
            crate::models::AccountState::Enabled => "Отключить",
            crate::models::AccountState::Disabled => "Включить",
        })
        .build();
    {
        let state = state.clone();
        let account_id = account.id;
        let next_state = account.state.toggled();
        on_click(&toggle, move |_| {
            let state = state.clone();
            spawn_local(async move {
                let result =
                    accounts_service::update_account_state(account_id, next_state.as_wire()).await;
                if auth_viewmodel::handle_reauth(&state, &result) {
                    return;
                }
                if !result.ok {
                    show_users_error(&result.detail_or("Не удалось изменить состояние"));
                    return;
                }
                load_accounts(&state).await;
            });
        })?;
    }
    append_child(&actions, &toggle)?;
    append_child(&tr, &actions)?;

    append_child(tbody, &tr)?;
    Ok(())
}

fn show_users_error(message: &str) {
    if let Some(error_box) = get_element_by_id(USERS_ERROR_ID) {
        set_text_content(&error_box, message);
    }
}
