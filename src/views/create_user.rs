// ============================================================================
// CREATE USER VIEW - Alta de cuentas de manager/admin
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{
    append_child, get_element_by_id, input_value, on_change, on_input, on_submit,
    set_text_content, ElementBuilder,
};
use crate::models::Role;
use crate::router::{self, Route};
use crate::services::accounts_service;
use crate::state::AppState;
use crate::viewmodels::auth_viewmodel;

pub fn render_create_user(state: &AppState) -> Result<Element, JsValue> {
    let page = ElementBuilder::new("div")?.class("create-user-page").build();
    let title = ElementBuilder::new("h1")?.text("Новый пользователь").build();
    append_child(&page, &title)?;

    let email = Rc::new(RefCell::new(String::new()));
    let password = Rc::new(RefCell::new(String::new()));
    let role = Rc::new(RefCell::new(Role::Manager.as_wire().to_string()));

    let form = ElementBuilder::new("form")?.class("create-user-form").build();

    append_child(&form, &render_field("E-mail", "text", email.clone())?)?;
    append_child(&form, &render_field("Пароль", "password", password.clone())?)?;

    // Selector de rol
    let group = ElementBuilder::new("div")?.class("form-group").build();
    let label = ElementBuilder::new("label")?.text("Роль").build();
    append_child(&group, &label)?;
    let select = ElementBuilder::new("select")?.class("form-input").build();
    for candidate in [Role::Manager, Role::Admin] {
        let option = ElementBuilder::new("option")?
            .attr("value", candidate.as_wire())?
            .text(candidate.label())
            .build();
        append_child(&select, &option)?;
    }
    {
        let role = role.clone();
        on_change(&select, move |event| {
            if let Some(value) = input_value(&event) {
                *role.borrow_mut() = value;
            }
        })?;
    }
    append_child(&group, &select)?;
    append_child(&form, &group)?;

    let error_box = ElementBuilder::new("div")?
        .id("create-user-error")?
        .class("form-error")
        .build();
    append_child(&form, &error_box)?;

    let submit = ElementBuilder::new("button")?
        .attr("type", "submit")?
        .class("btn-primary")
        .text("Создать")
        .build();
    append_child(&form, &submit)?;

    {
        let state = state.clone();
        on_submit(&form, move |event| {
            event.prevent_default();

            let email_val = email.borrow().trim().to_string();
            let password_val = password.borrow().clone();
            let role_val = role.borrow().clone();
            if email_val.is_empty() || password_val.is_empty() {
                show_form_error("Заполните все поля");
                return;
            }

            show_form_error("");
            let state = state.clone();
            spawn_local(async move {
                let result =
                    accounts_service::create_account(&email_val, &password_val, &role_val).await;
                if auth_viewmodel::handle_reauth(&state, &result) {
                    return;
                }

                let accepted = result.ok && result.data.as_ref().map(|r| r.ok).unwrap_or(false);
                if accepted {
                    log::info!("✅ [USERS] Cuenta creada: {}", email_val);
                    let _ = router::navigate(&state, Route::Users);
                    return;
                }

                // Los errores de validación por campo van antes que el detail
                let validation = result
                    .data
                    .as_ref()
                    .and_then(|r| r.validation_errors.as_ref())
                    .and_then(|errors| errors.first())
                    .map(|error| format!("{}: {}", error.field, error.detail));
                match validation {
                    Some(message) => show_form_error(&message),
                    None => show_form_error(&result.detail_or("Не удалось создать пользователя")),
                }
            });
        })?;
    }

    append_child(&page, &form)?;
    Ok(page)
}

fn render_field(
    label_text: &str,
    input_type: &str,
    value: Rc<RefCell<String>>,
) -> Result<Element, JsValue> {
    let group = ElementBuilder::new("div")?.class("form-group").build();
    let label = ElementBuilder::new("label")?.text(label_text).build();
    append_child(&group, &label)?;

    let input = ElementBuilder::new("input")?
        .attr("type", input_type)?
        .class("form-input")
        .build();
    on_input(&input, move |event| {
        if let Some(current) = input_value(&event) {
            *value.borrow_mut() = current;
        }
    })?;
    append_child(&group, &input)?;
    Ok(group)
}

fn show_form_error(message: &str) {
    if let Some(error_box) = get_element_by_id("create-user-error") {
        set_text_content(&error_box, message);
    }
}
