// ============================================================================
// LOGIN VIEW - Formulario de entrada de manager/admin
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{
    append_child, get_element_by_id, input_value, on_input, on_submit, set_text_content,
    ElementBuilder,
};
use crate::state::AppState;
use crate::viewmodels::auth_viewmodel;

pub fn render_login(state: &AppState) -> Result<Element, JsValue> {
    let screen = ElementBuilder::new("div")?.class("login-screen").build();
    let container = ElementBuilder::new("div")?.class("login-container").build();

    let header = ElementBuilder::new("div")?.class("login-header").build();
    let title = ElementBuilder::new("h1")?.text("Консоль согласий").build();
    let subtitle = ElementBuilder::new("p")?
        .text("Вход для менеджеров и администраторов")
        .build();
    append_child(&header, &title)?;
    append_child(&header, &subtitle)?;
    append_child(&container, &header)?;

    // Estado local del formulario (vive en los closures)
    let email = Rc::new(RefCell::new(String::new()));
    let password = Rc::new(RefCell::new(String::new()));

    let form = ElementBuilder::new("form")?.class("login-form").build();

    append_child(
        &form,
        &render_input("login-email", "E-mail", "text", email.clone())?,
    )?;
    append_child(
        &form,
        &render_input("login-password", "Пароль", "password", password.clone())?,
    )?;

    let error_box = ElementBuilder::new("div")?
        .id("login-error")?
        .class("form-error")
        .build();
    append_child(&form, &error_box)?;

    let submit = ElementBuilder::new("button")?
        .attr("type", "submit")?
        .class("btn-login")
        .text("Войти")
        .build();
    append_child(&form, &submit)?;

    {
        let state = state.clone();
        on_submit(&form, move |event| {
            event.prevent_default();

            let email_val = email.borrow().trim().to_string();
            let password_val = password.borrow().clone();
            if email_val.is_empty() || password_val.is_empty() {
                show_login_error("Заполните все поля");
                return;
            }

            show_login_error("");
            let state = state.clone();
            spawn_local(async move {
                if let Some(error) = auth_viewmodel::login(&state, &email_val, &password_val).await
                {
                    show_login_error(&error);
                }
            });
        })?;
    }

    append_child(&container, &form)?;
    append_child(&screen, &container)?;

    Ok(screen)
}

fn render_input(
    id: &str,
    label_text: &str,
    input_type: &str,
    value: Rc<RefCell<String>>,
) -> Result<Element, JsValue> {
    let group = ElementBuilder::new("div")?.class("form-group").build();

    let label = ElementBuilder::new("label")?
        .attr("for", id)?
        .text(label_text)
        .build();
    append_child(&group, &label)?;

    let input = ElementBuilder::new("input")?
        .attr("type", input_type)?
        .id(id)?
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

fn show_login_error(message: &str) {
    if let Some(error_box) = get_element_by_id("login-error") {
        set_text_content(&error_box, message);
    }
}
