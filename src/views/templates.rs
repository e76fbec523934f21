// ============================================================================
// TEMPLATES VIEW - Plantillas de solicitud de consentimiento del manager
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{
    append_child, get_element_by_id, input_value, on_click, on_input, on_submit, set_inner_html,
    set_text_content, ElementBuilder,
};
use crate::models::TemplateRecord;
use crate::services::templates_service;
use crate::state::AppState;
use crate::viewmodels::auth_viewmodel;

const LIST_ID: &str = "templates-list";
const ERROR_ID: &str = "templates-error";

/// Borrador del formulario. editing_id distingue alta de edición.
struct TemplateDraft {
    editing_id: Option<u64>,
    name: String,
    subject: String,
    content: String,
}

impl TemplateDraft {
    fn empty() -> Self {
        Self {
            editing_id: None,
            name: String::new(),
            subject: String::new(),
            content: String::new(),
        }
    }
}

pub fn render_templates(state: &AppState) -> Result<Element, JsValue> {
    let page = ElementBuilder::new("div")?.class("templates-page").build();
    let title = ElementBuilder::new("h1")?.text("Шаблоны").build();
    append_child(&page, &title)?;

    let error_box = ElementBuilder::new("div")?
        .id(ERROR_ID)?
        .class("form-error")
        .build();
    append_child(&page, &error_box)?;

    let draft = Rc::new(RefCell::new(TemplateDraft::empty()));

    append_child(&page, &render_form(state, draft.clone())?)?;

    let list = ElementBuilder::new("div")?.id(LIST_ID)?.class("templates-list").build();
    let loading = ElementBuilder::new("p")?.text("Загрузка...").build();
    append_child(&list, &loading)?;
    append_child(&page, &list)?;

    {
        let state = state.clone();
        let draft = draft.clone();
        spawn_local(async move {
            load_templates(&state, &draft).await;
        });
    }

    Ok(page)
}

async fn load_templates(state: &AppState, draft: &Rc<RefCell<TemplateDraft>>) {
    let result = templates_service::fetch_templates_page(1, 100).await;
    if auth_viewmodel::handle_reauth(state, &result) {
        return;
    }

    let list = match get_element_by_id(LIST_ID) {
        Some(list) => list,
        None => return,
    };
    set_inner_html(&list, "");

    let detail = result.detail_or("Ошибка при загрузке шаблонов");
    match result.data.filter(|_| result.ok) {
        Some(response) if response.ok => {
            if response.templates.is_empty() {
                if let Ok(empty) = ElementBuilder::new("p") {
                    let empty = empty.text("Шаблонов пока нет").build();
                    let _ = append_child(&list, &empty);
                }
                return;
            }
            for template in &response.templates {
                if let Err(e) = append_template_card(&list, state, draft, template) {
                    log::error!("❌ [TEMPLATES] Error renderizando tarjeta: {:?}", e);
                }
            }
        }
        _ => show_templates_error(&detail),
    }
}

fn append_template_card(
    list: &Element,
    state: &AppState,
    draft: &Rc<RefCell<TemplateDraft>>,
    template: &TemplateRecord,
) -> Result<(), JsValue> {
    let card = ElementBuilder::new("div")?.class("template-card").build();

    let name = ElementBuilder::new("h3")?.text(&template.name).build();
    append_child(&card, &name)?;
    let subject = ElementBuilder::new("p")?
        .class("template-subject")
        .text(&template.subject)
        .build();
    append_child(&card, &subject)?;

    let actions = ElementBuilder::new("div")?.class("template-actions").build();

    let edit = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-secondary")
        .text("Редактировать")
        .build();
    {
        let draft = draft.clone();
        let template = template.clone();
        on_click(&edit, move |_| {
            *draft.borrow_mut() = TemplateDraft {
                editing_id: Some(template.id),
                name: template.name.clone(),
                subject: template.subject.clone(),
                content: template.content.clone(),
            };
            sync_form_inputs(&draft.borrow());
        })?;
    }
    append_child(&actions, &edit)?;

    let delete = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-danger")
        .text("Удалить")
        .build();
    {
        let state = state.clone();
        let draft = draft.clone();
        let template_id = template.id;
        on_click(&delete, move |_| {
            let state = state.clone();
            let draft = draft.clone();
            spawn_local(async move {
                let result = templates_service::delete_template(template_id).await;
                if auth_viewmodel::handle_reauth(&state, &result) {
                    return;
                }
                if !result.ok {
                    show_templates_error(&result.detail_or("Не удалось удалить шаблон"));
                    return;
                }
                load_templates(&state, &draft).await;
            });
        })?;
    }
    append_child(&actions, &delete)?;

    append_child(&card, &actions)?;
    append_child(list, &card)?;
    Ok(())
}

fn render_form(state: &AppState, draft: Rc<RefCell<TemplateDraft>>) -> Result<Element, JsValue> {
    let form = ElementBuilder::new("form")?.class("template-form").build();

    let name = text_input("template-name", "Название", {
        let draft = draft.clone();
        move |value| draft.borrow_mut().name = value
    })?;
    append_child(&form, &name)?;

    let subject = text_input("template-subject", "Тема письма", {
        let draft = draft.clone();
        move |value| draft.borrow_mut().subject = value
    })?;
    append_child(&form, &subject)?;

    let content_group = ElementBuilder::new("div")?.class("form-group").build();
    let content_label = ElementBuilder::new("label")?.text("Текст").build();
    append_child(&content_group, &content_label)?;
    let content = ElementBuilder::new("textarea")?
        .id("template-content")?
        .class("form-input")
        .build();
    {
        let draft = draft.clone();
        on_input(&content, move |event| {
            if let Some(value) = input_value(&event) {
                draft.borrow_mut().content = value;
            }
        })?;
    }
    append_child(&content_group, &content)?;
    append_child(&form, &content_group)?;

    let submit = ElementBuilder::new("button")?
        .attr("type", "submit")?
        .class("btn-primary")
        .text("Сохранить")
        .build();
    append_child(&form, &submit)?;

    {
        let state = state.clone();
        on_submit(&form, move |event| {
            event.prevent_default();

            let (editing_id, name, subject, content) = {
                let draft = draft.borrow();
                (
                    draft.editing_id,
                    draft.name.trim().to_string(),
                    draft.subject.trim().to_string(),
                    draft.content.clone(),
                )
            };
            if name.is_empty() || subject.is_empty() || content.is_empty() {
                show_templates_error("Заполните все поля шаблона");
                return;
            }

            show_templates_error("");
            let state = state.clone();
            let draft = draft.clone();
            spawn_local(async move {
                let result = match editing_id {
                    Some(id) => {
                        templates_service::update_template(id, &name, &subject, &content).await
                    }
                    None => templates_service::create_template(&name, &subject, &content).await,
                };
                if auth_viewmodel::handle_reauth(&state, &result) {
                    return;
                }
                if !result.ok {
                    show_templates_error(&result.detail_or("Не удалось сохранить шаблон"));
                    return;
                }
                *draft.borrow_mut() = TemplateDraft::empty();
                sync_form_inputs(&draft.borrow());
                load_templates(&state, &draft).await;
            });
        })?;
    }

    Ok(form)
}

fn text_input<F>(id: &str, label_text: &str, handler: F) -> Result<Element, JsValue>
where
    F: Fn(String) + 'static,
{
    let group = ElementBuilder::new("div")?.class("form-group").build();
    let label = ElementBuilder::new("label")?
        .attr("for", id)?
        .text(label_text)
        .build();
    append_child(&group, &label)?;

    let input = ElementBuilder::new("input")?
        .attr("type", "text")?
        .id(id)?
        .class("form-input")
        .build();
    on_input(&input, move |event| {
        if let Some(value) = input_value(&event) {
            handler(value);
        }
    })?;
    append_child(&group, &input)?;
    Ok(group)
}

/// Volcar el borrador a los inputs (al entrar en modo edición o al limpiar)
fn sync_form_inputs(draft: &TemplateDraft) {
    use wasm_bindgen::JsCast;

    if let Some(input) = get_element_by_id("template-name") {
        if let Some(input) = input.dyn_ref::<web_sys::HtmlInputElement>() {
            input.set_value(&draft.name);
        }
    }
    if let Some(input) = get_element_by_id("template-subject") {
        if let Some(input) = input.dyn_ref::<web_sys::HtmlInputElement>() {
            input.set_value(&draft.subject);
        }
    }
    if let Some(area) = get_element_by_id("template-content") {
        if let Some(area) = area.dyn_ref::<web_sys::HtmlTextAreaElement>() {
            area.set_value(&draft.content);
        }
    }
}

fn show_templates_error(message: &str) {
    if let Some(error_box) = get_element_by_id(ERROR_ID) {
        set_text_content(&error_box, message);
    }
}
