// ============================================================================
// REQUESTS VIEW - Lista paginada de заявки con búsqueda, filtros y orden
// ============================================================================
// La búsqueda y los filtros re-renderizan SOLO el tbody: así el input de
// búsqueda conserva el foco mientras se escribe. El re-render completo
// queda para los cambios de página y los fetches.
// ============================================================================

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{
    add_class, append_child, get_element_by_id, input_checked, input_value, on_change, on_click,
    on_input, remove_class, set_inner_html, set_text_content, ElementBuilder,
};
use crate::models::ClaimStatus;
use crate::router::{self, Route};
use crate::services::templates_service;
use crate::state::{AppState, SortOrder};
use crate::viewmodels::claims_viewmodel::{self, parse_claim_date};

const TBODY_ID: &str = "claims-tbody";
const DIALOG_ID: &str = "issue-dialog";

pub fn render_requests(state: &AppState) -> Result<Element, JsValue> {
    // Primer render de la página: disparar la carga inicial
    if !state.claims.fetch_started() {
        let state_clone = state.clone();
        spawn_local(async move {
            claims_viewmodel::load_page(&state_clone).await;
        });
    }

    let page = ElementBuilder::new("div")?.class("requests-page").build();

    // Header con título y botón de emisión
    let header = ElementBuilder::new("div")?.class("page-header").build();
    let title = ElementBuilder::new("h1")?.text("Заявки").build();
    append_child(&header, &title)?;

    let issue_btn = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-primary")
        .text("Создать заявку")
        .build();
    on_click(&issue_btn, move |_| {
        if let Some(dialog) = get_element_by_id(DIALOG_ID) {
            let _ = add_class(&dialog, "show");
        }
    })?;
    append_child(&header, &issue_btn)?;
    append_child(&page, &header)?;

    // Banner de error (las filas previas se conservan debajo)
    if let Some(error) = state.claims.error() {
        let banner = ElementBuilder::new("div")?
            .class("error-banner")
            .text(&error)
            .build();
        append_child(&page, &banner)?;
    }

    append_child(&page, &render_toolbar(state)?)?;
    append_child(&page, &render_table(state)?)?;
    append_child(&page, &render_pagination(state)?)?;
    append_child(&page, &render_issue_dialog(state)?)?;

    Ok(page)
}

// ----------------------------------------------------------------------------
// Toolbar: búsqueda, orden y panel de filtros
// ----------------------------------------------------------------------------

fn render_toolbar(state: &AppState) -> Result<Element, JsValue> {
    let toolbar = ElementBuilder::new("div")?.class("requests-toolbar").build();

    // Búsqueda por email, aplicada al teclear
    let search = ElementBuilder::new("input")?
        .attr("type", "text")?
        .attr("placeholder", "Поиск по e-mail")?
        .attr("value", &state.query.snapshot().search)?
        .class("search-input")
        .build();
    {
        let state = state.clone();
        on_input(&search, move |event| {
            if let Some(value) = input_value(&event) {
                state.query.set_search(value);
                let _ = refresh_rows(&state);
            }
        })?;
    }
    append_child(&toolbar, &search)?;

    // Orden
    let sort = ElementBuilder::new("select")?.class("sort-select").build();
    for (value, label) in [
        ("", "Без сортировки"),
        ("newest", "Сначала новые"),
        ("oldest", "Сначала старые"),
        ("status", "По статусу"),
    ] {
        let option = ElementBuilder::new("option")?
            .attr("value", value)?
            .text(label)
            .build();
        append_child(&sort, &option)?;
    }
    {
        let state = state.clone();
        on_change(&sort, move |event| {
            if let Some(value) = input_value(&event) {
                state.query.set_sort(SortOrder::parse(&value));
                let _ = refresh_rows(&state);
            }
        })?;
    }
    append_child(&toolbar, &sort)?;

    append_child(&toolbar, &render_filter_panel(state)?)?;

    Ok(toolbar)
}

fn render_filter_panel(state: &AppState) -> Result<Element, JsValue> {
    let panel = ElementBuilder::new("div")?.class("filter-panel").build();
    let view = state.query.snapshot();

    // Eje visto/no visto
    append_checkbox(&panel, "Просмотренные", view.filters.viewed, {
        let state = state.clone();
        move |checked| state.query.set_viewed(checked)
    })?;
    append_checkbox(&panel, "Непросмотренные", view.filters.not_viewed, {
        let state = state.clone();
        move |checked| state.query.set_not_viewed(checked)
    })?;

    // Estados: una opción por clave de filtro (QUEUED no aparece suelto)
    for status in [
        ClaimStatus::Waiting,
        ClaimStatus::Consent,
        ClaimStatus::Refused,
        ClaimStatus::Timeout,
    ] {
        append_checkbox(&panel, status.label(), state.query.has_status(status), {
            let state = state.clone();
            move |_| state.query.toggle_status(status)
        })?;
    }

    // Rango de fechas
    let date_from = ElementBuilder::new("input")?
        .attr("type", "text")?
        .attr("placeholder", "С (ДД.ММ.ГГГГ)")?
        .attr("value", &view.filters.date_from)?
        .class("date-input")
        .build();
    {
        let state = state.clone();
        on_input(&date_from, move |event| {
            if let Some(value) = input_value(&event) {
                state.query.set_date_from(value);
            }
        })?;
    }
    append_child(&panel, &date_from)?;

    let date_to = ElementBuilder::new("input")?
        .attr("type", "text")?
        .attr("placeholder", "По (ДД.ММ.ГГГГ)")?
        .attr("value", &view.filters.date_to)?
        .class("date-input")
        .build();
    {
        let state = state.clone();
        on_input(&date_to, move |event| {
            if let Some(value) = input_value(&event) {
                state.query.set_date_to(value);
            }
        })?;
    }
    append_child(&panel, &date_to)?;

    let apply = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-apply")
        .text("Применить")
        .build();
    {
        let state = state.clone();
        on_click(&apply, move |_| {
            let _ = refresh_rows(&state);
        })?;
    }
    append_child(&panel, &apply)?;

    Ok(panel)
}

fn append_checkbox<F>(
    panel: &Element,
    label_text: &str,
    checked: bool,
    handler: F,
) -> Result<(), JsValue>
where
    F: Fn(bool) + 'static,
{
    let label = ElementBuilder::new("label")?.class("filter-option").build();
    let checkbox = ElementBuilder::new("input")?.attr("type", "checkbox")?.build();
    if checked {
        checkbox.set_attribute("checked", "")?;
    }
    on_change(&checkbox, move |event| {
        if let Some(checked) = input_checked(&event) {
            handler(checked);
        }
    })?;
    append_child(&label, &checkbox)?;
    let text = ElementBuilder::new("span")?.text(label_text).build();
    append_child(&label, &text)?;
    append_child(panel, &label)?;
    Ok(())
}

// ----------------------------------------------------------------------------
// Tabla
// ----------------------------------------------------------------------------

fn render_table(state: &AppState) -> Result<Element, JsValue> {
    let table = ElementBuilder::new("table")?.class("claims-table").build();

    let thead = ElementBuilder::new("thead")?.build();
    let head_row = ElementBuilder::new("tr")?.build();
    for heading in ["Дата", "E-mail кандидата", "Статус"] {
        let th = ElementBuilder::new("th")?.text(heading).build();
        append_child(&head_row, &th)?;
    }
    append_child(&thead, &head_row)?;
    append_child(&table, &thead)?;

    let tbody = ElementBuilder::new("tbody")?.id(TBODY_ID)?.build();
    fill_rows(&tbody, state)?;
    append_child(&table, &tbody)?;

    Ok(table)
}

/// Re-render dirigido del tbody: el resto de la página (y el foco del
/// input de búsqueda) queda intacto.
fn refresh_rows(state: &AppState) -> Result<(), JsValue> {
    if let Some(tbody) = get_element_by_id(TBODY_ID) {
        fill_rows(&tbody, state)?;
    }
    Ok(())
}

fn fill_rows(tbody: &Element, state: &AppState) -> Result<(), JsValue> {
    set_inner_html(tbody, "");

    if state.claims.is_loading() {
        append_message_row(tbody, "Загрузка...")?;
        return Ok(());
    }

    let rows = state.claims.rows();
    let visible = claims_viewmodel::apply_local_view(&rows, &state.query.snapshot());

    if visible.is_empty() {
        append_message_row(tbody, "Заявки не найдены")?;
        return Ok(());
    }

    for row in visible {
        let tr = ElementBuilder::new("tr")?
            .class(if row.is_viewed { "claim-row viewed" } else { "claim-row" })
            .build();

        let date_cell = ElementBuilder::new("td")?.text(&display_date(&row.date)).build();
        append_child(&tr, &date_cell)?;
        let email_cell = ElementBuilder::new("td")?.text(&row.email).build();
        append_child(&tr, &email_cell)?;
        let status_cell = ElementBuilder::new("td")?
            .class("status-cell")
            .text(row.status.label())
            .build();
        append_child(&tr, &status_cell)?;

        {
            let state = state.clone();
            let id = row.id;
            on_click(&tr, move |_| {
                let _ = router::navigate(&state, Route::RequestInfo(id));
            })?;
        }

        append_child(tbody, &tr)?;
    }

    Ok(())
}

fn append_message_row(tbody: &Element, message: &str) -> Result<(), JsValue> {
    let tr = ElementBuilder::new("tr")?.build();
    let td = ElementBuilder::new("td")?
        .attr("colspan", "3")?
        .class("table-message")
        .text(message)
        .build();
    append_child(&tr, &td)?;
    append_child(tbody, &tr)?;
    Ok(())
}

fn display_date(raw: &str) -> String {
    parse_claim_date(raw)
        .map(|date| date.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

// ----------------------------------------------------------------------------
// Paginación
// ----------------------------------------------------------------------------

fn render_pagination(state: &AppState) -> Result<Element, JsValue> {
    let pagination = ElementBuilder::new("div")?.class("pagination").build();

    let prev = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-page")
        .text("Назад")
        .build();
    if state.claims.page() <= 1 {
        prev.set_attribute("disabled", "")?;
    }
    {
        let state = state.clone();
        on_click(&prev, move |_| {
            claims_viewmodel::change_page(&state, state.claims.page().saturating_sub(1));
        })?;
    }
    append_child(&pagination, &prev)?;

    let indicator = ElementBuilder::new("span")?
        .class("page-indicator")
        .text(&format!(
            "Страница {} из {}",
            state.claims.page(),
            state.claims.total_pages()
        ))
        .build();
    append_child(&pagination, &indicator)?;

    let next = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-page")
        .text("Вперёд")
        .build();
    if state.claims.page() >= state.claims.total_pages() {
        next.set_attribute("disabled", "")?;
    }
    {
        let state = state.clone();
        on_click(&next, move |_| {
            claims_viewmodel::change_page(&state, state.claims.page() + 1);
        })?;
    }
    append_child(&pagination, &next)?;

    Ok(pagination)
}

// ----------------------------------------------------------------------------
// Diálogo de emisión de заявки
// ----------------------------------------------------------------------------

fn render_issue_dialog(state: &AppState) -> Result<Element, JsValue> {
    let overlay = ElementBuilder::new("div")?
        .id(DIALOG_ID)?
        .class("dialog-overlay")
        .build();

    let dialog = ElementBuilder::new("div")?.class("dialog").build();

    let title = ElementBuilder::new("h2")?.text("Новая заявка").build();
    append_child(&dialog, &title)?;

    let error_box = ElementBuilder::new("div")?
        .id("issue-error")?
        .class("form-error")
        .build();
    append_child(&dialog, &error_box)?;

    // Plantillas del manager, cargadas al abrir la página
    let select = ElementBuilder::new("select")?
        .id("issue-template")?
        .class("template-select")
        .build();
    {
        let select = select.clone();
        spawn_local(async move {
            let result = templates_service::fetch_templates_page(1, 100).await;
            if let Some(response) = result.data.filter(|r| r.ok) {
                for template in &response.templates {
                    if let Ok(builder) = ElementBuilder::new("option") {
                        if let Ok(builder) = builder.attr("value", &template.id.to_string()) {
                            let option = builder.text(&template.name).build();
                            let _ = append_child(&select, &option);
                        }
                    }
                }
            }
        });
    }
    append_child(&dialog, &select)?;

    let emails = ElementBuilder::new("textarea")?
        .attr("placeholder", "E-mail кандидатов, по одному на строку")?
        .class("emails-input")
        .build();
    append_child(&dialog, &emails)?;

    let actions = ElementBuilder::new("div")?.class("dialog-actions").build();

    let submit = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-primary")
        .text("Отправить")
        .build();
    {
        let state = state.clone();
        let select = select.clone();
        let emails = emails.clone();
        let overlay = overlay.clone();
        on_click(&submit, move |_| {
            use wasm_bindgen::JsCast;

            let template_id = select
                .dyn_ref::<web_sys::HtmlSelectElement>()
                .map(|s| s.value())
                .and_then(|v| v.parse::<u64>().ok());
            let candidate_emails: Vec<String> = emails
                .dyn_ref::<web_sys::HtmlTextAreaElement>()
                .map(|t| t.value())
                .unwrap_or_default()
                .split(['\n', ',', ';'])
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();

            let template_id = match template_id {
                Some(id) => id,
                None => {
                    show_issue_error("Выберите шаблон");
                    return;
                }
            };
            if candidate_emails.is_empty() {
                show_issue_error("Укажите хотя бы один e-mail");
                return;
            }

            let state = state.clone();
            let overlay = overlay.clone();
            spawn_local(async move {
                match claims_viewmodel::issue_claims(&state, template_id, candidate_emails).await {
                    Some(error) => show_issue_error(&error),
                    None => {
                        let _ = remove_class(&overlay, "show");
                        state.notify_subscribers();
                    }
                }
            });
        })?;
    }
    append_child(&actions, &submit)?;

    let cancel = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-secondary")
        .text("Отмена")
        .build();
    {
        let overlay = overlay.clone();
        on_click(&cancel, move |_| {
            let _ = remove_class(&overlay, "show");
        })?;
    }
    append_child(&actions, &cancel)?;

    append_child(&dialog, &actions)?;
    append_child(&overlay, &dialog)?;

    Ok(overlay)
}

fn show_issue_error(message: &str) {
    if let Some(error_box) = get_element_by_id("issue-error") {
        set_text_content(&error_box, message);
    }
}
