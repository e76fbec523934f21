// ============================================================================
// REQUEST INFO VIEW - Detalle de una заявка
// ============================================================================
// El detalle se pide al servidor por id: los datos personales del candidato
// (nombre, teléfono, fecha de nacimiento) no viajan en la fila de la lista
// y sólo vienen poblados cuando el candidato ya respondió.
// ============================================================================

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, get_element_by_id, on_click, set_inner_html, ElementBuilder};
use crate::models::{ClaimRecord, ClaimStatus};
use crate::router::{self, Route};
use crate::services::claims_service;
use crate::state::AppState;
use crate::viewmodels::auth_viewmodel;
use crate::viewmodels::claims_viewmodel::{self, parse_claim_date};

const BODY_ID: &str = "request-info-body";

pub fn render_request_info(state: &AppState, claim_id: u64) -> Result<Element, JsValue> {
    let page = ElementBuilder::new("div")?.class("request-info-page").build();

    let back = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-back")
        .text("← К списку заявок")
        .build();
    {
        let state = state.clone();
        on_click(&back, move |_| {
            let _ = router::navigate(&state, Route::Requests);
        })?;
    }
    append_child(&page, &back)?;

    let title = ElementBuilder::new("h1")?
        .text(&format!("Заявка №{}", claim_id))
        .build();
    append_child(&page, &title)?;

    let body = ElementBuilder::new("div")?
        .id(BODY_ID)?
        .class("request-info-body")
        .build();
    let loading = ElementBuilder::new("p")?.text("Загрузка...").build();
    append_child(&body, &loading)?;
    append_child(&page, &body)?;

    {
        let state = state.clone();
        spawn_local(async move {
            load_claim(&state, claim_id).await;
        });
    }

    Ok(page)
}

async fn load_claim(state: &AppState, claim_id: u64) {
    let result = claims_service::fetch_claim(claim_id).await;
    if auth_viewmodel::handle_reauth(state, &result) {
        return;
    }

    let body = match get_element_by_id(BODY_ID) {
        Some(body) => body,
        // La vista ya no está en pantalla
        None => return,
    };
    set_inner_html(&body, "");

    let detail = result.detail_or("Ошибка при загрузке заявки");
    let claim = result
        .data
        .filter(|_| result.ok)
        .filter(|response| response.ok)
        .and_then(|response| response.claim);

    match claim {
        Some(claim) => {
            if let Err(e) = render_claim(&body, state, &claim) {
                log::error!("❌ [REQUEST] Error renderizando detalle: {:?}", e);
            }
        }
        None => {
            if let Ok(message) = ElementBuilder::new("p") {
                let message = message.class("info-message").text(&detail).build();
                let _ = append_child(&body, &message);
            }
        }
    }
}

fn render_claim(body: &Element, state: &AppState, claim: &ClaimRecord) -> Result<(), JsValue> {
    let card = ElementBuilder::new("div")?.class("info-card").build();

    append_field(&card, "E-mail кандидата", &claim.candidate_email)?;
    if let Some(full_name) = claim.candidate_full_name() {
        append_field(&card, "ФИО", &full_name)?;
    }
    if let Some(phone) = claim.candidate_phone.as_deref() {
        append_field(&card, "Телефон", phone)?;
    }
    if let Some(birthdate) = claim.candidate_birthdate.as_deref() {
        append_field(&card, "Дата рождения", &display_date(birthdate))?;
    }
    append_field(&card, "Статус", claim.status.label())?;
    append_field(&card, "Менеджер", &claim.owner_email)?;
    append_field(&card, "Дата создания", &display_date(&claim.created_at))?;
    if let Some(responded_at) = claim.responded_at.as_deref() {
        append_field(&card, "Дата ответа", &display_date(responded_at))?;
    }
    append_field(&card, "Действительна до", &display_date(&claim.expires_at))?;
    append_field(
        &card,
        "Просмотрена",
        if claim.is_viewed() { "Да" } else { "Нет" },
    )?;
    append_child(body, &card)?;

    // Una заявка todavía abierta se puede retirar desde la consola
    if matches!(claim.status.filter_key(), ClaimStatus::Waiting) {
        let error_box = ElementBuilder::new("div")?
            .id("request-info-error")?
            .class("form-error")
            .build();
        append_child(body, &error_box)?;

        let reject = ElementBuilder::new("button")?
            .attr("type", "button")?
            .class("btn-danger")
            .text("Отозвать заявку")
            .build();
        {
            let state = state.clone();
            let claim_id = claim.id;
            on_click(&reject, move |_| {
                let state = state.clone();
                spawn_local(async move {
                    match claims_viewmodel::reject_claim(&state, claim_id).await {
                        Some(error) => {
                            if let Some(error_box) =
                                crate::dom::get_element_by_id("request-info-error")
                            {
                                crate::dom::set_text_content(&error_box, &error);
                            }
                        }
                        None => {
                            // Si la sesión se cayó, handle_reauth ya redirigió
                            if state.session.is_authenticated() {
                                let _ = router::navigate(&state, Route::Requests);
                            }
                        }
                    }
                });
            })?;
        }
        append_child(body, &reject)?;
    }

    Ok(())
}

fn display_date(raw: &str) -> String {
    parse_claim_date(raw)
        .map(|date| date.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn append_field(card: &Element, label: &str, value: &str) -> Result<(), JsValue> {
    let row = ElementBuilder::new("div")?.class("info-row").build();
    let label_el = ElementBuilder::new("span")?.class("info-label").text(label).build();
    let value_el = ElementBuilder::new("span")?.class("info-value").text(value).build();
    append_child(&row, &label_el)?;
    append_child(&row, &value_el)?;
    append_child(card, &row)?;
    Ok(())
}
