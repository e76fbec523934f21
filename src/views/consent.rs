// ============================================================================
// CONSENT FLOW - Páginas del candidato (sin sesión)
// ============================================================================
// El candidato llega desde el link de su correo con claim_id y token en el
// query string. Estas páginas nunca consultan la sesión: el token autoriza
// la acción por sí solo.
// ============================================================================

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, on_click, ElementBuilder};
use crate::router::{self, Route};
use crate::services::claims_service;
use crate::state::AppState;

/// Parámetros del link de consentimiento
struct ConsentParams {
    claim_id: u64,
    token: String,
}

fn read_consent_params() -> Option<ConsentParams> {
    let search = web_sys::window()?.location().search().ok()?;
    let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
    let claim_id = params.get("claim_id")?.parse::<u64>().ok()?;
    let token = params.get("token")?;
    if token.is_empty() {
        return None;
    }
    Some(ConsentParams { claim_id, token })
}

/// Página informativa previa al consentimiento
pub fn render_registration(state: &AppState) -> Result<Element, JsValue> {
    let page = ElementBuilder::new("div")?.class("consent-page").build();

    let title = ElementBuilder::new("h1")?
        .text("Согласие на обработку персональных данных")
        .build();
    append_child(&page, &title)?;

    let text = ElementBuilder::new("p")?
        .class("consent-text")
        .text(
            "Работодатель запросил ваше согласие на обработку персональных данных. \
             Ознакомьтесь с условиями и перейдите к подтверждению.",
        )
        .build();
    append_child(&page, &text)?;

    let proceed = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-primary")
        .text("Перейти к подтверждению")
        .build();
    {
        let state = state.clone();
        on_click(&proceed, move |_| {
            // El query string (claim_id, token) se conserva en la URL
            let search = web_sys::window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();
            if let Some(window) = web_sys::window() {
                if let Ok(history) = window.history() {
                    let _ = history.push_state_with_url(
                        &JsValue::NULL,
                        "",
                        Some(&format!("{}{}", Route::Consent.path(), search)),
                    );
                }
            }
            state.set_route(Route::Consent);
            state.notify_subscribers();
        })?;
    }
    append_child(&page, &proceed)?;

    Ok(page)
}

/// Página de decisión: consentir o rechazar
pub fn render_consent(state: &AppState) -> Result<Element, JsValue> {
    let page = ElementBuilder::new("div")?.class("consent-page").build();

    let params = match read_consent_params() {
        Some(params) => params,
        None => {
            log::warn!("⚠️ [CONSENT] Link sin claim_id/token válidos");
            let message = ElementBuilder::new("p")?
                .class("consent-text")
                .text("Ссылка недействительна. Запросите новое письмо у работодателя.")
                .build();
            append_child(&page, &message)?;
            return Ok(page);
        }
    };

    let title = ElementBuilder::new("h1")?
        .text("Подтверждение согласия")
        .build();
    append_child(&page, &title)?;

    let text = ElementBuilder::new("p")?
        .class("consent-text")
        .text("Вы можете дать согласие на обработку персональных данных или отказаться.")
        .build();
    append_child(&page, &text)?;

    let actions = ElementBuilder::new("div")?.class("consent-actions").build();
    append_decision_button(
        &actions,
        state,
        "Дать согласие",
        "btn-primary",
        "STATUS_CONSENT",
        params.claim_id,
        params.token.clone(),
    )?;
    append_decision_button(
        &actions,
        state,
        "Отказаться",
        "btn-danger",
        "STATUS_REFUSED",
        params.claim_id,
        params.token,
    )?;
    append_child(&page, &actions)?;

    Ok(page)
}

fn append_decision_button(
    actions: &Element,
    state: &AppState,
    label: &str,
    class: &str,
    status: &'static str,
    claim_id: u64,
    token: String,
) -> Result<(), JsValue> {
    let button = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class(class)
        .text(label)
        .build();
    {
        let state = state.clone();
        on_click(&button, move |_| {
            let state = state.clone();
            let token = token.clone();
            spawn_local(async move {
                let result = claims_service::act_claim(claim_id, status, Some(token)).await;
                let accepted = result.ok && result.data.as_ref().map(|r| r.ok).unwrap_or(false);
                if !accepted {
                    log::warn!(
                        "⚠️ [CONSENT] Acción rechazada: {}",
                        result.detail_or("sin detalle")
                    );
                }
                let target = if accepted {
                    Route::ConsentSuccess
                } else {
                    Route::ConsentError
                };
                let _ = router::replace(&state, target);
                state.notify_subscribers();
            });
        })?;
    }
    append_child(actions, &button)?;
    Ok(())
}

pub fn render_consent_success() -> Result<Element, JsValue> {
    let page = ElementBuilder::new("div")?.class("consent-page").build();
    let title = ElementBuilder::new("h1")?.text("Спасибо!").build();
    append_child(&page, &title)?;
    let text = ElementBuilder::new("p")?
        .class("consent-text")
        .text("Ваш ответ сохранён. Эту страницу можно закрыть.")
        .build();
    append_child(&page, &text)?;
    Ok(page)
}

pub fn render_consent_error() -> Result<Element, JsValue> {
    let page = ElementBuilder::new("div")?.class("consent-page").build();
    let title = ElementBuilder::new("h1")?.text("Что-то пошло не так").build();
    append_child(&page, &title)?;
    let text = ElementBuilder::new("p")?
        .class("consent-text")
        .text(
            "Не удалось сохранить ответ. Возможно, срок действия ссылки истёк. \
             Запросите новое письмо у работодателя.",
        )
        .build();
    append_child(&page, &text)?;
    Ok(page)
}
