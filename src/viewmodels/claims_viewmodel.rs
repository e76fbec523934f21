// ============================================================================
// CLAIMS VIEWMODEL - Carga de páginas + pipeline local de filtrado/orden
// ============================================================================
// El servidor pagina y manda siempre createdDate,desc; búsqueda, filtros y
// orden visibles se aplican en memoria SOBRE LA PÁGINA ACTUAL. Es una
// limitación conocida: un filtro puede dejar una página visualmente corta
// aunque existan más coincidencias en otras páginas.
// ============================================================================

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::models::ClaimRow;
use crate::state::{LocalView, SortOrder};

pub const MSG_CLAIMS_LOAD_FAILED: &str = "Ошибка при загрузке заявок";

/// Parsear la fecha de una заявка o de un input de filtro. Acepta ISO
/// completo (RFC3339), fecha ISO suelta y el formato ruso DD.MM.YYYY.
pub fn parse_claim_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    NaiveDate::parse_from_str(raw, "%d.%m.%Y").ok()
}

fn matches_view_filter(row: &ClaimRow, view: &LocalView) -> bool {
    let filters = &view.filters;

    // Búsqueda: substring del email, sin distinguir mayúsculas
    if !view.search.is_empty() {
        let needle = view.search.to_lowercase();
        if !row.email.to_lowercase().contains(&needle) {
            return false;
        }
    }

    // Eje visto/no visto: ambos marcados o ninguno = sin filtro
    if filters.viewed != filters.not_viewed {
        if filters.viewed && !row.is_viewed {
            return false;
        }
        if filters.not_viewed && row.is_viewed {
            return false;
        }
    }

    // Estados: pertenencia por clave de filtro (QUEUED cuenta como WAITING)
    if !filters.statuses.is_empty() && !filters.statuses.contains(&row.status.filter_key()) {
        return false;
    }

    // Rango de fechas, inclusivo en ambos extremos. Una fila sin fecha
    // parseable sólo se excluye cuando hay un filtro de fecha activo.
    if filters.has_date_filter() {
        let row_date = match parse_claim_date(&row.date) {
            Some(date) => date,
            None => return false,
        };
        if let Some(from) = parse_claim_date(&filters.date_from) {
            if row_date < from {
                return false;
            }
        }
        if let Some(to) = parse_claim_date(&filters.date_to) {
            if row_date > to {
                return false;
            }
        }
    }

    true
}

/// Aplicar la vista local sobre las filas de la página: primero filtrar,
/// después ordenar. Los órdenes por fecha tratan las fechas ilegibles como
/// iguales entre sí, así el orden del servidor se conserva entre ellas
/// (el sort es estable).
pub fn apply_local_view(rows: &[ClaimRow], view: &LocalView) -> Vec<ClaimRow> {
    let mut visible: Vec<ClaimRow> = rows
        .iter()
        .filter(|row| matches_view_filter(row, view))
        .cloned()
        .collect();

    match view.sort {
        SortOrder::Newest => {
            visible.sort_by(|a, b| compare_dates(&b.date, &a.date));
        }
        SortOrder::Oldest => {
            visible.sort_by(|a, b| compare_dates(&a.date, &b.date));
        }
        SortOrder::Status => {
            visible.sort_by(|a, b| a.status.as_wire().cmp(b.status.as_wire()));
        }
        SortOrder::Default => {
            // No-vistas primero, el resto queda en el orden del servidor
            visible.sort_by_key(|row| row.is_viewed);
        }
    }

    visible
}

fn compare_dates(a: &str, b: &str) -> Ordering {
    match (parse_claim_date(a), parse_claim_date(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => Ordering::Equal,
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm {
    use crate::models::{ClaimRow, Role};
    use crate::services::claims_service;
    use crate::state::{AppState, PAGE_SIZE};
    use crate::viewmodels::auth_viewmodel;

    use super::MSG_CLAIMS_LOAD_FAILED;

    /// Cargar la página actual de заявки. Last-write-wins: si mientras el
    /// fetch estaba en vuelo se despachó otro, esta respuesta se descarta
    /// entera, incluido su error.
    pub async fn load_page(state: &AppState) {
        let token = state.claims.next_fetch_token();
        state.claims.set_loading(true);
        state.claims.set_error(None);
        state.notify_subscribers();

        let all_claims = state.session.role() == Some(Role::Admin);
        let result =
            claims_service::fetch_claims_page(all_claims, state.claims.page(), PAGE_SIZE).await;

        if !state.claims.is_current(token) {
            log::info!("📋 [CLAIMS] Respuesta obsoleta descartada");
            return;
        }

        if auth_viewmodel::handle_reauth(state, &result) {
            return;
        }

        let failure_detail = result.detail_or(MSG_CLAIMS_LOAD_FAILED);
        match result.data.filter(|_| result.ok) {
            Some(response) if response.ok => {
                let rows: Vec<ClaimRow> = response.claims.iter().map(ClaimRow::from).collect();
                log::info!(
                    "📋 [CLAIMS] Página {} cargada: {} filas",
                    state.claims.page(),
                    rows.len()
                );
                state.claims.set_rows(rows);
                state.claims.set_total_pages(response.total_pages);
            }
            _ => {
                // Se conservan las últimas filas buenas, sólo se publica el error
                state.claims.set_error(Some(failure_detail));
            }
        }

        state.claims.set_loading(false);
        state.notify_subscribers();
    }

    /// Cambiar de página y recargar. Fuera de rango se ignora.
    pub fn change_page(state: &AppState, page: u32) {
        if page < 1 || page > state.claims.total_pages() || page == state.claims.page() {
            return;
        }
        state.claims.set_page(page);
        let state = state.clone();
        wasm_bindgen_futures::spawn_local(async move {
            load_page(&state).await;
        });
    }

    /// Emitir заявки. Devuelve el error para el diálogo o None si salió bien
    /// (en cuyo caso la lista ya quedó recargada).
    pub async fn issue_claims(
        state: &AppState,
        template_id: u64,
        candidate_emails: Vec<String>,
    ) -> Option<String> {
        let result = claims_service::issue_claims(template_id, candidate_emails).await;
        if auth_viewmodel::handle_reauth(state, &result) {
            return None;
        }
        if !result.ok {
            return Some(result.detail_or(MSG_CLAIMS_LOAD_FAILED));
        }
        load_page(state).await;
        None
    }

    /// Rechazar una заявка desde la consola (manager). Sin token: la cookie
    /// de sesión autoriza la acción.
    pub async fn reject_claim(state: &AppState, claim_id: u64) -> Option<String> {
        let result = claims_service::act_claim(claim_id, "STATUS_REFUSED", None).await;
        if auth_viewmodel::handle_reauth(state, &result) {
            return None;
        }
        if !result.ok {
            return Some(result.detail_or(MSG_CLAIMS_LOAD_FAILED));
        }
        load_page(state).await;
        None
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{change_page, issue_claims, load_page, reject_claim};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClaimStatus;
    use crate::state::ClaimFilters;
    use std::collections::HashSet;

    fn row(id: u64, date: &str, email: &str, status: ClaimStatus, viewed: bool) -> ClaimRow {
        ClaimRow {
            id,
            date: date.to_string(),
            email: email.to_string(),
            status,
            is_viewed: viewed,
        }
    }

    fn sample_rows() -> Vec<ClaimRow> {
        vec![
            row(1, "2026-08-03T10:00:00Z", "anna@mail.ru", ClaimStatus::Waiting, false),
            row(2, "2026-08-01T09:00:00Z", "boris@mail.ru", ClaimStatus::Consent, true),
            row(3, "2026-08-02T08:00:00Z", "Clara@Corp.RU", ClaimStatus::Queued, false),
            row(4, "2026-07-20T12:00:00Z", "dmitry@mail.ru", ClaimStatus::Refused, true),
        ]
    }

    fn view() -> LocalView {
        LocalView::default()
    }

    #[test]
    fn date_parsing_accepts_all_three_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        assert_eq!(parse_claim_date("2026-08-03T10:00:00Z"), Some(expected));
        assert_eq!(parse_claim_date("2026-08-03"), Some(expected));
        assert_eq!(parse_claim_date("03.08.2026"), Some(expected));
        assert_eq!(parse_claim_date("not a date"), None);
        assert_eq!(parse_claim_date(""), None);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let mut v = view();
        v.search = "clara".to_string();
        let visible = apply_local_view(&sample_rows(), &v);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 3);

        v.search = "MAIL.RU".to_string();
        assert_eq!(apply_local_view(&sample_rows(), &v).len(), 3);
    }

    #[test]
    fn viewed_axis_filters_only_when_exclusive() {
        let mut v = view();
        v.filters.viewed = true;
        let visible = apply_local_view(&sample_rows(), &v);
        assert!(visible.iter().all(|r| r.is_viewed));

        v.filters.not_viewed = true;
        // Ambos marcados: el eje se apaga
        assert_eq!(apply_local_view(&sample_rows(), &v).len(), 4);

        v.filters.viewed = false;
        let visible = apply_local_view(&sample_rows(), &v);
        assert!(visible.iter().all(|r| !r.is_viewed));
    }

    #[test]
    fn waiting_filter_covers_queued_rows() {
        let mut v = view();
        v.filters.statuses = HashSet::from([ClaimStatus::Waiting]);
        let visible = apply_local_view(&sample_rows(), &v);
        let ids: Vec<u64> = visible.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let mut v = view();
        v.filters.date_from = "01.08.2026".to_string();
        v.filters.date_to = "02.08.2026".to_string();
        let visible = apply_local_view(&sample_rows(), &v);
        let ids: Vec<u64> = visible.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn unparsable_row_dates_survive_unless_date_filter_is_active() {
        let mut rows = sample_rows();
        rows.push(row(5, "garbage", "eva@mail.ru", ClaimStatus::Waiting, false));

        // Sin filtro de fecha la fila ilegible se muestra
        assert_eq!(apply_local_view(&rows, &view()).len(), 5);

        let mut v = view();
        v.filters.date_from = "01.01.2020".to_string();
        let visible = apply_local_view(&rows, &v);
        assert!(visible.iter().all(|r| r.id != 5));
    }

    #[test]
    fn newest_and_oldest_sort_by_parsed_date() {
        let mut v = view();
        v.sort = SortOrder::Newest;
        let ids: Vec<u64> = apply_local_view(&sample_rows(), &v).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3, 2, 4]);

        v.sort = SortOrder::Oldest;
        let ids: Vec<u64> = apply_local_view(&sample_rows(), &v).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);
    }

    #[test]
    fn status_sort_is_lexicographic_on_wire_value() {
        let mut v = view();
        v.sort = SortOrder::Status;
        let statuses: Vec<&str> = apply_local_view(&sample_rows(), &v)
            .iter()
            .map(|r| r.status.as_wire())
            .collect();
        let mut expected = statuses.clone();
        expected.sort();
        assert_eq!(statuses, expected);
    }

    #[test]
    fn default_sort_keeps_unviewed_first_and_is_stable() {
        let ids: Vec<u64> = apply_local_view(&sample_rows(), &view())
            .iter()
            .map(|r| r.id)
            .collect();
        // No-vistas (1, 3) en orden original, después vistas (2, 4)
        assert_eq!(ids, vec![1, 3, 2, 4]);
    }

    #[test]
    fn filters_combine_with_and_semantics() {
        let mut v = view();
        v.search = "mail.ru".to_string();
        v.filters.not_viewed = true;
        v.filters.statuses = HashSet::from([ClaimStatus::Waiting]);
        let visible = apply_local_view(&sample_rows(), &v);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
    }

    #[test]
    fn applying_the_view_twice_changes_nothing() {
        let mut v = view();
        v.search = "mail.ru".to_string();
        v.sort = SortOrder::Newest;
        v.filters.statuses = HashSet::from([ClaimStatus::Waiting, ClaimStatus::Consent]);

        let once = apply_local_view(&sample_rows(), &v);
        let twice = apply_local_view(&once, &v);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_filters_struct_passes_everything() {
        assert_eq!(ClaimFilters::default().has_date_filter(), false);
        assert_eq!(apply_local_view(&sample_rows(), &view()).len(), 4);
    }
}
