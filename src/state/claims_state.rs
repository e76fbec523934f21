// ============================================================================
// CLAIMS STATE - Página de заявки cargada del servidor + estado de fetch
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::ClaimRow;

/// Estado de la lista de заявки. Las filas son siempre la última página
/// confirmada del servidor; en caso de error de fetch se conservan
/// (last-known-good) y sólo se publica el banner de error.
#[derive(Clone)]
pub struct ClaimsState {
    rows: Rc<RefCell<Vec<ClaimRow>>>,
    page: Rc<RefCell<u32>>,
    total_pages: Rc<RefCell<u32>>,
    loading: Rc<RefCell<bool>>,
    error: Rc<RefCell<Option<String>>>,
    // Secuencia de fetch: una respuesta sólo aplica si sigue siendo la
    // más reciente (last-write-wins, clavada al despachar).
    fetch_seq: Rc<RefCell<u64>>,
}

impl ClaimsState {
    pub fn new() -> Self {
        Self {
            rows: Rc::new(RefCell::new(Vec::new())),
            page: Rc::new(RefCell::new(1)),
            total_pages: Rc::new(RefCell::new(1)),
            loading: Rc::new(RefCell::new(false)),
            error: Rc::new(RefCell::new(None)),
            fetch_seq: Rc::new(RefCell::new(0)),
        }
    }

    pub fn rows(&self) -> Vec<ClaimRow> {
        self.rows.borrow().clone()
    }

    pub fn set_rows(&self, rows: Vec<ClaimRow>) {
        *self.rows.borrow_mut() = rows;
    }

    /// Página actual, 1-based (el servidor espera 0-based)
    pub fn page(&self) -> u32 {
        *self.page.borrow()
    }

    pub fn set_page(&self, page: u32) {
        *self.page.borrow_mut() = page.max(1);
    }

    pub fn total_pages(&self) -> u32 {
        *self.total_pages.borrow()
    }

    pub fn set_total_pages(&self, total: u32) {
        *self.total_pages.borrow_mut() = total.max(1);
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn set_loading(&self, loading: bool) {
        *self.loading.borrow_mut() = loading;
    }

    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn set_error(&self, error: Option<String>) {
        *self.error.borrow_mut() = error;
    }

    /// Reservar el siguiente token de fetch. Invalida cualquier fetch en vuelo.
    pub fn next_fetch_token(&self) -> u64 {
        let mut seq = self.fetch_seq.borrow_mut();
        *seq += 1;
        *seq
    }

    /// ¿Este token sigue siendo el fetch más reciente?
    pub fn is_current(&self, token: u64) -> bool {
        *self.fetch_seq.borrow() == token
    }

    /// ¿Ya se despachó al menos un fetch? Evita que el render dispare
    /// cargas repetidas.
    pub fn fetch_started(&self) -> bool {
        *self.fetch_seq.borrow() > 0
    }
}

impl Default for ClaimsState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_fetch_token_is_not_current() {
        let state = ClaimsState::new();
        let first = state.next_fetch_token();
        assert!(state.is_current(first));

        let second = state.next_fetch_token();
        assert!(!state.is_current(first));
        assert!(state.is_current(second));
    }

    #[test]
    fn page_and_total_pages_never_drop_below_one() {
        let state = ClaimsState::new();
        state.set_page(0);
        assert_eq!(state.page(), 1);
        state.set_total_pages(0);
        assert_eq!(state.total_pages(), 1);
    }
}
