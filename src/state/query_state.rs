// ============================================================================
// QUERY STATE - Búsqueda/orden/filtros locales de la lista de заявки
// ============================================================================
// page y page_size gobiernan el fetch al servidor; search/sort/filters se
// aplican sólo sobre la página cargada en memoria (vista local). Los filtros
// persisten en la UI al cambiar de página, pero se recomputan contra las
// filas de la página nueva.
// ============================================================================

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::models::ClaimStatus;

/// Tamaño fijo de página de заявки
pub const PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sin orden elegido: no-vistas antes que vistas, resto en orden del servidor
    Default,
    Newest,
    Oldest,
    Status,
}

impl SortOrder {
    pub fn parse(raw: &str) -> SortOrder {
        match raw {
            "newest" => SortOrder::Newest,
            "oldest" => SortOrder::Oldest,
            "status" => SortOrder::Status,
            _ => SortOrder::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClaimFilters {
    pub viewed: bool,
    pub not_viewed: bool,
    /// Claves de filtro (ver ClaimStatus::filter_key): QUEUED nunca se
    /// guarda aquí, se pliega en WAITING.
    pub statuses: HashSet<ClaimStatus>,
    /// Fechas en formato DD.MM.YYYY o ISO; vacío = sin filtro
    pub date_from: String,
    pub date_to: String,
}

impl ClaimFilters {
    pub fn has_date_filter(&self) -> bool {
        !self.date_from.is_empty() || !self.date_to.is_empty()
    }
}

/// Vista local completa: entrada pura del pipeline de filtrado/orden
#[derive(Debug, Clone, PartialEq)]
pub struct LocalView {
    pub search: String,
    pub sort: SortOrder,
    pub filters: ClaimFilters,
}

impl Default for LocalView {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: SortOrder::Default,
            filters: ClaimFilters::default(),
        }
    }
}

/// Estado compartido de la vista local (por instancia de la página de заявки)
#[derive(Clone)]
pub struct QueryState {
    view: Rc<RefCell<LocalView>>,
}

impl QueryState {
    pub fn new() -> Self {
        Self {
            view: Rc::new(RefCell::new(LocalView::default())),
        }
    }

    pub fn snapshot(&self) -> LocalView {
        self.view.borrow().clone()
    }

    pub fn set_search(&self, search: String) {
        self.view.borrow_mut().search = search;
    }

    pub fn set_sort(&self, sort: SortOrder) {
        self.view.borrow_mut().sort = sort;
    }

    pub fn set_viewed(&self, viewed: bool) {
        self.view.borrow_mut().filters.viewed = viewed;
    }

    pub fn set_not_viewed(&self, not_viewed: bool) {
        self.view.borrow_mut().filters.not_viewed = not_viewed;
    }

    /// Alternar una opción de estado. Se normaliza a la clave de filtro,
    /// así seleccionar "Ожидание" cubre QUEUED y WAITING a la vez.
    pub fn toggle_status(&self, status: ClaimStatus) {
        let key = status.filter_key();
        let mut view = self.view.borrow_mut();
        if !view.filters.statuses.remove(&key) {
            view.filters.statuses.insert(key);
        }
    }

    pub fn has_status(&self, status: ClaimStatus) -> bool {
        self.view.borrow().filters.statuses.contains(&status.filter_key())
    }

    pub fn set_date_from(&self, date: String) {
        self.view.borrow_mut().filters.date_from = date;
    }

    pub fn set_date_to(&self, date: String) {
        self.view.borrow_mut().filters.date_to = date;
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_status_normalizes_queued_to_waiting() {
        let query = QueryState::new();
        query.toggle_status(ClaimStatus::Queued);

        let view = query.snapshot();
        assert!(view.filters.statuses.contains(&ClaimStatus::Waiting));
        assert!(!view.filters.statuses.contains(&ClaimStatus::Queued));

        // Apagar vía WAITING quita la opción completa
        query.toggle_status(ClaimStatus::Waiting);
        assert!(query.snapshot().filters.statuses.is_empty());
    }

    #[test]
    fn sort_order_parses_select_values() {
        assert_eq!(SortOrder::parse("newest"), SortOrder::Newest);
        assert_eq!(SortOrder::parse("oldest"), SortOrder::Oldest);
        assert_eq!(SortOrder::parse("status"), SortOrder::Status);
        assert_eq!(SortOrder::parse(""), SortOrder::Default);
        assert_eq!(SortOrder::parse("bogus"), SortOrder::Default);
    }
}
