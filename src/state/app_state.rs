// ============================================================================
// APP STATE - Estado global de la aplicación + notificación de cambios
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::router::Route;
use crate::state::claims_state::ClaimsState;
use crate::state::query_state::QueryState;
use crate::state::session_state::SessionState;

/// Estado global. Clonar es barato: todos los campos comparten los mismos
/// Rc internos, así los closures de eventos capturan su propia copia.
#[derive(Clone)]
pub struct AppState {
    pub session: SessionState,
    pub claims: ClaimsState,
    pub query: QueryState,
    route: Rc<RefCell<Route>>,
    auth_check_in_flight: Rc<RefCell<bool>>,
    change_subscribers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: SessionState::new(),
            claims: ClaimsState::new(),
            query: QueryState::new(),
            route: Rc::new(RefCell::new(Route::Login)),
            auth_check_in_flight: Rc::new(RefCell::new(false)),
            change_subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn current_route(&self) -> Route {
        self.route.borrow().clone()
    }

    pub fn set_route(&self, route: Route) {
        *self.route.borrow_mut() = route;
    }

    /// Guardia de reentrada del bootstrap de auth. Devuelve true si este
    /// llamador ganó el derecho de ejecutar la verificación.
    pub fn begin_auth_check(&self) -> bool {
        let mut in_flight = self.auth_check_in_flight.borrow_mut();
        if *in_flight {
            return false;
        }
        *in_flight = true;
        true
    }

    pub fn finish_auth_check(&self) {
        *self.auth_check_in_flight.borrow_mut() = false;
    }

    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    pub fn notify_subscribers(&self) {
        let subscribers = self.change_subscribers.borrow().clone();
        for subscriber in subscribers {
            subscriber();
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn auth_check_guard_blocks_reentry() {
        let state = AppState::new();
        assert!(state.begin_auth_check());
        assert!(!state.begin_auth_check());
        state.finish_auth_check();
        assert!(state.begin_auth_check());
    }

    #[test]
    fn subscribers_fire_on_notify() {
        let state = AppState::new();
        let fired = Rc::new(Cell::new(0));
        let fired2 = fired.clone();
        state.subscribe_to_changes(move || fired2.set(fired2.get() + 1));

        state.notify_subscribers();
        state.notify_subscribers();
        assert_eq!(fired.get(), 2);
    }
}
