use std::sync::Arc;

use ruta_engine::{BookingFinalizer, LockCoordinator, SeatNotifier, SelectionService};
use ruta_store::DbClient;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbClient>,
    pub coordinator: Arc<LockCoordinator>,
    pub finalizer: Arc<BookingFinalizer>,
    pub selection: Arc<SelectionService>,
    pub notifier: SeatNotifier,
}
