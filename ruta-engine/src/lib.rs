pub mod coordinator;
pub mod finalizer;
pub mod notifier;
pub mod reconciler;
pub mod selection;
pub mod token;

pub use coordinator::{LockCoordinator, SeatLockGrant};
pub use finalizer::{BookingConfirmation, BookingFinalizer};
pub use notifier::SeatNotifier;
pub use reconciler::LeaseReconciler;
pub use selection::SelectionService;
pub use token::{LockClaims, TokenSigner};
