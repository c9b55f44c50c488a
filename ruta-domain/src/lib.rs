pub mod booking;
pub mod error;
pub mod events;
pub mod seat;
pub mod selection;
pub mod trip;

pub use error::EngineError;
