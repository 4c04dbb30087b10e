//! Core converter logic, independent of the terminal front end

pub mod config;
pub mod convert;
pub mod currency;
pub mod loader;
pub mod log;
pub mod rates;
pub mod widget;

// Re-export main types for cleaner imports
pub use currency::{Currency, RateTableProvider};
pub use loader::{FETCH_ERROR_MESSAGE, LoadState, RateLoader};
pub use rates::RateTable;
pub use widget::ConverterWidget;
