//! Terminal front end for the converter

pub mod card;
pub mod convert;
pub mod interactive;
pub mod rates;
pub mod setup;
pub mod ui;
