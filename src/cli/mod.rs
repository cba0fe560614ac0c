pub mod convert;
pub mod currencies;
pub mod settle;
pub mod setup;
pub mod ui;
