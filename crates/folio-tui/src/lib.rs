// Terminal rendition of the portfolio's Projects page

pub mod app;
pub mod runner;
pub mod ui;

pub use app::{Action, App};
pub use runner::run_tui;
