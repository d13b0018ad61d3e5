pub mod controller;
pub mod debounce;
pub mod footer;

pub use controller::{FetchTicket, TableController, TableStatus};
pub use debounce::Debouncer;
pub use footer::{page_window, TableFooter, PAGE_WINDOW};
