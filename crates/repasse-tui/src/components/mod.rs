pub mod history_panel;
pub mod log_panel;
pub mod popup;
pub mod query_form;
pub mod result_panel;
pub mod search_panel;
pub mod status_bar;
