pub mod data_table;
pub mod form;
pub mod status;

pub use data_table::data_table;
pub use form::{form_error, multi_select_field, select_field, text_field};
pub use status::{LoadStatus, load_status, notice};
