pub mod spinner;
pub mod text_input;
