pub mod grid;
pub mod name_entry;
