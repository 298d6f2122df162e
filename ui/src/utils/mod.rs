pub mod colors;
pub mod file_saver;
