pub mod converter;
pub mod file_type;
pub mod output;
pub mod projection;
