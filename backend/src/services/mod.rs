pub mod admin;
pub mod checks;
