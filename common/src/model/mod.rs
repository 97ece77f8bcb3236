pub mod annotation;
pub mod check;
pub mod submission;
pub mod tool;
pub mod user;
pub mod verdict;
