pub mod assignments;
pub mod auth;
pub mod core;
pub mod export;
pub mod marks;
pub mod notices;
pub mod students;
