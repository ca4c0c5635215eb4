pub mod categories;
pub mod config;
pub mod deps;
pub mod history;
pub mod info;
pub mod list;
pub mod new;
pub mod run;
