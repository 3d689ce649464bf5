pub mod config;
pub mod logging;

pub mod domains;
pub mod fetch;
pub mod harvest;
pub mod output;
pub mod pipeline;
pub mod retry;
pub mod scanner;
pub mod url_model;
