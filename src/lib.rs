pub mod backend;
pub mod capture;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod pages;
pub mod pipeline;
pub mod prompt;
pub mod report;
pub mod resolver;
pub mod target;
pub mod util;
pub mod verdict;
