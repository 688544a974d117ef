pub mod analyzers;
pub mod config;
pub mod error;
pub mod geodesy;
pub mod output;
pub mod parser;
pub mod run;
