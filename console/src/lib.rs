//! Terminal front end for the fleet back-office.

pub mod cli;
pub mod commands;
pub mod prompt;
pub mod render;
