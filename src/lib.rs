pub mod cli;
pub mod commands;
pub mod fold;
pub mod io;
pub mod motif;
pub mod search;
pub mod utils;
