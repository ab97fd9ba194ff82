//! Headless driver for the git link add-in.

pub mod cli;
pub mod commands;
