#![forbid(unsafe_code)]

pub mod auth;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod cover;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod search;
pub mod views;
