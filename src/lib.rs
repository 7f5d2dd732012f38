// ABOUTME: Library root for hookchat — re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod logging;
pub mod session;
pub mod tui;
pub mod webhook;
