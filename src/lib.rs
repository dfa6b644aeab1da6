//! Taskboard library.
//!
//! A minimal task-management web application: a relational schema behind
//! a thin data-access layer, a JSON REST surface, and an embedded client
//! page.

pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod types;
pub mod web;
