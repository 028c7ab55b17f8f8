//! HTTP server for the internship subject platform.

pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod notify;
pub mod repository;
pub mod service;
pub mod session;
pub mod storage;
