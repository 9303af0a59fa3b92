pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod label;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod spreadsheet;
pub mod state;
pub mod util;
