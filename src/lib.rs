pub mod booking;
pub mod db;
pub mod middleware;
pub mod models;
pub mod pricing;
pub mod routes;
pub mod services;
