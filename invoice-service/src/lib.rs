//! Invoice Service - Invoice normalization, totals and presentation for vehicle-service billing.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod startup;
