//! Command handlers

pub mod new;
