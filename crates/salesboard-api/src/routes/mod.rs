//! Route handlers

pub mod transactions;
