//! Business workflows spanning several repositories

pub mod checkout;
