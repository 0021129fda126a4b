//! Operations that touch more than one store

pub mod accounts;
