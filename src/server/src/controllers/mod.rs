pub mod accounts;
pub mod experiments;
pub mod logs;
pub mod not_found;
pub mod results;
pub mod version;
