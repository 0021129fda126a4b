pub mod register_body;

pub use register_body::RegisterBody;
