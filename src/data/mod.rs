pub mod binding;
pub mod device;
pub mod field;
pub mod layout;
pub mod shape;
