pub mod model;
pub mod msg;
pub mod store;
