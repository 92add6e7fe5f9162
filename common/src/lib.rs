//! Wire and model types shared by the observatory service and its clients.

pub mod model;
pub mod requests;
