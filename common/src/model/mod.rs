pub mod field;
pub mod observation;
pub mod project;
