pub mod assembly;
pub mod creation;
pub mod deformation;
pub mod query;
