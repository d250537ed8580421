pub mod fire;
pub mod portfolio;
pub mod provident;
pub mod summary;
