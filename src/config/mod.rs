pub mod convert;
pub mod project;

pub use convert::ConvertConfig;
pub use project::ProjectConfig;
