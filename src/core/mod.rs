pub mod convert;
pub mod etl;
pub mod jsonl;
pub mod project;
pub mod tabular;

pub use crate::domain::model::{QaRecord, Record};
pub use crate::domain::ports::Pipeline;
pub use crate::utils::error::Result;
