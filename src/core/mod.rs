pub mod enricher;
pub mod etl;
pub mod flatten;
pub mod http;
pub mod paginator;
pub mod pipeline;
pub mod region;
pub mod writer;

pub use crate::domain::model::{Extraction, FlatRecord, Listing, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
