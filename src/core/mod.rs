pub mod engine;
pub mod patch;
pub mod pipeline;
pub mod transform;

pub use crate::domain::model::{GeneratedBlock, LinkEntry, PatchReport, RemoteMapping};
pub use crate::domain::ports::{ConfigProvider, Pipeline, RemoteFetcher, Storage};
pub use crate::utils::error::Result;
