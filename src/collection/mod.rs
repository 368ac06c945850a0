//! 请求集合：保存、载入和导入导出请求模板

pub mod model;
pub mod serialization;
pub mod store;
pub mod transfer;

pub use model::{Collection, RequestTemplate};
pub use store::CollectionStore;
pub use transfer::{ExportDocument, ImportError};
