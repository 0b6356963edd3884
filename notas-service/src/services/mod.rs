pub mod batch;
pub mod credito;
pub mod extraction;
pub mod kpi;
pub mod notas;
pub mod repository;
pub mod storage;
pub mod text;

pub use notas::{NotaService, UploadOutcome};
pub use repository::NotaStore;
pub use storage::{LocalStorage, Storage};
