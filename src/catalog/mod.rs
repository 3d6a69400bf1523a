mod error;
mod loader;
mod types;

pub use error::CatalogError;
pub use loader::{Catalog, CatalogLoader, CatalogPaths, RejectedRecord};
pub use types::{
    AntennaCatalog, GroundStation, Orbit, RxSystem, Satellite, DEFAULT_BANDWIDTH_HZ,
    DEFAULT_T_SYS_K,
};
