pub mod destinations;
pub mod groups;
pub mod images;
pub mod providers;
pub mod recommendations;
pub mod store;
pub mod voting;

pub use groups::GroupStore;
pub use providers::{GeoSource, ImageSearch, PexelsClient, SkyscannerClient};
