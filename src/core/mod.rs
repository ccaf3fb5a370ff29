pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{Result, SiteplanError};
pub use types::{
    AreaId, BuildingId, LandUse, ParkingKind, PlotId, Provenance, Typology, UtilityKind,
};
