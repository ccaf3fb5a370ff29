//! Plot domain model: the plot, its buildings, and derived area collections

pub mod model;
pub mod persist;
pub mod regulation;

pub use model::{
    BuildableArea, Building, Entry, Floor, GreenArea, ParkingArea, Plot, Road, Side, UtilityArea,
};
pub use persist::{decode_plot, encode_plot, plot_from_json, plot_to_json, PlotRecord};
pub use regulation::{Regulation, RegulationRegistry};
