mod canvas;
mod component;
pub mod config;
pub mod interaction;
pub mod model;
pub mod palette;
pub mod render;
pub mod simulation;
pub mod state;
pub mod types;
pub mod viewport;

pub use component::RelationshipNetwork;
pub use config::{ForceParams, NetworkConfig};
pub use palette::TierColorMap;
pub use state::{NetworkEvent, NetworkState};
pub use types::{NetworkData, NetworkEdge, NetworkNode, NodeKind, TrustTier};
