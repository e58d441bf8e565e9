//! Config data shapes for the external interfaces: map/agent/item/picking
//! list/manual-assignment formats, and small `from_path` loaders.

pub mod error;
pub mod formats;
#[cfg(feature = "fs")]
pub mod loader;
pub mod spec;

pub use error::{ConfigError, ConfigResult};
pub use spec::{AgentSpec, ItemSpec, ManualAction, ManualAssignmentSpec, MapSpec, PickingTaskSpec, RackSpec};

#[cfg(feature = "fs")]
pub use loader::{load_agent_config, load_item_config, load_manual_assignment, load_map_config, load_picking_list};
