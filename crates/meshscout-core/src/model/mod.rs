pub mod key;
pub mod node;
pub mod region;

pub use key::PublicKey;
pub use node::{Advert, DeviceMode, Location, NodeRecord};
pub use region::{RegionSpec, VALID_REGIONS, known_groups};
