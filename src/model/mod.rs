//! # Street Network Model
//!
//! Plain data types that every other module passes around: nodes, edges,
//! attribute bags, barrier lists, landmark records.
//!
//! Design rule: no graph-wide logic here. Anything that needs to look at more
//! than one entity lives in `graph`.

pub mod node;
pub mod edge;
pub mod value;
pub mod property_map;
pub mod feature;
pub mod barrier;
pub mod density;
pub mod landmark;

pub use node::{Node, NodeId, RegionId, PrimalEdgeRef, Adjacency};
pub use edge::{Edge, EdgeId, DirectedEdge, DirectedEdgeId, SegmentId};
pub use value::AttributeValue;
pub use property_map::{AttributeMap, AttributeMapExt};
pub use feature::Feature;
pub use barrier::{Barriers, parse_bracket_list};
pub use density::{RouteDensities, RouteCriterion};
pub use landmark::{Building, BuildingId, Anchor, NodeLandmarks};
