//! Topological labelling and the planar graphs built from noded edges.

mod boundary_rule;
mod depth;
mod edge;
mod edge_end;
mod geometry_graph;
mod graph;
mod graph_intersector;
mod label;
mod location;
mod quadrant;
mod star;

pub use boundary_rule::{BoundaryNodeRule, BoundaryRule};
pub use depth::Depth;
pub use edge::Edge;
pub use edge_end::EdgeEnd;
pub use geometry_graph::GeometryGraph;
pub use graph::{DirEdgeId, DirectedEdge, EdgeId, Node, NodeId, PlanarGraph};
pub use graph_intersector::{GraphIntersector, IntersectionSummary, Pairing};
pub use label::{Label, TopologyLocation};
pub use location::{Dimension, Location, Position};
pub use quadrant::Quadrant;
pub use star::label_star;
