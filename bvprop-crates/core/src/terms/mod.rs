//! The term graph over which the local search operates: an arena of hash-consed bit-vector
//! nodes, addressed by [`NodeId`]s which are allocated in creation order.
mod literal;
mod node;
mod node_id;
mod operator;
mod term_graph;

pub use literal::Literal;
pub use node::Node;
pub use node::NodeKind;
pub use node_id::NodeId;
pub use operator::BvOp;
pub use operator::OpKind;
pub use term_graph::TermGraph;
