/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - statements: Definitions for the statement variants
/// - expressions: Definitions for the expression variants
/// - types: The type tags attached during semantic analysis
/// - pretty: Canonical source printing of nodes
pub mod expressions;
pub mod pretty;
pub mod statements;
pub mod types;

/// Stable identity of an AST node, assigned by the parser at
/// construction time. Annotations are keyed by id so they survive moves
/// of the owning tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);
