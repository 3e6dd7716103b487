//! Schema snapshot model types
//!
//! A snapshot is one immutable, versioned view of the mapped schema as the
//! external extraction layer saw it. Snapshots are loaded once, handed to the
//! differ read-only, and never mutated afterwards.

mod column;
mod constraint;
mod generator;
mod index;
mod naming;
mod relationship;
mod schema;

pub use column::{ColumnModel, GenerationStrategy, TemporalKind};
pub use constraint::{ConstraintModel, ConstraintType, OnDeleteAction, OnUpdateAction};
pub use generator::{SequenceModel, TableGeneratorModel};
pub use index::IndexModel;
pub use naming::CaseNormalizer;
pub use relationship::{CascadeKind, FetchKind, RelationshipModel, RelationshipType};
pub use schema::{EntityModel, SchemaModel};
