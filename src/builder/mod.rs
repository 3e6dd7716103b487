//! Contributor-based DDL builders
//!
//! A contributor is one atomic, priority-tagged DDL-emission unit. Builders
//! collect contributors append-only and render them at `build()` time,
//! stably sorted by ascending priority, against a shared output buffer.
//! Priorities encode intra-statement ordering needs (a primary-key drop must
//! precede a primary-key add inside one alter run, a generator table must
//! exist before its seed row is inserted); the phase protocol in
//! [`crate::diff`] decides *what* is emitted and *when*, the builders and
//! dialect decide *how* it renders.

mod alter;
mod create;
mod drop;
mod generator;

pub use alter::{AlterContributor, AlterTableBuilder};
pub use create::{CreateTableBuilder, PostCreateContributor, TableBodyContributor};
pub use drop::{DropContributor, DropTableBuilder};
pub use generator::{TableGeneratorBuilder, TableGeneratorContributor};
