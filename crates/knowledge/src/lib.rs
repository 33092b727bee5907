//! HR knowledge retrieval and grounded answering.
//!
//! A message is classified into an [`Intent`], routed through an
//! intent-specific [`RetrievalCascade`] of filtered vector searches, and the
//! retrieved documents become the grounding context for the
//! [`AnswerGenerator`]. Empty retrievals end in fixed replies instead of a
//! generation call.
//!
//! The index is fed by [`sync`]: company snapshots are turned into typed
//! [`Document`]s and upserted by id.

pub mod answer;
pub mod cascade;
pub mod context;
pub mod document;
pub mod embeddings;
pub mod extract;
pub mod filter;
pub mod intent;
pub mod normalize;
pub mod pipeline;
pub mod replies;
pub mod rewrite;
pub mod store;
pub mod sync;

pub use answer::AnswerGenerator;
pub use cascade::{CascadeSettings, Caller, RetrievalCascade, RetrievalOutcome, Terminal};
pub use context::assemble_context;
pub use document::{CompanySnapshot, Document, DocumentMetadata, DocumentType, TypedFields};
pub use embeddings::{create_provider, EmbeddingProvider};
pub use extract::Entities;
pub use filter::Filter;
pub use intent::{classify, Intent};
pub use normalize::normalize;
pub use pipeline::{ChatPipeline, ChatResponse, ReplyKind};
pub use rewrite::rewrite;
pub use store::{InMemoryVectorStore, SearchRequest, VectorStore};
pub use sync::{
    spawn_sync, sync_from_source, FileSnapshotSource, HttpSnapshotSource, Indexer, RetryPolicy,
    SnapshotSource, SyncReport, UpsertReport,
};
