#![doc = "ticket-kb-core: core logic library for ticket-kb."]

//! This crate contains the data model and pipelines that turn resolved helpdesk
//! tickets into knowledge-base articles.
//!
//! The stages, leaves first:
//! - [`vectorize`]: TF-IDF vectors and per-ticket keywords
//! - [`cluster`]: cosine similarity and greedy, seed-centred clustering
//! - [`quality`]: resolution quality, confidence and resolution time
//! - [`classify`]: keyword-table categorisation
//! - [`process`]: per-ticket enrichment of an extracted batch
//! - [`synthesize`]: one article per cluster of similar tickets
//!
//! [`extract`], [`source`], [`sink`] and [`pipeline`] wire these to files.
//! Nothing here installs a tracing subscriber or touches process-wide state.

pub mod classify;
pub mod cluster;
pub mod contract;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod process;
pub mod quality;
pub mod sink;
pub mod source;
pub mod stop_words;
pub mod synthesize;
pub mod ticket;
pub mod vectorize;

pub use error::PipelineError;
