//! # otu_index
//!
//! Threshold-indexed lookups over hierarchical OTU cluster files as written
//! by mothur.
//!
//! A cluster file holds one row per similarity cutoff, each row a partition
//! of the same sequences into OTUs. [`ClusterIndex`] reads such a file once,
//! optionally cutting a set of query genomes out of their OTUs while
//! remembering where they were, and then answers read-only lookups.
//!
//! ```no_run
//! use otu_index::{ClusterIndex, IdTranslation, IndexSettings, QueryIds, Threshold};
//!
//! let translation: IdTranslation = [("seq1", "genomeA"), ("seq2", "genomeB")]
//!     .into_iter()
//!     .collect();
//! let mut index = ClusterIndex::new(IndexSettings::with_precision(100)?, translation);
//!
//! let query: QueryIds = ["genomeB".to_string()].into_iter().collect();
//! index.read("otus.list", Some(&query))?;
//!
//! let top = index.max_threshold()?;
//! println!("highest cutoff: {}", top);
//! if let Ok(found) = index.clusters_for_element(0.03, "genomeB") {
//!     for (position, otu) in found.iter() {
//!         println!("OTU {}: {}", position, otu.join(", "));
//!     }
//! }
//! println!("{:?}", index.cluster_count(Threshold::Unique));
//! # Ok::<(), otu_index::ClusterError>(())
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod index;
pub mod model;
pub mod parser;
pub mod query;
pub mod render;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, ConfigOverrides, IndexConfig, IndexSettings};
pub use diagnostics::{Diagnostics, Level, TracingDiagnostics};
pub use error::ClusterError;
pub use index::{ClusterIndex, QueryIds};
pub use model::{ClusterEntry, ClusterGroup, CutoffKey, IdTranslation, RemovalIndex, Threshold};
pub use query::{ElementClusters, LookupMiss};
pub use render::Listing;
