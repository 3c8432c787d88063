//! # bibresolve
//!
//! Author-name resolution and paper deduplication for bibliographic exports.
//!
//! ## Modules
//!
//! - [`normalize`] - Case, diacritic and punctuation folding
//! - [`index`] - Sorted author roster with template-based lookup
//! - [`matcher`] - Cascade of citation-name shapes
//! - [`dedup`] - Duplicate paper detection
//! - [`pipeline`] - Per-row resolution of a paper export
//! - [`tabular`] - CSV roster/paper loaders and cleaned-output writer
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust
//! use bibresolve::index::AuthorIndex;
//! use bibresolve::model::{AuthorRecord, RawPaper};
//! use bibresolve::normalize::NameNormalizer;
//! use bibresolve::pipeline::{PipelineConfig, ResolutionPipeline};
//!
//! # fn main() -> bibresolve::Result<()> {
//! let index = AuthorIndex::from_records(
//!     NameNormalizer::new(),
//!     vec![AuthorRecord::new("Ana", "Jovanović", "")],
//! )?;
//! let papers = vec![RawPaper {
//!     kind: "Article".to_string(),
//!     year: "2020".to_string(),
//!     title: "Graph Theory Basics".to_string(),
//!     main_author_raw: "N/A".to_string(),
//!     authors_raw: "jovanovic a.".to_string(),
//!     venue: "ICML".to_string(),
//! }];
//!
//! let output = ResolutionPipeline::new(index, PipelineConfig::default())?.run(&papers);
//! assert_eq!(output.papers[0].authors, vec!["Ana Jovanović"]);
//! # Ok(())
//! # }
//! ```

pub mod dedup;
pub mod error;
pub mod index;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod tabular;

pub use error::{BibError, Result};
