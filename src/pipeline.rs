//! Per-row resolution of a bibliographic export.
//!
//! For each paper row, in input order:
//! 1. Skip rows whose type is not a recognized publication kind
//! 2. Skip rows whose dedup key was already admitted
//! 3. Resolve the main author (with the not-available marker removed)
//! 4. Resolve each co-author, dropping names without a roster match
//! 5. Put the main author first unless already listed, and emit

use crate::dedup::{Admission, PaperDeduplicator};
use crate::error::Result;
use crate::index::AuthorIndex;
use crate::matcher::FormatMatcher;
use crate::model::{CleanedPaper, PaperKind, RawPaper};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Marker exports put in the main-author column when it is unknown.
pub const DEFAULT_NOT_AVAILABLE: &str = "N/A";

/// Separator between names in the authors column.
pub const DEFAULT_AUTHOR_SEPARATOR: &str = " and ";

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Publication kinds that are kept
    pub kinds: HashSet<PaperKind>,
    pub not_available_marker: String,
    pub author_separator: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            kinds: PaperKind::ALL.into_iter().collect(),
            not_available_marker: DEFAULT_NOT_AVAILABLE.to_string(),
            author_separator: DEFAULT_AUTHOR_SEPARATOR.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Restrict the kept publication kinds. An empty list keeps the defaults.
    pub fn with_kinds(mut self, kinds: &[PaperKind]) -> Self {
        if !kinds.is_empty() {
            self.kinds = kinds.iter().copied().collect();
        }
        self
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub roster_size: usize,
    pub rows_read: usize,
    pub emitted: usize,
    pub skipped_kind: usize,
    pub skipped_duplicate: usize,
    pub names_seen: usize,
    pub names_unmatched: usize,
    pub papers_without_authors: usize,
}

impl RunReport {
    fn new(roster_size: usize) -> Self {
        Self {
            started_at: Local::now(),
            finished_at: None,
            roster_size,
            rows_read: 0,
            emitted: 0,
            skipped_kind: 0,
            skipped_duplicate: 0,
            names_seen: 0,
            names_unmatched: 0,
            papers_without_authors: 0,
        }
    }
}

/// Cleaned papers plus the report of the run that produced them.
#[derive(Debug)]
pub struct RunOutput {
    pub papers: Vec<CleanedPaper>,
    pub report: RunReport,
}

/// Owns the index, the matcher and the per-run dedup state.
pub struct ResolutionPipeline {
    index: AuthorIndex,
    matcher: FormatMatcher,
    dedup: PaperDeduplicator,
    config: PipelineConfig,
    report: RunReport,
}

impl ResolutionPipeline {
    /// Create a pipeline over a built index.
    ///
    /// # Errors
    ///
    /// Returns a config error if the matcher cascade cannot be compiled.
    pub fn new(index: AuthorIndex, config: PipelineConfig) -> Result<Self> {
        let report = RunReport::new(index.len());
        Ok(Self {
            index,
            matcher: FormatMatcher::new()?,
            dedup: PaperDeduplicator::new(),
            config,
            report,
        })
    }

    pub fn index(&self) -> &AuthorIndex {
        &self.index
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Process one row. `row` is only used for logging.
    pub fn process(&mut self, row: usize, paper: &RawPaper) -> Option<CleanedPaper> {
        self.report.rows_read += 1;

        let kind = match paper.kind.parse::<PaperKind>() {
            Ok(kind) if self.config.kinds.contains(&kind) => kind,
            _ => {
                debug!(row, kind = %paper.kind, "Skipping unrecognized publication type");
                self.report.skipped_kind += 1;
                return None;
            }
        };

        if self.dedup.admit(paper) == Admission::Duplicate {
            debug!(row, title = %paper.title, year = %paper.year, "Skipping duplicate paper");
            self.report.skipped_duplicate += 1;
            return None;
        }

        let main_raw = paper
            .main_author_raw
            .replace(self.config.not_available_marker.as_str(), "");
        let main_author = self.resolve_name(row, main_raw.trim());

        let separator = self.config.author_separator.clone();
        let mut authors: Vec<String> = Vec::new();
        for name in paper.authors_raw.split(separator.as_str()) {
            if let Some(resolved) = self.resolve_name(row, name.trim()) {
                if !authors.contains(&resolved) {
                    authors.push(resolved);
                }
            }
        }

        if let Some(main) = main_author {
            if !authors.contains(&main) {
                authors.insert(0, main);
            }
        }

        if authors.is_empty() {
            warn!(row, title = %paper.title, "Paper has no resolved authors");
            self.report.papers_without_authors += 1;
        }

        self.report.emitted += 1;
        Some(CleanedPaper {
            kind,
            year: paper.year.clone(),
            title: paper.title.clone(),
            authors,
            venue: paper.venue.clone(),
        })
    }

    fn resolve_name(&mut self, row: usize, name: &str) -> Option<String> {
        if name.is_empty() {
            return None;
        }
        self.report.names_seen += 1;

        match self.matcher.resolve(&self.index, name) {
            Some(resolution) => Some(resolution.author.display_name()),
            None => {
                debug!(row, name, "Dropping unmatched author name");
                self.report.names_unmatched += 1;
                None
            }
        }
    }

    /// Process every row in order and close the run.
    pub fn run<'p, I>(mut self, papers: I) -> RunOutput
    where
        I: IntoIterator<Item = &'p RawPaper>,
    {
        info!(roster = self.index.len(), "Resolving papers");

        let cleaned: Vec<CleanedPaper> = papers
            .into_iter()
            .enumerate()
            .filter_map(|(row, paper)| self.process(row + 1, paper))
            .collect();

        self.report.finished_at = Some(Local::now());
        let report = self.report;
        info!(
            rows = report.rows_read,
            emitted = report.emitted,
            skipped_kind = report.skipped_kind,
            skipped_duplicate = report.skipped_duplicate,
            names_unmatched = report.names_unmatched,
            papers_without_authors = report.papers_without_authors,
            "Resolution complete"
        );

        RunOutput {
            papers: cleaned,
            report,
        }
    }
}
