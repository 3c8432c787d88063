//! Citation-name resolution against the author index.
//!
//! Exports write the same person as `Smith J.M.`, `Smith J.`,
//! `Smith John M.` or `Smith John`. The matcher tries an ordered cascade of
//! shapes, most constrained first. Each step has a shape test, the template
//! used to render roster entries, and how many trailing bytes to drop from
//! the working name when the shape held but no roster entry matched. The
//! shortened name is what the following steps see.

use crate::error::{BibError, Result};
use crate::index::{AuthorIndex, Template};
use crate::model::AuthorRecord;
use regex::Regex;
use tracing::debug;

/// One hypothesis in the cascade.
struct Hypothesis {
    shape: &'static str,
    template: Template,
    trim: usize,
}

const CASCADE: [Hypothesis; 6] = [
    // smith j.m.
    Hypothesis {
        shape: r"^[a-z ]+ [a-z]\.[a-z]\.$",
        template: Template::FamilyInitials,
        trim: 2,
    },
    // smith j.
    Hypothesis {
        shape: r"^[a-z ]+ [a-z]\.$",
        template: Template::FamilyInitial,
        trim: 0,
    },
    // smith john m.
    Hypothesis {
        shape: r"^[a-z ]+ [a-z]+ [a-z]\.$",
        template: Template::FamilyGivenMiddleDot,
        trim: 3,
    },
    // smith john
    Hypothesis {
        shape: r"^[a-z ]+ [a-z]+$",
        template: Template::FamilyGiven,
        trim: 0,
    },
    // smith john m
    Hypothesis {
        shape: r"^[a-z ]+ [a-z]+ [a-z]$",
        template: Template::FamilyGivenMiddle,
        trim: 2,
    },
    // smith john, after dropping the middle initial
    Hypothesis {
        shape: r"^[a-z ]+ [a-z]+$",
        template: Template::FamilyGiven,
        trim: 0,
    },
];

struct Step {
    shape: Regex,
    template: Template,
    trim: usize,
}

/// A citation name mapped onto a roster entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub author: &'a AuthorRecord,
    /// 1-based position of the cascade step that matched
    pub step: usize,
    pub template: Template,
    /// Normalized (and possibly shortened) name that was looked up
    pub query: String,
}

/// Ordered cascade of name-shape hypotheses.
pub struct FormatMatcher {
    steps: Vec<Step>,
}

impl FormatMatcher {
    /// Compile the cascade.
    ///
    /// # Errors
    ///
    /// Returns a config error if a shape pattern fails to compile.
    pub fn new() -> Result<Self> {
        let steps = CASCADE
            .iter()
            .map(|h| {
                let shape = Regex::new(h.shape).map_err(|e| {
                    BibError::Config(format!("Invalid name shape '{}': {}", h.shape, e))
                })?;
                Ok(Step {
                    shape,
                    template: h.template,
                    trim: h.trim,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { steps })
    }

    /// Resolve one citation name to at most one roster entry.
    ///
    /// Names matching none of the shapes, or matching a shape without a
    /// roster counterpart, resolve to `None`.
    pub fn resolve<'a>(&self, index: &'a AuthorIndex, raw: &str) -> Option<Resolution<'a>> {
        let normalized = index.normalizer().normalize(raw);
        let mut working = normalized.as_str();

        for (pos, step) in self.steps.iter().enumerate() {
            if !step.shape.is_match(working) {
                continue;
            }

            if let Some(author) = index.locate(working, step.template) {
                debug!(name = raw, step = pos + 1, query = working, "Resolved citation name");
                return Some(Resolution {
                    author,
                    step: pos + 1,
                    template: step.template,
                    query: working.to_string(),
                });
            }

            if step.trim > 0 {
                // the shape guarantees an ASCII tail of at least `trim` bytes
                let cut = working.len() - step.trim;
                debug_assert!(working.is_char_boundary(cut));
                working = &working[..cut];
            }
        }

        debug!(name = raw, normalized = %normalized, "No roster match");
        None
    }
}
