//! Record types shared by the resolution engine and the tabular collaborators.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Separator used when the resolved author list is flattened into one cell.
///
/// Downstream co-authorship tooling splits the cell on this exact string.
pub const AUTHOR_JOIN: &str = ", ";

/// A canonical author from the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRecord {
    pub given_name: String,
    pub family_name: String,
    /// Empty when the roster has no middle name
    pub middle_token: String,
}

impl AuthorRecord {
    pub fn new(
        given_name: impl Into<String>,
        family_name: impl Into<String>,
        middle_token: impl Into<String>,
    ) -> Self {
        Self {
            given_name: given_name.into(),
            family_name: family_name.into(),
            middle_token: middle_token.into(),
        }
    }

    /// "Given Family", the form written to the cleaned output.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

/// Publication kinds the pipeline keeps. Anything else is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaperKind {
    Article,
    ConferencePaper,
    ArticleInPress,
    Review,
    BookChapter,
}

impl PaperKind {
    pub const ALL: [PaperKind; 5] = [
        PaperKind::Article,
        PaperKind::ConferencePaper,
        PaperKind::ArticleInPress,
        PaperKind::Review,
        PaperKind::BookChapter,
    ];

    /// Label as it appears in bibliographic exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperKind::Article => "Article",
            PaperKind::ConferencePaper => "Conference Paper",
            PaperKind::ArticleInPress => "Article in Press",
            PaperKind::Review => "Review",
            PaperKind::BookChapter => "Book Chapter",
        }
    }
}

impl fmt::Display for PaperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaperKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        PaperKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unrecognized publication type '{}'", s))
    }
}

impl Serialize for PaperKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A paper row as exported, before any resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPaper {
    /// Publication type label; unrecognized labels are allowed here
    pub kind: String,
    pub year: String,
    pub title: String,
    pub main_author_raw: String,
    pub authors_raw: String,
    pub venue: String,
}

/// A paper after type filtering, deduplication and author resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanedPaper {
    #[serde(rename = "type")]
    pub kind: PaperKind,
    pub year: String,
    pub title: String,
    /// Resolved "Given Family" names, main author first
    #[serde(serialize_with = "join_authors")]
    pub authors: Vec<String>,
    pub venue: String,
}

impl CleanedPaper {
    /// Author list flattened the way the output cell carries it.
    pub fn authors_joined(&self) -> String {
        self.authors.join(AUTHOR_JOIN)
    }
}

fn join_authors<S: Serializer>(
    authors: &[String],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&authors.join(AUTHOR_JOIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_kind_parse() {
        assert_eq!("Conference Paper".parse(), Ok(PaperKind::ConferencePaper));
        assert_eq!(" Article in Press ".parse(), Ok(PaperKind::ArticleInPress));
        assert!("Letter".parse::<PaperKind>().is_err());
        // labels are case sensitive, as in the exports
        assert!("article".parse::<PaperKind>().is_err());
    }

    #[test]
    fn test_display_name() {
        let author = AuthorRecord::new("Ana", "Jovanović", "");
        assert_eq!(author.display_name(), "Ana Jovanović");
    }

    #[test]
    fn test_authors_joined() {
        let paper = CleanedPaper {
            kind: PaperKind::Review,
            year: "2021".to_string(),
            title: "T".to_string(),
            authors: vec!["Ana Jovanović".to_string(), "Marko Petrović".to_string()],
            venue: "V".to_string(),
        };
        assert_eq!(paper.authors_joined(), "Ana Jovanović, Marko Petrović");
    }
}
