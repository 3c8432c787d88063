//! CSV loaders and writers around the resolution engine.
//!
//! Roster columns: `given_name, family_name, middle_name[, department, faculty]`.
//! Paper columns: `type, main_author, year, title, authors, venue`; Scopus
//! header names (`Document Type`, `Source title`, ...) are accepted as well.
//! Cleaned output columns: `type, year, title, authors, venue`.

use crate::error::{BibError, Result};
use crate::model::{AuthorRecord, CleanedPaper, RawPaper};
use crate::normalize::NameNormalizer;
use crate::pipeline::{RunReport, DEFAULT_NOT_AVAILABLE};
use serde::Deserialize;
use std::io;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(alias = "name", alias = "Name", alias = "given", default)]
    given_name: String,
    #[serde(alias = "lastname", alias = "Last Name", alias = "family", default)]
    family_name: String,
    #[serde(alias = "middlename", alias = "Middle Name", alias = "middle", default)]
    middle_name: String,
}

#[derive(Debug, Deserialize)]
struct PaperRow {
    #[serde(rename = "type", alias = "Document Type", default)]
    kind: String,
    #[serde(alias = "Main Author", default)]
    main_author: String,
    #[serde(alias = "Year", default)]
    year: String,
    #[serde(alias = "Title", default)]
    title: String,
    #[serde(alias = "Authors", default)]
    authors: String,
    #[serde(alias = "Source title", alias = "Document Name", default)]
    venue: String,
}

impl From<PaperRow> for RawPaper {
    fn from(row: PaperRow) -> Self {
        RawPaper {
            kind: row.kind,
            year: row.year,
            title: row.title,
            main_author_raw: row.main_author,
            authors_raw: row.authors,
            venue: row.venue,
        }
    }
}

fn reader<R: io::Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(source)
}

/// Capitalize the first letter of every alphabetic run, lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Read roster records from CSV.
///
/// Given and family names are title-cased and a `N/A` middle name becomes
/// empty. A row without a family name fails the whole load.
pub fn read_roster<R: io::Read>(source: R) -> Result<Vec<AuthorRecord>> {
    let mut rdr = reader(source);
    let headers = rdr.headers()?.clone();
    let normalizer = NameNormalizer::new();

    let mut authors = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: RosterRow = record.deserialize(Some(&headers))?;

        // punctuation-only names are empty once normalized
        if normalizer.normalize(&row.family_name).is_empty() {
            return Err(BibError::MalformedRoster {
                line,
                reason: "missing family name".to_string(),
            });
        }

        let middle = if row.middle_name == DEFAULT_NOT_AVAILABLE {
            String::new()
        } else {
            row.middle_name
        };

        authors.push(AuthorRecord::new(
            title_case(&row.given_name),
            title_case(&row.family_name),
            middle,
        ));
    }

    Ok(authors)
}

/// Read paper rows from CSV, in file order.
pub fn read_papers<R: io::Read>(source: R) -> Result<Vec<RawPaper>> {
    let mut rdr = reader(source);
    rdr.deserialize::<PaperRow>()
        .map(|row| row.map(RawPaper::from).map_err(BibError::from))
        .collect()
}

pub fn load_roster(path: &Path) -> Result<Vec<AuthorRecord>> {
    let authors = read_roster(std::fs::File::open(path)?)?;
    info!(path = %path.display(), authors = authors.len(), "Loaded roster");
    Ok(authors)
}

pub fn load_papers(path: &Path) -> Result<Vec<RawPaper>> {
    let papers = read_papers(std::fs::File::open(path)?)?;
    info!(path = %path.display(), papers = papers.len(), "Loaded papers");
    Ok(papers)
}

/// Write cleaned papers as CSV with a header row.
pub fn write_cleaned<W: io::Write>(sink: W, papers: &[CleanedPaper]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(true).from_writer(sink);

    for paper in papers {
        wtr.serialize(paper)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn save_cleaned(path: &Path, papers: &[CleanedPaper]) -> Result<()> {
    write_cleaned(std::fs::File::create(path)?, papers)?;
    info!(path = %path.display(), papers = papers.len(), "Saved cleaned papers");
    Ok(())
}

/// Write the run report as pretty-printed JSON.
pub fn save_report(path: &Path, report: &RunReport) -> Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    info!(path = %path.display(), "Saved run report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PaperKind;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ana"), "Ana");
        assert_eq!(title_case("JOVANOVIĆ"), "Jovanović");
        assert_eq!(title_case("stanković-ilić"), "Stanković-Ilić");
        assert_eq!(title_case("o'neil"), "O'Neil");
    }

    #[test]
    fn test_read_roster() {
        let csv = "given_name,family_name,middle_name,department,faculty\n\
                   ana,JOVANOVIĆ,N/A,rti,etf\n\
                   John,Smith,M,is,fon\n";
        let authors = read_roster(csv.as_bytes()).expect("roster parses");
        assert_eq!(
            authors,
            vec![
                AuthorRecord::new("Ana", "Jovanović", ""),
                AuthorRecord::new("John", "Smith", "M"),
            ]
        );
    }

    #[test]
    fn test_read_roster_missing_family_is_fatal() {
        let csv = "given_name,family_name,middle_name\n\
                   Ana,Jovanović,N/A\n\
                   Marko,,S\n";
        let err = read_roster(csv.as_bytes()).expect_err("row 3 is malformed");
        assert!(matches!(err, BibError::MalformedRoster { line: 3, .. }));
    }

    #[test]
    fn test_read_roster_punctuation_family_is_fatal() {
        let csv = "given_name,family_name,middle_name\n\
                   Ana,Jovanović,N/A\n\
                   Marko,\",\",S\n";
        let err = read_roster(csv.as_bytes()).expect_err("row 3 is malformed");
        assert!(matches!(err, BibError::MalformedRoster { line: 3, .. }));
    }

    #[test]
    fn test_read_papers_with_scopus_headers() {
        let csv = "Document Type,Main Author,Year,Title,Authors,Source title\n\
                   Article,Smith J.M.,2020,Graph Theory Basics,Smith J.M. and Jovanović A.,ICML\n";
        let papers = read_papers(csv.as_bytes()).expect("papers parse");
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].kind, "Article");
        assert_eq!(papers[0].main_author_raw, "Smith J.M.");
        assert_eq!(papers[0].authors_raw, "Smith J.M. and Jovanović A.");
        assert_eq!(papers[0].venue, "ICML");
    }

    #[test]
    fn test_write_cleaned() {
        let papers = vec![CleanedPaper {
            kind: PaperKind::ConferencePaper,
            year: "2020".to_string(),
            title: "Graph Theory Basics".to_string(),
            authors: vec!["John Smith".to_string(), "Ana Jovanović".to_string()],
            venue: "ICML".to_string(),
        }];
        let mut out = Vec::new();
        write_cleaned(&mut out, &papers).expect("write succeeds");
        let text = String::from_utf8(out).expect("utf-8");
        assert_eq!(
            text,
            "type,year,title,authors,venue\n\
             Conference Paper,2020,Graph Theory Basics,\"John Smith, Ana Jovanović\",ICML\n"
        );
    }

    #[test]
    fn test_save_and_load_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let roster_path = dir.path().join("roster.csv");
        std::fs::write(&roster_path, "given_name,family_name,middle_name\nana,jovanović,N/A\n")
            .expect("write roster");
        let authors = load_roster(&roster_path).expect("load roster");
        assert_eq!(authors[0].display_name(), "Ana Jovanović");

        let out_path = dir.path().join("cleaned.csv");
        save_cleaned(&out_path, &[]).expect("save");
        assert!(out_path.exists());
    }
}
