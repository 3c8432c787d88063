//! Sorted author roster with template-parameterized binary search.
//!
//! The roster goes through two phases. [`AuthorIndexBuilder`] collects
//! records; [`AuthorIndexBuilder::build`] sorts them once by identity key and
//! hands back an immutable [`AuthorIndex`]. Only the index can be queried, so
//! a lookup against a half-loaded roster cannot be written.
//!
//! Rendered keys do not follow identity-key order once one family name is a
//! word prefix of another (`stankovic i.` sorts before `stankovic ilic m.`),
//! so the index also keeps one permutation per [`Template`], ordered by that
//! template's rendering. Rendered strings themselves are not stored.

use crate::error::{BibError, Result};
use crate::model::AuthorRecord;
use crate::normalize::NameNormalizer;
use tracing::{debug, info};

/// How a roster entry is rendered for comparison against a citation string.
///
/// Every rendering is surname-first and uses normalized name parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    /// `family g.m.`
    FamilyInitials,
    /// `family g.`
    FamilyInitial,
    /// `family given m.`
    FamilyGivenMiddleDot,
    /// `family given`
    FamilyGiven,
    /// `family given m`
    FamilyGivenMiddle,
}

impl Template {
    pub const ALL: [Template; 5] = [
        Template::FamilyInitials,
        Template::FamilyInitial,
        Template::FamilyGivenMiddleDot,
        Template::FamilyGiven,
        Template::FamilyGivenMiddle,
    ];

    fn slot(self) -> usize {
        self as usize
    }

    /// Whether the rendering carries the middle initial.
    pub fn needs_middle(&self) -> bool {
        matches!(
            self,
            Template::FamilyInitials | Template::FamilyGivenMiddleDot | Template::FamilyGivenMiddle
        )
    }

    fn render(&self, entry: &IndexEntry) -> String {
        let given_initial = initial(&entry.given);
        let middle_initial = initial(&entry.middle);
        match self {
            Template::FamilyInitials => {
                format!("{} {}.{}.", entry.family, given_initial, middle_initial)
            }
            Template::FamilyInitial => format!("{} {}.", entry.family, given_initial),
            Template::FamilyGivenMiddleDot => {
                format!("{} {} {}.", entry.family, entry.given, middle_initial)
            }
            Template::FamilyGiven => format!("{} {}", entry.family, entry.given),
            Template::FamilyGivenMiddle => {
                format!("{} {} {}", entry.family, entry.given, middle_initial)
            }
        }
    }
}

fn initial(part: &str) -> &str {
    part.char_indices()
        .nth(1)
        .map(|(end, _)| &part[..end])
        .unwrap_or(part)
}

/// Roster record plus its normalized name parts.
#[derive(Debug, Clone)]
struct IndexEntry {
    record: AuthorRecord,
    given: String,
    family: String,
    middle: String,
}

impl IndexEntry {
    fn identity_key(&self) -> String {
        format!("{} {} {}", self.family, self.given, self.middle)
    }
}

/// Load phase of the roster.
#[derive(Debug, Default)]
pub struct AuthorIndexBuilder {
    normalizer: NameNormalizer,
    entries: Vec<IndexEntry>,
}

impl AuthorIndexBuilder {
    pub fn new(normalizer: NameNormalizer) -> Self {
        Self {
            normalizer,
            entries: Vec::new(),
        }
    }

    /// Add a roster record. Duplicates are kept as separate entries.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the family name is empty.
    pub fn push(&mut self, record: AuthorRecord) -> Result<()> {
        let family = self.normalizer.normalize(&record.family_name);
        if family.is_empty() {
            return Err(BibError::Validation(format!(
                "roster record '{}' has an empty family name",
                record.display_name().trim()
            )));
        }

        self.entries.push(IndexEntry {
            given: self.normalizer.normalize(&record.given_name),
            middle: self.normalizer.normalize(&record.middle_token),
            family,
            record,
        });
        Ok(())
    }

    /// Add every record, stopping at the first invalid one.
    pub fn extend<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = AuthorRecord>,
    {
        for record in records {
            self.push(record)?;
        }
        Ok(())
    }

    /// Sort by identity key and freeze.
    pub fn build(self) -> AuthorIndex {
        let mut keyed: Vec<(String, IndexEntry)> = self
            .entries
            .into_iter()
            .map(|entry| (entry.identity_key(), entry))
            .collect();
        // stable: duplicate identities keep roster order
        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        let entries: Vec<IndexEntry> = keyed.into_iter().map(|(_, entry)| entry).collect();

        // stable again: equal renderings keep identity-key order
        let orders = Template::ALL.map(|template| {
            let mut order: Vec<usize> = (0..entries.len()).collect();
            order.sort_by_cached_key(|&i| template.render(&entries[i]));
            order
        });
        info!(authors = entries.len(), "Author index built");

        AuthorIndex {
            normalizer: self.normalizer,
            entries,
            orders,
        }
    }
}

/// Immutable, sorted roster.
#[derive(Debug)]
pub struct AuthorIndex {
    normalizer: NameNormalizer,
    entries: Vec<IndexEntry>,
    /// Entry positions sorted by rendering, indexed by `Template::slot`
    orders: [Vec<usize>; 5],
}

impl AuthorIndex {
    /// Build an index from an already materialized roster.
    pub fn from_records<I>(normalizer: NameNormalizer, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = AuthorRecord>,
    {
        let mut builder = AuthorIndexBuilder::new(normalizer);
        builder.extend(records)?;
        Ok(builder.build())
    }

    /// The normalizer roster entries were folded with.
    ///
    /// Queries passed to [`AuthorIndex::locate`] must be normalized by it too.
    pub fn normalizer(&self) -> &NameNormalizer {
        &self.normalizer
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in identity-key order.
    pub fn records(&self) -> impl Iterator<Item = &AuthorRecord> {
        self.entries.iter().map(|entry| &entry.record)
    }

    /// Render a record the way [`AuthorIndex::locate`] compares it.
    pub fn render(&self, record: &AuthorRecord, template: Template) -> String {
        let entry = IndexEntry {
            given: self.normalizer.normalize(&record.given_name),
            family: self.normalizer.normalize(&record.family_name),
            middle: self.normalizer.normalize(&record.middle_token),
            record: record.clone(),
        };
        template.render(&entry)
    }

    /// Find the roster entry whose rendering under `template` equals `query`.
    ///
    /// `query` must already be normalized. When several entries render
    /// identically the first one in identity-key order is returned.
    pub fn locate(&self, query: &str, template: Template) -> Option<&AuthorRecord> {
        let order = &self.orders[template.slot()];
        let pos = order.partition_point(|&i| template.render(&self.entries[i]).as_str() < query);

        let entry = &self.entries[*order.get(pos)?];
        if template.render(entry) == query {
            debug!(query, ?template, "Located roster entry");
            Some(&entry.record)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_roster() -> Vec<AuthorRecord> {
        vec![
            AuthorRecord::new("John", "Smith", "M"),
            AuthorRecord::new("Ana", "Jovanović", ""),
            AuthorRecord::new("Marko", "Petrović", "S"),
            AuthorRecord::new("Ivana", "Smith", ""),
            AuthorRecord::new("Đorđe", "Đukić", ""),
        ]
    }

    fn sample_index() -> AuthorIndex {
        AuthorIndex::from_records(NameNormalizer::new(), sample_roster()).expect("valid roster")
    }

    #[test]
    fn test_build_sorts_by_identity_key() {
        let index = sample_index();
        let families: Vec<&str> = index.records().map(|r| r.family_name.as_str()).collect();
        assert_eq!(families, vec!["Đukić", "Jovanović", "Petrović", "Smith", "Smith"]);
        let smiths: Vec<&str> = index
            .records()
            .filter(|r| r.family_name == "Smith")
            .map(|r| r.given_name.as_str())
            .collect();
        assert_eq!(smiths, vec!["Ivana", "John"]);
    }

    #[test]
    fn test_render_templates() {
        let index = sample_index();
        let john = AuthorRecord::new("John", "Smith", "Michael");
        assert_eq!(index.render(&john, Template::FamilyInitials), "smith j.m.");
        assert_eq!(index.render(&john, Template::FamilyInitial), "smith j.");
        assert_eq!(index.render(&john, Template::FamilyGivenMiddleDot), "smith john m.");
        assert_eq!(index.render(&john, Template::FamilyGiven), "smith john");
        assert_eq!(index.render(&john, Template::FamilyGivenMiddle), "smith john m");

        let djordje = AuthorRecord::new("Đorđe", "Đukić", "");
        assert_eq!(index.render(&djordje, Template::FamilyInitial), "djukic d.");
    }

    /// Family names that are word prefixes of one another.
    fn prefix_roster() -> Vec<AuthorRecord> {
        vec![
            AuthorRecord::new("Milena", "Stanković Ilić", "M"),
            AuthorRecord::new("Ivan", "Stanković", "P"),
            AuthorRecord::new("Petar", "Stanković", ""),
            AuthorRecord::new("Jan", "De", "K"),
            AuthorRecord::new("Mira", "De Vries", ""),
            AuthorRecord::new("Hans", "De Vries Berg", "R"),
            AuthorRecord::new("Ørjan", "Ås", "T"),
            AuthorRecord::new("Ǿrn", "Ås Lie", ""),
        ]
    }

    fn assert_round_trip(index: &AuthorIndex) {
        for record in index.records() {
            for template in Template::ALL {
                if template.needs_middle() && record.middle_token.is_empty() {
                    continue;
                }
                let rendered = index.render(record, template);
                assert_eq!(
                    index.locate(&rendered, template),
                    Some(record),
                    "round trip failed for {:?} under {:?} ({:?})",
                    record,
                    template,
                    rendered
                );
            }
        }
    }

    #[test]
    fn test_locate_round_trip() {
        for roster in [sample_roster(), prefix_roster()] {
            let index =
                AuthorIndex::from_records(NameNormalizer::new(), roster).expect("valid roster");
            assert_round_trip(&index);
        }
    }

    #[test]
    fn test_locate_with_prefix_family_names() {
        let index = AuthorIndex::from_records(NameNormalizer::new(), prefix_roster())
            .expect("valid roster");
        let found = index.locate("stankovic i.", Template::FamilyInitial);
        assert_eq!(found.map(|r| r.given_name.as_str()), Some("Ivan"));
        let found = index.locate("stankovic ilic m.", Template::FamilyInitial);
        assert_eq!(found.map(|r| r.given_name.as_str()), Some("Milena"));
        let found = index.locate("de vries m.", Template::FamilyInitial);
        assert_eq!(found.map(|r| r.given_name.as_str()), Some("Mira"));
    }

    #[test]
    fn test_locate_not_found() {
        let index = sample_index();
        assert_eq!(index.locate("smith k.", Template::FamilyInitial), None);
        assert_eq!(index.locate("aaa a.", Template::FamilyInitial), None);
        assert_eq!(index.locate("zzz z.", Template::FamilyInitial), None);
        assert_eq!(index.locate("smith john", Template::FamilyInitial), None);
    }

    #[test]
    fn test_locate_ambiguous_returns_first_in_identity_order() {
        let index = AuthorIndex::from_records(
            NameNormalizer::new(),
            vec![
                AuthorRecord::new("Jovana", "Smith", ""),
                AuthorRecord::new("Jana", "Smith", ""),
                AuthorRecord::new("John", "Smith", ""),
            ],
        )
        .expect("valid roster");

        let found = index.locate("smith j.", Template::FamilyInitial);
        assert_eq!(found.map(|r| r.given_name.as_str()), Some("Jana"));
    }

    #[test]
    fn test_duplicates_retained() {
        let index = AuthorIndex::from_records(
            NameNormalizer::new(),
            vec![
                AuthorRecord::new("Ana", "Jovanović", ""),
                AuthorRecord::new("Ana", "Jovanović", ""),
            ],
        )
        .expect("valid roster");
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_empty_family_rejected() {
        let mut builder = AuthorIndexBuilder::new(NameNormalizer::new());
        let err = builder.push(AuthorRecord::new("Ana", " ", ""));
        assert!(matches!(err, Err(BibError::Validation(_))));
        assert!(builder.build().is_empty());
    }

    #[test]
    fn test_initial() {
        assert_eq!(initial("djordje"), "d");
        assert_eq!(initial(""), "");
        assert_eq!(initial("m"), "m");
    }
}
