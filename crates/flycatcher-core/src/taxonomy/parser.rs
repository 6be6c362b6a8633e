//! Taxonomy CSV parsers
//!
//! The eBird taxonomy export is positional: column 1 holds the common name,
//! column 2 the species code, column 8 the order and column 9 the family.
//! Rows with fewer than [`MIN_FIELDS`] columns are skipped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::entry::{TaxonomyEntry, TaxonomyTable};

const COMMON_NAME_COLUMN: usize = 1;
const CODE_COLUMN: usize = 2;
const ORDER_COLUMN: usize = 8;
const FAMILY_COLUMN: usize = 9;

/// Minimum number of columns for a row to be usable
pub const MIN_FIELDS: usize = 10;

/// Turns raw taxonomy text into a lookup table
pub trait TaxonomyParser: Send + Sync {
    fn parse(&self, raw: &str) -> TaxonomyTable;
}

/// Splits every line on `,` without honoring CSV quoting.
///
/// A quoted field containing a comma shifts the remaining columns of that
/// row. This matches the output existing deployments produce.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaiveParser;

impl TaxonomyParser for NaiveParser {
    fn parse(&self, raw: &str) -> TaxonomyTable {
        let mut table = TaxonomyTable::new();

        // `lines()` also drops a trailing `\r`, so CRLF downloads parse the
        // same as LF ones instead of leaving `\r` on the family column
        for line in raw.trim().lines().skip(1) {
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() < MIN_FIELDS {
                continue;
            }

            insert_row(&mut table, |i| strip_quotes(fields[i]));
        }

        table
    }
}

/// Quote-aware parser backed by the `csv` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvParser;

impl TaxonomyParser for CsvParser {
    fn parse(&self, raw: &str) -> TaxonomyTable {
        let mut table = TaxonomyTable::new();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(raw.trim().as_bytes());

        for record in reader.records() {
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    debug!("Skipping unreadable taxonomy row: {}", e);
                    continue;
                }
            };

            if record.len() < MIN_FIELDS {
                continue;
            }

            insert_row(&mut table, |i| record.get(i).unwrap_or_default());
        }

        table
    }
}

fn insert_row<'a>(table: &mut TaxonomyTable, field: impl Fn(usize) -> &'a str) {
    let code = field(CODE_COLUMN).to_string();
    table.insert(
        code.clone(),
        TaxonomyEntry {
            code,
            common_name: field(COMMON_NAME_COLUMN).to_string(),
            order: field(ORDER_COLUMN).to_string(),
            family: field(FAMILY_COLUMN).to_string(),
        },
    );
}

/// Remove one leading and one trailing `"`, if present
fn strip_quotes(field: &str) -> &str {
    let field = field.strip_prefix('"').unwrap_or(field);
    field.strip_suffix('"').unwrap_or(field)
}

/// Error type for parsing a parser kind
#[derive(Debug, Clone)]
pub struct ParseParserKindError(String);

impl fmt::Display for ParseParserKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid taxonomy parser: {}", self.0)
    }
}

impl std::error::Error for ParseParserKindError {}

/// Selects which parser the cache uses
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    /// Plain comma split
    #[default]
    Naive,
    /// Quote-aware CSV
    Csv,
}

impl ParserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParserKind::Naive => "naive",
            ParserKind::Csv => "csv",
        }
    }

    pub fn parser(&self) -> Box<dyn TaxonomyParser> {
        match self {
            ParserKind::Naive => Box::new(NaiveParser),
            ParserKind::Csv => Box::new(CsvParser),
        }
    }
}

impl FromStr for ParserKind {
    type Err = ParseParserKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "naive" => Ok(ParserKind::Naive),
            "csv" => Ok(ParserKind::Csv),
            _ => Err(ParseParserKindError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "SCIENTIFIC_NAME,COMMON_NAME,SPECIES_CODE,CATEGORY,TAXON_ORDER,\
        COM_NAME_CODES,SCI_NAME_CODES,BANDING_CODES,ORDER,FAMILY_COM_NAME,FAMILY_SCI_NAME";

    fn fixture(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    #[test]
    fn test_parses_positional_columns() {
        let raw = fixture(&[
            "\"Turdus migratorius\",\"American Robin\",\"amerob\",species,27123,AMRO,TUMI,AMRO,\"Passeriformes\",\"Thrushes and Allies\",\"Turdidae\"",
        ]);

        let table = NaiveParser.parse(&raw);
        let entry = table.get("amerob").unwrap();
        assert_eq!(entry.code, "amerob");
        assert_eq!(entry.common_name, "American Robin");
        assert_eq!(entry.order, "Passeriformes");
        assert_eq!(entry.family, "Thrushes and Allies");
    }

    #[test]
    fn test_strips_one_layer_of_quotes() {
        assert_eq!(strip_quotes("\"Turdus migratorius\""), "Turdus migratorius");
        assert_eq!(strip_quotes("\"\"nested\"\""), "\"nested\"");
        assert_eq!(strip_quotes("plain"), "plain");
        assert_eq!(strip_quotes("\"open"), "open");
        assert_eq!(strip_quotes("\""), "");
    }

    #[test]
    fn test_header_is_discarded() {
        // A header shaped like a data row must not become an entry
        let raw = "x,Header Name,hdrcode,c,d,e,f,g,Order,Family\n\
                   x,Cape Sparrow,capspa1,c,d,e,f,g,Passeriformes,Passeridae";
        let table = NaiveParser.parse(raw);
        assert_eq!(table.len(), 1);
        assert!(table.contains_key("capspa1"));
        assert!(!table.contains_key("hdrcode"));
    }

    #[test]
    fn test_short_and_blank_rows_are_skipped() {
        let raw = fixture(&[
            "x,Too Short,short1,c,d",
            "",
            "   ",
            "x,Hadada Ibis,hadibi1,c,d,e,f,g,Pelecaniformes,Ibises and Spoonbills",
            "x,Nine,nine1,c,d,e,f,g,Order",
            "x,Cape Sparrow,capspa1,c,d,e,f,g,Passeriformes,Old World Sparrows",
        ]);

        let table = NaiveParser.parse(&raw);
        assert_eq!(table.len(), 2);
        assert!(table.contains_key("hadibi1"));
        assert!(table.contains_key("capspa1"));
        assert!(!table.contains_key("short1"));
        assert!(!table.contains_key("nine1"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let raw = "h,h,h,h,h,h,h,h,h,h\r\nx,Hadada Ibis,hadibi1,c,d,e,f,g,Pelecaniformes,\"Ibises\"\r\n";
        let table = NaiveParser.parse(raw);
        assert_eq!(table.get("hadibi1").unwrap().family, "Ibises");
    }

    #[test]
    fn test_later_rows_overwrite_earlier_ones() {
        let raw = fixture(&[
            "x,Old Name,dupe1,c,d,e,f,g,OrderA,FamilyA",
            "x,New Name,dupe1,c,d,e,f,g,OrderB,FamilyB",
        ]);

        let table = NaiveParser.parse(&raw);
        assert_eq!(table.len(), 1);
        assert_eq!(table["dupe1"].common_name, "New Name");
        assert_eq!(table["dupe1"].family, "FamilyB");
    }

    #[test]
    fn test_quoted_comma_naive_vs_csv() {
        let raw = fixture(&[
            "\"Sci name\",\"Robin, American\",\"amerob\",species,1,a,b,c,\"Passeriformes\",\"Turdidae\",\"Turdidae\"",
        ]);

        // The naive split shifts every column after the embedded comma
        let naive = NaiveParser.parse(&raw);
        assert!(!naive.contains_key("amerob"));

        let csv = CsvParser.parse(&raw);
        let entry = csv.get("amerob").unwrap();
        assert_eq!(entry.common_name, "Robin, American");
        assert_eq!(entry.order, "Passeriformes");
        assert_eq!(entry.family, "Turdidae");
    }

    #[test]
    fn test_csv_parser_skips_short_rows() {
        let raw = fixture(&[
            "x,Too Short,short1",
            "x,Cape Sparrow,capspa1,c,d,e,f,g,Passeriformes,Passeridae",
        ]);
        let table = CsvParser.parse(&raw);
        assert_eq!(table.len(), 1);
        assert!(table.contains_key("capspa1"));
    }

    #[test]
    fn test_parser_kind_from_str() {
        assert_eq!("naive".parse::<ParserKind>().unwrap(), ParserKind::Naive);
        assert_eq!("CSV".parse::<ParserKind>().unwrap(), ParserKind::Csv);
        assert!("xml".parse::<ParserKind>().is_err());
        assert_eq!(ParserKind::default().as_str(), "naive");
    }
}
