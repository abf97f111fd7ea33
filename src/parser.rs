//! # Cluster File Rows
//!
//! Line classification and field splitting for mothur list files:
//!
//! ```text
//! label   numOtus  Otu1      Otu2
//! unique  3        i1        i2,i3
//! 0.03    2        i1,i2,i3
//! ```

use crate::config::{COMMENT_PREFIX, HEADER_PREFIX};
use crate::model::{ClusterGroup, CutoffKey};

/// One data row split into its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterRow<'a> {
    pub cutoff: CutoffKey,
    pub reported_count: &'a str,
    /// Raw OTU fields, still joined by the element separator
    pub groups: Vec<&'a str>,
}

impl<'a> ClusterRow<'a> {
    /// Deduplicated OTUs of the row, in file order.
    pub fn cluster_groups(&self, element_separator: &str) -> Vec<ClusterGroup> {
        self.groups
            .iter()
            .map(|raw| ClusterGroup::parse(raw, element_separator))
            .collect()
    }
}

/// Outcome of looking at one line of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowLine<'a> {
    /// Blank, comment or header line
    Ignored,
    Row(ClusterRow<'a>),
    /// Fewer than two fields
    Malformed,
}

/// True for lines that carry no cluster data.
pub fn is_ignored(line: &str) -> bool {
    line.is_empty() || line.starts_with(COMMENT_PREFIX) || line.starts_with(HEADER_PREFIX)
}

/// Classify and split a line. Surrounding whitespace is trimmed first.
pub fn parse_line<'a>(line: &'a str, otu_separator: &str) -> RowLine<'a> {
    let line = line.trim();
    if is_ignored(line) {
        return RowLine::Ignored;
    }

    let mut fields = line.split(otu_separator);
    let (Some(cutoff), Some(reported_count)) = (fields.next(), fields.next()) else {
        return RowLine::Malformed;
    };

    RowLine::Row(ClusterRow {
        cutoff: CutoffKey::from_raw(cutoff),
        reported_count,
        groups: fields.collect(),
    })
}
