//! Result types of element and cluster lookups.

use crate::model::ClusterGroup;
use thiserror::Error;

/// Why a lookup found nothing. Every miss is also reported as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupMiss {
    #[error("unknown threshold '{0}'")]
    UnknownThreshold(String),

    #[error("element '{gid}' not found at threshold '{threshold}'")]
    UnknownElement { threshold: String, gid: String },

    #[error("cluster index {index} out of range at threshold '{threshold}' ({len} clusters)")]
    IndexOutOfRange {
        threshold: String,
        index: usize,
        len: usize,
    },

    #[error("empty element or threshold")]
    EmptyInput,
}

/// The OTUs an external id was removed from at one threshold.
///
/// `positions[i]` is the index of `clusters[i]` in the threshold's OTU list.
/// Repeated positions mean several internal ids of the same external id
/// shared an OTU. `Default` is the empty pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementClusters<'a> {
    pub positions: Vec<usize>,
    pub clusters: Vec<&'a ClusterGroup>,
}

impl<'a> ElementClusters<'a> {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Positions with repeats removed, in first-seen order.
    pub fn distinct_positions(&self) -> Vec<usize> {
        let mut distinct = Vec::with_capacity(self.positions.len());
        for position in &self.positions {
            if !distinct.contains(position) {
                distinct.push(*position);
            }
        }
        distinct
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a ClusterGroup)> + '_ {
        self.positions
            .iter()
            .copied()
            .zip(self.clusters.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_positions() {
        let group = ClusterGroup::from_members(["i1"]);
        let found = ElementClusters {
            positions: vec![2, 0, 2],
            clusters: vec![&group, &group, &group],
        };
        assert_eq!(found.len(), 3);
        assert_eq!(found.distinct_positions(), vec![2, 0]);
        assert_eq!(found.iter().map(|(pos, _)| pos).collect::<Vec<_>>(), vec![2, 0, 2]);
        assert!(ElementClusters::default().is_empty());
    }

    #[test]
    fn test_miss_messages() {
        let miss = LookupMiss::IndexOutOfRange {
            threshold: "0.03".to_string(),
            index: 4,
            len: 2,
        };
        assert_eq!(
            miss.to_string(),
            "cluster index 4 out of range at threshold '0.03' (2 clusters)"
        );
    }
}
