//! # Cluster Index
//!
//! Reads a mothur list file once and answers threshold-based lookups:
//! which OTUs hold an element at a cutoff, how many OTUs a cutoff declares,
//! and which cutoffs are available.
//!
//! When query ids are given to [`ClusterIndex::read`], their internal ids are
//! cut out of the OTUs and the OTU positions they came from are remembered per
//! cutoff, so a later lookup can tell where a query genome would have landed.

use crate::config::{IndexConfig, IndexSettings, UNIQUE_THRESHOLD};
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::{ClusterError, Result};
use crate::model::{ClusterEntry, ClusterGroup, CutoffKey, IdTranslation, RemovalIndex, Threshold};
use crate::parser::{parse_line, RowLine};
use crate::query::{ElementClusters, LookupMiss};
use crate::render::{render_groups, write_listing, Listing};
use hashbrown::HashMap;
use rustc_hash::FxHashSet;
use std::collections::HashSet;
use std::fmt::{self, Display};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use tracing::instrument;

/// External ids to cut out of their OTUs while reading.
pub type QueryIds = HashSet<String>;

type EntryMap = HashMap<CutoffKey, ClusterEntry>;
type RemovalMap = HashMap<CutoffKey, RemovalIndex>;

/// Threshold-keyed index over one cluster file.
///
/// Filled by [`read`](Self::read), read-only afterwards.
pub struct ClusterIndex {
    settings: IndexSettings,
    translation: IdTranslation,
    diagnostics: Box<dyn Diagnostics>,
    entries: EntryMap,
    removals: RemovalMap,
}

impl fmt::Debug for ClusterIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterIndex")
            .field("settings", &self.settings)
            .field("thresholds", &self.entries.len())
            .field("translations", &self.translation.len())
            .finish_non_exhaustive()
    }
}

impl ClusterIndex {
    /// Create an empty index reporting through `tracing`.
    pub fn new(settings: IndexSettings, translation: IdTranslation) -> Self {
        Self::with_diagnostics(settings, translation, TracingDiagnostics)
    }

    /// Create an empty index with a custom diagnostics sink.
    pub fn with_diagnostics<D>(settings: IndexSettings, translation: IdTranslation, diagnostics: D) -> Self
    where
        D: Diagnostics + 'static,
    {
        Self {
            settings,
            translation,
            diagnostics: Box::new(diagnostics),
            entries: EntryMap::new(),
            removals: RemovalMap::new(),
        }
    }

    /// Validate `config` and create an empty index from it.
    pub fn from_config(config: &IndexConfig, translation: IdTranslation) -> Result<Self> {
        Ok(Self::new(config.validate()?, translation))
    }

    pub fn settings(&self) -> &IndexSettings {
        &self.settings
    }

    pub fn translation(&self) -> &IdTranslation {
        &self.translation
    }

    /// Number of stored cutoffs, `unique` included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored cutoff keys in no particular order.
    pub fn thresholds(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(CutoffKey::as_str)
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Read a mothur list file.
    ///
    /// With `query_ids`, every internal id whose external id is queried is
    /// removed from its OTU and the OTU position is recorded for that external
    /// id. The read is all-or-nothing: on error the index is left untouched.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn read<P: AsRef<Path>>(&mut self, path: P, query_ids: Option<&QueryIds>) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ClusterError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.diagnostics
            .info(&format!("Reading cluster file '{}'", path.display()));
        self.read_reader(BufReader::new(file), query_ids)
    }

    /// Read cluster rows from any buffered source. Same rules as [`read`](Self::read).
    pub fn read_reader<R: BufRead>(&mut self, reader: R, query_ids: Option<&QueryIds>) -> Result<()> {
        let query_ids = query_ids.filter(|ids| !ids.is_empty());
        let mut entries = EntryMap::new();
        let mut removals = RemovalMap::new();

        for (offset, line) in reader.lines().enumerate() {
            let line_number = offset + 1;
            let line = line.map_err(|source| ClusterError::Read {
                line: line_number,
                source,
            })?;

            let row = match parse_line(&line, self.settings.otu_separator()) {
                RowLine::Ignored => continue,
                RowLine::Malformed => {
                    return Err(ClusterError::MalformedRow { line: line_number })
                }
                RowLine::Row(row) => row,
            };

            self.diagnostics
                .debug(&format!("Reading threshold: {}", row.cutoff));

            let mut clusters = row.cluster_groups(self.settings.element_separator());
            let mut removed = RemovalIndex::default();
            if let Some(query_ids) = query_ids {
                excise_queried(&mut clusters, &self.translation, query_ids, &mut removed)?;
            }

            removals.insert(row.cutoff.clone(), removed);
            entries.insert(
                row.cutoff,
                ClusterEntry {
                    reported_count: row.reported_count.to_string(),
                    clusters,
                },
            );
        }

        self.removals = removals;
        self.entries.extend(entries);
        Ok(())
    }

    // =========================================================================
    // Threshold surface
    // =========================================================================

    /// True if `key` is stored exactly as given. No formatting is applied.
    pub fn has_threshold(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Numeric cutoff keys sorted as text, `unique` left out.
    ///
    /// Text order equals numeric order only while all keys share one format,
    /// which holds for files written by a single clustering run.
    fn sorted_numeric_keys(&self) -> Result<Vec<&str>> {
        if !self.entries.contains_key(UNIQUE_THRESHOLD) {
            return Err(ClusterError::MissingUniqueThreshold);
        }
        let mut keys: Vec<&str> = self
            .entries
            .keys()
            .filter(|key| !key.is_unique())
            .map(CutoffKey::as_str)
            .collect();
        keys.sort_unstable();
        Ok(keys)
    }

    /// Highest cutoff, or `unique` if it is the only one.
    pub fn max_threshold(&self) -> Result<&str> {
        let keys = self.sorted_numeric_keys()?;
        Ok(keys.last().copied().unwrap_or(UNIQUE_THRESHOLD))
    }

    /// All cutoffs sorted; `unique` leads ascending lists and ends descending ones.
    pub fn sorted_thresholds(&self, reverse: bool) -> Result<Vec<&str>> {
        let mut keys = self.sorted_numeric_keys()?;
        if reverse {
            keys.reverse();
            keys.push(UNIQUE_THRESHOLD);
        } else {
            keys.insert(0, UNIQUE_THRESHOLD);
        }
        Ok(keys)
    }

    /// Cutoffs usable for prediction at or above `minimum`, ascending.
    ///
    /// A decimal key qualifies when its value rounded to the configured
    /// precision is `>= minimum` and that rounded value is itself one of the
    /// stored values. The second check drops keys that only round into a
    /// distinct cutoff.
    pub fn prediction_thresholds(&self, minimum: f64) -> Result<Vec<f64>> {
        if !(0.0..=1.0).contains(&minimum) {
            return Err(ClusterError::MinimumOutOfRange(minimum));
        }

        let values: Vec<f64> = self
            .entries
            .keys()
            .filter(|key| key.is_decimal())
            .filter_map(|key| match key.as_str().parse::<f64>() {
                Ok(value) => Some(value),
                Err(_) => {
                    self.diagnostics
                        .warning(&format!("Skipping non-numeric cutoff: {}", key));
                    None
                }
            })
            .collect();

        let mut subset: Vec<f64> = values
            .iter()
            .map(|value| self.settings.round(*value))
            .filter(|rounded| *rounded >= minimum && values.contains(rounded))
            .collect();
        subset.sort_by(f64::total_cmp);
        subset.dedup();
        Ok(subset)
    }

    // =========================================================================
    // Element and cluster lookups
    // =========================================================================

    fn entry(&self, key: &str) -> std::result::Result<&ClusterEntry, LookupMiss> {
        self.entries.get(key).ok_or_else(|| {
            self.diagnostics.error(&format!("Bad cutoff: {}", key));
            LookupMiss::UnknownThreshold(key.to_string())
        })
    }

    fn removal_positions(&self, key: &str, gid: &str) -> std::result::Result<&[usize], LookupMiss> {
        let Some(removed) = self.removals.get(key) else {
            let mut available: Vec<&str> = self.removals.keys().map(CutoffKey::as_str).collect();
            available.sort_unstable();
            self.diagnostics.error(&format!(
                "Cutoff key error: {}\nAvailable keys: '{}'",
                key,
                available.join(",")
            ));
            return Err(LookupMiss::UnknownThreshold(key.to_string()));
        };
        match removed.get(gid) {
            Some(positions) => Ok(positions.as_slice()),
            None => {
                self.diagnostics
                    .debug(&format!("{} not found in {}", gid, key));
                Err(LookupMiss::UnknownElement {
                    threshold: key.to_string(),
                    gid: gid.to_string(),
                })
            }
        }
    }

    /// True if `gid` was removed from some OTU at `threshold`.
    ///
    /// `Threshold::Unique` is looked up as is; values are formatted to the
    /// configured precision first.
    pub fn element_exists(&self, threshold: impl Into<Threshold>, gid: &str) -> bool {
        let key = self.settings.format_threshold(threshold.into());
        self.removal_positions(&key, gid).is_ok()
    }

    /// One OTU by position. `key` must be a stored key; it is not formatted.
    pub fn cluster_at_index(
        &self,
        key: &str,
        index: usize,
    ) -> std::result::Result<&ClusterGroup, LookupMiss> {
        let entry = self.entry(key)?;
        entry.clusters.get(index).ok_or_else(|| {
            self.diagnostics
                .error(&format!("Bad cluster index: {}", index));
            LookupMiss::IndexOutOfRange {
                threshold: key.to_string(),
                index,
                len: entry.clusters.len(),
            }
        })
    }

    /// Positions and OTUs `gid` was removed from at `threshold`.
    ///
    /// Callers wanting the empty pair on a miss can use `unwrap_or_default()`.
    pub fn clusters_for_element(
        &self,
        threshold: impl Into<Threshold>,
        gid: &str,
    ) -> std::result::Result<ElementClusters<'_>, LookupMiss> {
        let key = self.settings.format_threshold(threshold.into());
        let entry = self.entry(&key)?;

        if gid.trim().is_empty() {
            self.diagnostics
                .warning(&format!("Bad element: {} in {}", gid, key));
            return Err(LookupMiss::EmptyInput);
        }

        let positions = self.removal_positions(&key, gid).map_err(|miss| {
            self.diagnostics
                .warning(&format!("Bad element: {} in {}", gid, key));
            miss
        })?;

        let found = ElementClusters {
            positions: positions.to_vec(),
            // Positions come from enumerating this entry's OTUs in the same pass.
            clusters: positions.iter().map(|&index| &entry.clusters[index]).collect(),
        };

        let distinct = found.distinct_positions();
        if distinct.len() > 1 {
            let listed: Vec<String> = distinct.iter().map(usize::to_string).collect();
            self.diagnostics.debug(&format!(
                "{}: Multiple elements found. {}: {}",
                key,
                gid,
                listed.join(", ")
            ));
        }
        Ok(found)
    }

    /// External ids removed at `threshold`, sorted.
    pub fn removed_elements(
        &self,
        threshold: impl Into<Threshold>,
    ) -> std::result::Result<Vec<&str>, LookupMiss> {
        let key = self.settings.format_threshold(threshold.into());
        let Some(removed) = self.removals.get(key.as_str()) else {
            self.diagnostics.error(&format!("Bad cutoff: {}", key));
            return Err(LookupMiss::UnknownThreshold(key));
        };
        let mut gids: Vec<&str> = removed.keys().map(String::as_str).collect();
        gids.sort_unstable();
        Ok(gids)
    }

    /// All OTUs at `threshold`, after query removal.
    pub fn clusters_at_threshold(
        &self,
        threshold: impl Into<Threshold>,
    ) -> std::result::Result<&[ClusterGroup], LookupMiss> {
        let key = self.settings.format_threshold(threshold.into());
        Ok(&self.entry(&key)?.clusters)
    }

    /// OTU count as declared in the file. Not recomputed.
    pub fn cluster_count(
        &self,
        threshold: impl Into<Threshold>,
    ) -> std::result::Result<&str, LookupMiss> {
        let key = self.settings.format_threshold(threshold.into());
        Ok(&self.entry(&key)?.reported_count)
    }

    /// The threshold on one line, then one line per OTU.
    pub fn render_clusters_at_threshold(
        &self,
        threshold: impl Into<Threshold>,
    ) -> std::result::Result<String, LookupMiss> {
        let key = self.settings.format_threshold(threshold.into());
        let entry = self.entry(&key)?;
        Ok(render_groups(&key, &entry.clusters))
    }

    /// Write a listing wrapped to the configured width.
    pub fn write_listing<W, K, V>(&self, listing: Listing<'_, K, V>, stream: &mut W) -> io::Result<()>
    where
        W: Write + ?Sized,
        K: Display,
        V: Display,
    {
        write_listing(listing, stream, self.settings.wrap_width())
    }
}

/// Cut queried ids out of `groups`, recording the group position per external id.
///
/// The position advances once per group whether or not anything was removed,
/// so recorded positions always index into `groups`.
fn excise_queried(
    groups: &mut [ClusterGroup],
    translation: &IdTranslation,
    query_ids: &QueryIds,
    removed: &mut RemovalIndex,
) -> Result<()> {
    for (position, group) in groups.iter_mut().enumerate() {
        let mut queried: FxHashSet<String> = FxHashSet::default();
        for iid in group.iter() {
            let gid = translation.gid_of(iid)?;
            if !query_ids.contains(gid) {
                continue;
            }
            queried.insert(iid.to_string());
            removed.entry(gid.to_string()).or_default().push(position);
        }
        if !queried.is_empty() {
            group.retain(|iid| !queried.contains(iid));
        }
    }
    Ok(())
}
