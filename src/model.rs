//! # Data Model
//!
//! Threshold keys, OTU groups and the identifier translation table.
//!
//! Thresholds come in two tiers. A [`CutoffKey`] is a key exactly as read from
//! the cluster file; a [`Threshold`] is what callers ask for and is formatted to
//! the configured precision before lookup. The two are deliberately not merged
//! into one numeric type.

use crate::config::UNIQUE_THRESHOLD;
use crate::error::ClusterError;
use rustc_hash::{FxHashMap, FxHashSet};
use std::borrow::Borrow;
use std::fmt;

/// A cutoff key as stored from the cluster file.
///
/// Integer tokens are rewritten to float form (`"1"` -> `"1.0"`); every other
/// token, `unique` included, is kept verbatim and never re-rounded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CutoffKey(String);

impl CutoffKey {
    /// Normalize a raw cutoff token from the file.
    pub fn from_raw(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(value) = raw.parse::<f64>() {
                return Self(float_repr(value));
            }
        }
        Self(raw.to_string())
    }

    pub fn unique() -> Self {
        Self(UNIQUE_THRESHOLD.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unique(&self) -> bool {
        self.0 == UNIQUE_THRESHOLD
    }

    /// True for keys carrying a decimal point, i.e. numeric cutoffs.
    pub fn is_decimal(&self) -> bool {
        self.0.contains('.')
    }
}

impl Borrow<str> for CutoffKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CutoffKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shortest float text that keeps a fractional part: `1` -> `1.0`.
fn float_repr(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{:?}", value)
    }
}

/// A threshold supplied by a caller at query time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Threshold {
    /// The finest level; passes through without formatting
    #[default]
    Unique,
    /// A similarity cutoff, formatted to the configured precision
    Value(f64),
}

impl From<f64> for Threshold {
    fn from(value: f64) -> Self {
        Threshold::Value(value)
    }
}

/// One OTU: a deduplicated set of internal identifiers.
///
/// First-occurrence order is kept for display; equality ignores order.
#[derive(Debug, Clone, Default, Eq)]
pub struct ClusterGroup {
    members: Vec<String>,
}

impl ClusterGroup {
    /// Build a group from a separator-joined member list, dropping repeats.
    pub fn parse(raw: &str, element_separator: &str) -> Self {
        Self::from_members(raw.split(element_separator))
    }

    pub fn from_members<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = FxHashSet::default();
        let mut kept = Vec::new();
        for member in members {
            let member = member.into();
            if seen.insert(member.clone()) {
                kept.push(member);
            }
        }
        Self { members: kept }
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }

    pub fn contains(&self, iid: &str) -> bool {
        self.members.iter().any(|member| member == iid)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&String) -> bool,
    {
        self.members.retain(keep);
    }

    /// Members joined for display.
    pub fn join(&self, separator: &str) -> String {
        self.members.join(separator)
    }
}

impl PartialEq for ClusterGroup {
    fn eq(&self, other: &Self) -> bool {
        self.members.len() == other.members.len()
            && self.members.iter().all(|member| other.contains(member))
    }
}

/// All OTUs of one cutoff together with the count the file declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterEntry {
    /// Count token as written in the file; not checked against `clusters`
    pub reported_count: String,
    pub clusters: Vec<ClusterGroup>,
}

/// External id -> positions of the OTUs it was removed from, for one cutoff.
///
/// Positions are kept in removal order, repeats included.
pub type RemovalIndex = FxHashMap<String, Vec<usize>>;

/// Internal id -> external id table supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdTranslation {
    iid_to_gid: FxHashMap<String, String>,
}

impl IdTranslation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, iid: impl Into<String>, gid: impl Into<String>) {
        self.iid_to_gid.insert(iid.into(), gid.into());
    }

    /// External id of an internal id; a miss is a contract violation.
    pub fn gid_of(&self, iid: &str) -> Result<&str, ClusterError> {
        self.iid_to_gid
            .get(iid)
            .map(String::as_str)
            .ok_or_else(|| ClusterError::MissingTranslation(iid.to_string()))
    }

    /// Translate a whole OTU, failing on the first unknown id.
    pub fn gids_of<'a, I>(&self, iids: I) -> Result<Vec<&str>, ClusterError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        iids.into_iter().map(|iid| self.gid_of(iid)).collect()
    }

    pub fn len(&self) -> usize {
        self.iid_to_gid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iid_to_gid.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for IdTranslation
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            iid_to_gid: iter
                .into_iter()
                .map(|(iid, gid)| (iid.into(), gid.into()))
                .collect(),
        }
    }
}

impl<S: std::hash::BuildHasher> From<std::collections::HashMap<String, String, S>>
    for IdTranslation
{
    fn from(map: std::collections::HashMap<String, String, S>) -> Self {
        map.into_iter().collect()
    }
}
