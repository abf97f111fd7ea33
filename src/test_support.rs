use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

/// Rows from the lookup examples: four internal ids of four genomes.
#[allow(dead_code)]
pub const QUERY_FIXTURE: &str = "\
label\tnumOtus\tOtu1\tOtu2\tOtu3\tOtu4
unique\t4\ti1\ti2\ti3\ti4
0.01\t2\ti1,i2\ti3,i4
";

#[allow(dead_code)]
pub fn query_translation() -> Vec<(String, String)> {
    (1..=4)
        .map(|i| (format!("i{}", i), format!("g{}", i)))
        .collect()
}

/// A synthetic mothur list file and the genome of every sequence in it.
#[derive(Debug, Clone)]
pub struct GeneratedClusters {
    pub content: String,
    /// Internal id -> external id
    #[allow(dead_code)]
    pub translation: Vec<(String, String)>,
    /// Cutoffs in file order, `unique` first
    #[allow(dead_code)]
    pub cutoffs: Vec<String>,
    #[allow(dead_code)]
    pub element_count: usize,
}

/// Generate a hierarchical clustering of `element_count` sequences.
///
/// The first row is `unique`; every following cutoff merges neighbouring
/// OTUs of the previous row with probability `merge_probability`, so each
/// row is a coarser partition of the same sequences.
pub fn generate_clusters(
    element_count: usize,
    genome_count: usize,
    cutoffs: &[&str],
    merge_probability: f64,
    seed: u64,
) -> GeneratedClusters {
    let mut rng = StdRng::seed_from_u64(seed);
    let genome_count = genome_count.max(1);

    let translation: Vec<(String, String)> = (0..element_count)
        .map(|i| (format!("s{:06}", i), format!("g{:04}", i % genome_count)))
        .collect();

    let mut level: Vec<Vec<String>> = translation
        .iter()
        .map(|(iid, _)| vec![iid.clone()])
        .collect();

    let mut content = String::from("label\tnumOtus\n");
    let mut written = Vec::with_capacity(cutoffs.len() + 1);

    push_row(&mut content, "unique", &level);
    written.push("unique".to_string());

    for cutoff in cutoffs {
        let mut merged: Vec<Vec<String>> = Vec::with_capacity(level.len());
        for otu in level.drain(..) {
            let merge = !merged.is_empty() && rng.random_bool(merge_probability);
            if let (true, Some(previous)) = (merge, merged.last_mut()) {
                previous.extend(otu);
                continue;
            }
            merged.push(otu);
        }
        level = merged;
        push_row(&mut content, cutoff, &level);
        written.push(cutoff.to_string());
    }

    GeneratedClusters {
        content,
        translation,
        cutoffs: written,
        element_count,
    }
}

fn push_row(content: &mut String, cutoff: &str, otus: &[Vec<String>]) {
    content.push_str(cutoff);
    content.push('\t');
    content.push_str(&otus.len().to_string());
    for otu in otus {
        content.push('\t');
        content.push_str(&otu.join(","));
    }
    content.push('\n');
}

/// Write `content` to `name` inside `dir` and return the path.
#[allow(dead_code)]
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}
