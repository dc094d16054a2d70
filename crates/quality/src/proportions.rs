//! Read-proportion statistics derived from classifier calls.

use sampleqc_core::{ClassifierCall, RawStats};

/// Taxon ID the classifier reports unclassified reads under.
pub const UNCLASSIFIED_TAXON: u64 = 0;

/// Taxon ID of the spike-in control.
pub const SPIKE_IN_TAXON: u64 = 12242;

/// Taxon ID of the human host.
pub const HOST_TAXON: u64 = 9606;

/// Rank code for genus-level calls.
pub const GENUS_RANK: &str = "G";

/// Compute read counts and proportions for a sample.
///
/// Produces `total_reads` plus `count_descendants_*` / `percentage_*` pairs
/// for the unclassified, spike-in, host and genus subsets. A taxon with no
/// call contributes zeros.
pub fn read_proportions(calls: &[ClassifierCall]) -> RawStats {
    let mut stats = RawStats::new();

    let total_reads: u64 = calls.iter().map(|c| c.count_direct).sum();
    stats.insert("total_reads", total_reads as f64);

    for (suffix, taxon) in [
        ("unclassified", UNCLASSIFIED_TAXON),
        ("spike_in", SPIKE_IN_TAXON),
        ("host", HOST_TAXON),
    ] {
        let (count, percentage) = calls
            .iter()
            .find(|c| c.taxon_id == taxon)
            .map(|c| (c.count_descendants as f64, c.percentage))
            .unwrap_or((0.0, 0.0));
        stats.insert(format!("count_descendants_{}", suffix), count);
        stats.insert(format!("percentage_{}", suffix), percentage);
    }

    let genus_reads: u64 = calls
        .iter()
        .filter(|c| c.rank == GENUS_RANK)
        .map(|c| c.count_descendants)
        .sum();
    stats.insert("count_descendants_genus", genus_reads as f64);

    let percentage_genus = if total_reads == 0 {
        0.0
    } else {
        genus_reads as f64 / total_reads as f64 * 100.0
    };
    stats.insert("percentage_genus", percentage_genus);

    stats
}
