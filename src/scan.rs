use crate::gene_model::GeneInterval;
use crate::variant_index::VariantIndex;

/// Return the first indexed position contained in the interval.
///
/// The chromosome's position list is scanned in stored (file) order and the
/// scan stops at the first position with `tx_start <= p <= tx_end`, bounds
/// inclusive on both ends. There is no guarantee of lowest or highest
/// position when several qualify; first-in-file-order wins.
pub fn scan_interval(index: &VariantIndex, gene: &GeneInterval) -> Option<u64> {
    index
        .positions_for(&gene.chromosome)
        .iter()
        .copied()
        .find(|&p| gene.tx_start <= p && p <= gene.tx_end)
}
