//! Sweep-and-prune pair culling over world-space bounds.

use super::shape::Aabb;

/// Candidate overlapping pairs, found by sorting interval starts along X
/// and sweeping. Pairs come back with the smaller slot index first.
pub fn sweep_and_prune(aabbs: &[Aabb]) -> Vec<(usize, usize)> {
    let mut order: Vec<usize> = (0..aabbs.len()).collect();
    order.sort_by(|&i, &j| aabbs[i].min.x.total_cmp(&aabbs[j].min.x));

    let mut pairs = Vec::new();
    for (sweep_pos, &i) in order.iter().enumerate() {
        for &j in &order[sweep_pos + 1..] {
            if aabbs[j].min.x > aabbs[i].max.x {
                break;
            }
            if aabbs[i].overlaps(&aabbs[j]) {
                pairs.push(if i < j { (i, j) } else { (j, i) });
            }
        }
    }
    pairs
}
