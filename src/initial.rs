use anyhow::{bail, Result};
use log::debug;

use crate::hypergraph::{Hypergraph, Index, Side};
use crate::partitioner::PartitionState;

/// Seeds the partition by grouping cells that share a first-seen net:
/// walking cells in ID order, the side flips whenever the leading net
/// changes. Deterministic, so identical inputs replay identical runs.
pub(crate) fn seed_by_first_net(h: &Hypergraph, st: &mut PartitionState) {
    let mut side = Side::A;
    let mut group = h.first_net(0);
    st.size = [0, 0];
    for c in 0..h.num_cells() as Index {
        let first = h.first_net(c);
        if first != group {
            side = side.flip();
            group = first;
        }
        st.side[c as usize] = side;
        st.size[side.idx()] += 1;
    }
}

/// Whether both side sizes lie in the closed balance window
/// [(1-r)/2 * N, (1+r)/2 * N].
pub(crate) fn balanced(size: [u32; 2], n: usize, r: f64) -> bool {
    let lo = (1.0 - r) / 2.0 * n as f64;
    let hi = (1.0 + r) / 2.0 * n as f64;
    size.iter().all(|&s| (s as f64) >= lo && (s as f64) <= hi)
}

/// Flips cells from the larger side, in ID order, until the partition
/// sits inside the balance window. Returns the number of flips.
///
/// Infeasibility is decided up front: the window admits a split iff it
/// contains an integer. On failure the seed partition is left untouched.
pub(crate) fn repair_balance(h: &Hypergraph, st: &mut PartitionState, r: f64) -> Result<u32> {
    let n = h.num_cells();
    let lo = ((1.0 - r) / 2.0 * n as f64).ceil() as i64;
    let hi = ((1.0 + r) / 2.0 * n as f64).floor() as i64;
    if lo > hi {
        bail!("balance factor {} admits no legal split of {} cells", r, n);
    }

    let mut flips = 0u32;
    while !balanced(st.size, n, r) {
        let larger = if st.size[0] > st.size[1] {
            Side::A
        } else {
            Side::B
        };
        debug!(
            "re-balancing initial partition ({}/{} cells)",
            st.size[0], st.size[1]
        );
        for c in 0..n as Index {
            if balanced(st.size, n, r) {
                break;
            }
            if st.side[c as usize] == larger {
                st.side[c as usize] = larger.flip();
                st.size[larger.idx()] -= 1;
                st.size[larger.flip().idx()] += 1;
                flips += 1;
            }
        }
    }
    Ok(flips)
}
