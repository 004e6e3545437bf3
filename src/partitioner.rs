use anyhow::Result;
use bitvec::prelude::*;
use log::info;

use crate::buckets::BucketList;
use crate::hypergraph::{Hypergraph, Index, Side};
use crate::{initial, pass};

/// Mutable per-run state of a partitioning: cell sides, gains and locks,
/// per-net side counts, and the pass bookkeeping. The hypergraph itself
/// stays immutable. All accumulators fit i32 for inputs within the pin
/// bound documented on `Hypergraph`.
pub(crate) struct PartitionState {
    pub(crate) side: Vec<Side>,
    pub(crate) gain: Vec<i32>,
    pub(crate) locked: BitVec,
    pub(crate) count: Vec<[u32; 2]>,
    pub(crate) size: [u32; 2],
    pub(crate) unlocked: [u32; 2],
    pub(crate) buckets: BucketList,
    pub(crate) acc_gain: i32,
    pub(crate) max_acc_gain: i32,
    pub(crate) best_move_num: usize,
    pub(crate) move_stack: Vec<Index>,
}

impl PartitionState {
    pub(crate) fn new(h: &Hypergraph) -> Self {
        PartitionState {
            side: vec![Side::A; h.num_cells()],
            gain: vec![0; h.num_cells()],
            locked: bitvec![usize, Lsb0; 0; h.num_cells()],
            count: vec![[0, 0]; h.num_nets()],
            size: [h.num_cells() as u32, 0],
            unlocked: [0, 0],
            buckets: BucketList::new(h.num_cells(), h.max_pin_count()),
            acc_gain: 0,
            max_acc_gain: 0,
            best_move_num: 0,
            move_stack: vec![],
        }
    }

    /// Rebuilds every net's side counts from the current cell sides.
    pub(crate) fn recount_nets(&mut self, h: &Hypergraph) {
        for n in 0..h.num_nets() {
            let mut count = [0u32; 2];
            for c in h.cells_of(n as Index) {
                count[self.side[c as usize].idx()] += 1;
            }
            self.count[n] = count;
        }
    }

    /// Nets with pins on both sides.
    pub(crate) fn cut_size(&self) -> u32 {
        self.count.iter().filter(|c| c[0] > 0 && c[1] > 0).count() as u32
    }
}

/// Two-way Fiduccia-Mattheyses partitioner over a fixed hypergraph.
/// Single-threaded; one instance owns all run state.
pub struct Partitioner {
    h: Hypergraph,
    r: f64,
    st: PartitionState,
    cut_size: u32,
    num_passes: u32,
}

impl Partitioner {
    /// Sets up a run over `h` with balance factor `r` in (0, 1).
    pub fn build(h: Hypergraph, r: f64) -> Self {
        assert!(r > 0.0 && r < 1.0);
        assert!(h.num_cells() >= 2);
        let st = PartitionState::new(&h);
        Partitioner {
            h,
            r,
            st,
            cut_size: 0,
            num_passes: 0,
        }
    }

    /// Runs the partitioner: deterministic seeding, balance repair, then
    /// passes until one yields no positive best prefix. Each pass ends by
    /// rolling back to its best prefix, so the cut never worsens across
    /// passes. Fails only when the balance window admits no split.
    pub fn partition(&mut self) -> Result<()> {
        initial::seed_by_first_net(&self.h, &mut self.st);
        initial::repair_balance(&self.h, &mut self.st, self.r)?;
        self.st.recount_nets(&self.h);
        info!("initial cut size: {}", self.st.cut_size());

        self.num_passes = 0;
        loop {
            pass::init_pass(&self.h, &mut self.st);
            pass::run_pass(&self.h, &mut self.st, self.r);
            pass::rollback_to_best(&self.h, &mut self.st);
            self.num_passes += 1;
            info!(
                "pass #{}: max gain {}, sum of gain {}",
                self.num_passes, self.st.max_acc_gain, self.st.acc_gain
            );
            if self.st.max_acc_gain <= 0 {
                break;
            }
        }

        self.cut_size = self.st.cut_size();
        info!(
            "final cut size {} after {} passes",
            self.cut_size, self.num_passes
        );
        Ok(())
    }

    /// Cut size as of the last `partition()` run.
    pub fn final_cut_size(&self) -> u32 {
        self.cut_size
    }

    pub fn side_of(&self, c: Index) -> Side {
        self.st.side[c as usize]
    }

    pub fn side_size(&self, side: Side) -> u32 {
        self.st.size[side.idx()]
    }

    /// Passes executed by the last `partition()` run.
    pub fn num_passes(&self) -> u32 {
        self.num_passes
    }

    pub fn hypergraph(&self) -> &Hypergraph {
        &self.h
    }
}
