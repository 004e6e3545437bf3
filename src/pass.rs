use log::trace;

use crate::hypergraph::{Hypergraph, Index, Side};
use crate::partitioner::PartitionState;

/// Resets per-pass state: every cell unlocked on its current side, gains
/// recomputed from net counts, buckets rebuilt, accumulators cleared.
pub(crate) fn init_pass(h: &Hypergraph, st: &mut PartitionState) {
    st.locked.fill(false);
    st.unlocked = st.size;
    initial_gains(h, st);
    st.buckets.clear();
    for c in 0..h.num_cells() as Index {
        st.buckets.insert(c, st.side[c as usize], st.gain[c as usize]);
    }
    st.acc_gain = 0;
    st.max_acc_gain = 0;
    st.best_move_num = 0;
    st.move_stack.clear();
}

/// gain = FS - TE: nets the cell's own side holds with exactly one pin,
/// minus nets with no pin on the far side.
fn initial_gains(h: &Hypergraph, st: &mut PartitionState) {
    for c in 0..h.num_cells() {
        let side = st.side[c];
        let mut gain = 0;
        for n in h.nets_of(c as Index) {
            let count = &st.count[n as usize];
            if count[side.idx()] == 1 {
                gain += 1;
            }
            if count[side.flip().idx()] == 0 {
                gain -= 1;
            }
        }
        st.gain[c] = gain;
    }
}

/// Runs one pass: repeatedly commits the best admissible move until
/// every cell is locked or balance rejects every candidate.
pub(crate) fn run_pass(h: &Hypergraph, st: &mut PartitionState, r: f64) {
    let n = h.num_cells();
    while st.move_stack.len() < n {
        match select_move(st, r, n) {
            Some(c) => commit_move(h, st, c),
            None => break,
        }
    }
}

/// Balance test for moving a cell off `from`: the signed size gap after
/// the move must stay strictly inside r * N.
fn admissible(st: &PartitionState, from: Side, r: f64, n: usize) -> bool {
    let delta = st.size[from.idx()] as i64 - st.size[from.flip().idx()] as i64 - 2;
    (delta.abs() as f64) < r * n as f64
}

/// Picks the next cell to move: the max-gain candidate of the higher-gain
/// side (side A on ties), falling back to the other side when balance
/// rejects it. `None` ends the pass.
fn select_move(st: &PartitionState, r: f64, n: usize) -> Option<Index> {
    match (st.unlocked[0], st.unlocked[1]) {
        (0, 0) => None,
        (_, 0) => {
            let c = st.buckets.max_gain_cell(Side::A)?;
            admissible(st, Side::A, r, n).then_some(c)
        }
        (0, _) => {
            let c = st.buckets.max_gain_cell(Side::B)?;
            admissible(st, Side::B, r, n).then_some(c)
        }
        _ => {
            let a = st.buckets.max_gain_cell(Side::A)?;
            let b = st.buckets.max_gain_cell(Side::B)?;
            let (first, second) = if st.gain[a as usize] >= st.gain[b as usize] {
                ((a, Side::A), (b, Side::B))
            } else {
                ((b, Side::B), (a, Side::A))
            };
            if admissible(st, first.1, r, n) {
                Some(first.0)
            } else if admissible(st, second.1, r, n) {
                Some(second.0)
            } else {
                None
            }
        }
    }
}

/// Commits one move: locks the cell, applies the two-phase critical-net
/// gain updates, then flips the counts, sizes and side. Only nets whose
/// critical state changes touch any other cell's gain.
fn commit_move(h: &Hypergraph, st: &mut PartitionState, c: Index) {
    let from = st.side[c as usize];
    let to = from.flip();

    st.acc_gain += st.gain[c as usize];
    st.locked.set(c as usize, true);
    st.buckets.remove(c);
    st.move_stack.push(c);
    trace!("[{}] {}", st.move_stack.len() - 1, st.acc_gain);

    for n in h.nets_of(c) {
        // Phase 1: critical states on the destination side, before the
        // counts change.
        match st.count[n as usize][to.idx()] {
            0 => {
                for x in h.cells_of(n) {
                    if !st.locked[x as usize] {
                        bump_gain(st, x, 1);
                    }
                }
            }
            1 => {
                for x in h.cells_of(n) {
                    if !st.locked[x as usize] && st.side[x as usize] == to {
                        bump_gain(st, x, -1);
                    }
                }
            }
            _ => {}
        }

        st.count[n as usize][from.idx()] -= 1;
        st.count[n as usize][to.idx()] += 1;

        // Phase 2: critical states on the source side, after.
        match st.count[n as usize][from.idx()] {
            0 => {
                for x in h.cells_of(n) {
                    if !st.locked[x as usize] {
                        bump_gain(st, x, -1);
                    }
                }
            }
            1 => {
                for x in h.cells_of(n) {
                    if !st.locked[x as usize] && st.side[x as usize] == from {
                        bump_gain(st, x, 1);
                    }
                }
            }
            _ => {}
        }
    }

    st.side[c as usize] = to;
    st.size[from.idx()] -= 1;
    st.size[to.idx()] += 1;
    st.unlocked[from.idx()] -= 1;

    if st.acc_gain > st.max_acc_gain {
        st.max_acc_gain = st.acc_gain;
        st.best_move_num = st.move_stack.len();
    }
}

fn bump_gain(st: &mut PartitionState, x: Index, delta: i32) {
    st.gain[x as usize] += delta;
    st.buckets
        .reinsert(x, st.side[x as usize], st.gain[x as usize]);
}

/// Rolls the partition back to the best prefix: moves past it are undone
/// in reverse by flipping sides, then net counts are rebuilt from cell
/// sides rather than by unwinding per-net deltas.
pub(crate) fn rollback_to_best(h: &Hypergraph, st: &mut PartitionState) {
    for i in (st.best_move_num..st.move_stack.len()).rev() {
        let c = st.move_stack[i];
        let side = st.side[c as usize];
        st.side[c as usize] = side.flip();
        st.size[side.idx()] -= 1;
        st.size[side.flip().idx()] += 1;
    }
    st.move_stack.truncate(st.best_move_num);
    st.recount_nets(h);
}
