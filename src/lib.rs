//! Two-way hypergraph partitioning with the Fiduccia-Mattheyses
//! heuristic: gain buckets with O(1) updates, balance-constrained moves,
//! and rollback to the best prefix of each pass.

mod buckets;
mod hypergraph;
mod initial;
pub mod parser;
mod pass;
mod partitioner;
pub mod writer;

use anyhow::Result;

pub use hypergraph::{Hypergraph, HypergraphBuilder, Index, Side};
pub use partitioner::Partitioner;

/// Parses a netlist and partitions it in one step.
pub fn partition_netlist(input: &str) -> Result<Partitioner> {
    let (h, r) = parser::parse_netlist(input)?;
    let mut p = Partitioner::build(h, r);
    p.partition()?;
    Ok(p)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::prelude::*;
    use rayon::prelude::*;

    use super::*;

    fn random_netlist(seed: u64) -> String {
        let mut rng = StdRng::seed_from_u64(seed);
        let num_cells = rng.gen_range(8..60);
        let num_nets = rng.gen_range(4..40);
        let mut input = String::from("0.4\n");
        for n in 0..num_nets {
            input += &format!("NET n{}", n);
            for _ in 0..rng.gen_range(2..=5) {
                input += &format!(" c{}", rng.gen_range(0..num_cells));
            }
            input += " ;\n";
        }
        input
    }

    #[test]
    fn random_hypergraphs_partition_cleanly() {
        (0..32u64).into_par_iter().for_each(|seed| {
            let input = random_netlist(seed);
            let part = partition_netlist(&input).unwrap();
            let h = part.hypergraph();
            let n = h.num_cells();

            // reported cut matches a recount over reported sides
            let cut = (0..h.num_nets() as Index)
                .filter(|&net| {
                    let sides: BTreeSet<_> =
                        h.cells_of(net).map(|c| part.side_of(c) == Side::A).collect();
                    sides.len() == 2
                })
                .count() as u32;
            assert_eq!(cut, part.final_cut_size(), "seed {}", seed);

            // both sides inside the balance window, covering every cell
            let lo = (1.0 - 0.4) / 2.0 * n as f64;
            let hi = (1.0 + 0.4) / 2.0 * n as f64;
            for side in [Side::A, Side::B] {
                let s = part.side_size(side) as f64;
                assert!(s >= lo && s <= hi, "seed {}: {} cells on {:?}", seed, s, side);
            }
            assert_eq!(
                part.side_size(Side::A) + part.side_size(Side::B),
                n as u32
            );

            // writer round trip: every cell listed exactly once
            let mut out = Vec::new();
            writer::write_result(&mut out, &part).unwrap();
            let text = String::from_utf8(out).unwrap();
            let lines: Vec<_> = text.lines().collect();
            assert_eq!(lines.len(), 5);
            let g1: Vec<_> = lines[2].split_whitespace().collect();
            let g2: Vec<_> = lines[4].split_whitespace().collect();
            assert_eq!(g1.last(), Some(&";"));
            assert_eq!(g2.last(), Some(&";"));
            let mut seen = BTreeSet::new();
            for name in g1[..g1.len() - 1].iter().chain(&g2[..g2.len() - 1]) {
                assert!(seen.insert(*name), "seed {}: {} listed twice", seed, name);
            }
            assert_eq!(seen.len(), n, "seed {}", seed);
        });
    }
}
