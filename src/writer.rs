use std::io::Write;

use anyhow::Result;
use itertools::Itertools;

use crate::hypergraph::{Hypergraph, Index, Side};
use crate::partitioner::Partitioner;

/// Writes the partition result:
///
/// ```text
/// Cutsize = <n>
/// G1 <size of A>
/// <names> ;
/// G2 <size of B>
/// <names> ;
/// ```
///
/// Group members appear in dense-ID order, i.e. input order.
pub fn write_result<W: Write>(out: &mut W, part: &Partitioner) -> Result<()> {
    let h = part.hypergraph();
    writeln!(out, "Cutsize = {}", part.final_cut_size())?;
    for (label, side) in [("G1", Side::A), ("G2", Side::B)] {
        writeln!(out, "{} {}", label, part.side_size(side))?;
        let names = (0..h.num_cells() as Index)
            .filter(|&c| part.side_of(c) == side)
            .map(|c| h.cell_name(c))
            .join(" ");
        writeln!(out, "{} ;", names)?;
    }
    Ok(())
}

/// Lists every net with its member cells, one line per net.
pub fn report_nets<W: Write>(out: &mut W, h: &Hypergraph) -> Result<()> {
    writeln!(out, "Number of nets: {}", h.num_nets())?;
    for n in 0..h.num_nets() as Index {
        let cells = h.cells_of(n).map(|c| h.cell_name(c)).join(" ");
        writeln!(out, "{}: {}", h.net_name(n), cells)?;
    }
    Ok(())
}

/// Lists every cell with the nets it pins, one line per cell.
pub fn report_cells<W: Write>(out: &mut W, h: &Hypergraph) -> Result<()> {
    writeln!(out, "Number of cells: {}", h.num_cells())?;
    for c in 0..h.num_cells() as Index {
        let nets = h.nets_of(c).map(|n| h.net_name(n)).join(" ");
        writeln!(out, "{}: {}", h.cell_name(c), nets)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_netlist;

    fn partitioned(input: &str) -> Partitioner {
        let (h, r) = parse_netlist(input).unwrap();
        let mut p = Partitioner::build(h, r);
        p.partition().unwrap();
        p
    }

    #[test]
    fn result_block_matches_reference_layout() {
        let p = partitioned("0.5\nNET n1 a b ;\n");
        let mut out = Vec::new();
        write_result(&mut out, &p).unwrap();
        let text = String::from_utf8(out).unwrap();
        // repair flips cell a (the lower ID) off the larger side
        assert_eq!(text, "Cutsize = 1\nG1 1\nb ;\nG2 1\na ;\n");
    }

    #[test]
    fn reports_mirror_adjacency() {
        let (h, _) = parse_netlist("0.5 NET n1 a b c ; NET n2 c a ;").unwrap();
        let mut out = Vec::new();
        report_nets(&mut out, &h).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Number of nets: 2\n"));
        assert!(text.contains("n1: a b c\n"));
        assert!(text.contains("n2: c a\n"));

        let mut out = Vec::new();
        report_cells(&mut out, &h).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Number of cells: 3\n"));
        assert!(text.contains("a: n1 n2\n"));
        assert!(text.contains("b: n1\n"));
        assert!(text.contains("c: n1 n2\n"));
    }
}
