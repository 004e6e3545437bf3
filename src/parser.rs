use anyhow::{bail, ensure, Context, Result};

use crate::hypergraph::{Hypergraph, HypergraphBuilder};

/// Parses the netlist format: a balance factor token, then
/// `NET <name> <cell>... ;` groups. Whitespace-insensitive; the
/// terminating `;` must stand alone. Cells are interned on first
/// occurrence, so dense IDs follow input order.
pub fn parse_netlist(input: &str) -> Result<(Hypergraph, f64)> {
    let mut tokens = input.split_whitespace();

    let r: f64 = tokens
        .next()
        .context("missing balance factor")?
        .parse()
        .context("balance factor is not a number")?;
    ensure!(r > 0.0 && r < 1.0, "balance factor {} outside (0, 1)", r);

    let mut builder = HypergraphBuilder::new();
    let mut num_nets = 0usize;
    while let Some(keyword) = tokens.next() {
        ensure!(keyword == "NET", "expected NET, found {:?}", keyword);
        let name = tokens.next().context("NET without a name")?;
        let mut pins = vec![];
        loop {
            match tokens.next() {
                Some(";") => break,
                Some(cell) => pins.push(builder.cell(cell)),
                None => bail!("net {} is not terminated by ';'", name),
            }
        }
        ensure!(!pins.is_empty(), "net {} has no cells", name);
        builder.net(name, pins);
        num_nets += 1;
    }
    ensure!(num_nets > 0, "input declares no nets");
    ensure!(
        builder.num_cells() >= 2,
        "input declares fewer than two cells"
    );

    Ok((builder.build(), r))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_reference_format() {
        let input = "0.5\nNET n1 a b c ;\nNET n2 c d ;\n";
        let (h, r) = parse_netlist(input).unwrap();
        assert_eq!(r, 0.5);
        assert_eq!(h.num_cells(), 4);
        assert_eq!(h.num_nets(), 2);
        assert_eq!(h.cell_name(0), "a");
        assert_eq!(h.cell_name(3), "d");
        let pins: Vec<_> = h.cells_of(1).collect();
        assert_eq!(pins, vec![2, 3]);
    }

    #[test]
    fn whitespace_layout_is_irrelevant() {
        let input = "  0.3 NET   n1\n\ta b ;  NET n2 b\nc ; ";
        let (h, r) = parse_netlist(input).unwrap();
        assert_eq!(r, 0.3);
        assert_eq!(h.num_cells(), 3);
        assert_eq!(h.num_nets(), 2);
    }

    #[test]
    fn duplicate_pins_survive_parsing() {
        let (h, _) = parse_netlist("0.5 NET n1 a a b ;").unwrap();
        assert_eq!(h.pin_count(0), 2);
    }

    #[test]
    fn rejects_malformed_inputs() {
        assert!(parse_netlist("").is_err());
        assert!(parse_netlist("nope NET n1 a b ;").is_err());
        assert!(parse_netlist("1.5 NET n1 a b ;").is_err());
        assert!(parse_netlist("0.5 WIRE n1 a b ;").is_err());
        assert!(parse_netlist("0.5 NET n1 a b").is_err());
        assert!(parse_netlist("0.5 NET n1 ;").is_err());
        assert!(parse_netlist("0.5").is_err());
        assert!(parse_netlist("0.5 NET n1 a a ;").is_err());
    }
}
