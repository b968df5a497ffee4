//! Plain-text board diagram, handy for eyeballing positions from a terminal.

const FILES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

/// Render the piece placement of `fen` as an ASCII grid, rank 8 at the top.
///
/// Only the first FEN field is read, so a bare placement string works too.
/// The output opens with a separator line preceded by a newline and ends with
/// the file label row (no trailing newline):
///
/// ```text
///
/// ---|--------------------------------
///  8 | r | n | b | q | k | b | n | r |
/// ---|--------------------------------
/// ...
///  1 | R | N | B | Q | K | B | N | R |
/// ---|--------------------------------
///    | a | b | c | d | e | f | g | h |
/// ```
pub fn render_diagram(fen: &str) -> String {
    let placement = fen.split_whitespace().next().unwrap_or("");
    let separator = format!("\n---|{}\n", "-".repeat(32));

    let mut out = separator.clone();
    for (rank_label, rank) in (1..=8).rev().zip(placement.split('/')) {
        out.push_str(&format!(" {rank_label} | "));
        for c in rank.chars() {
            match c.to_digit(10) {
                Some(empty) => out.push_str(&"  | ".repeat(empty as usize)),
                None => {
                    out.push(c);
                    out.push_str(" | ");
                }
            }
        }
        out.push_str(&separator);
    }

    out.push_str("   | ");
    for file in FILES {
        out.push(file);
        out.push_str(" | ");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::STARTING_FEN;

    const SEPARATOR: &str = "---|--------------------------------";

    fn starting_diagram() -> String {
        let rows = [
            " 8 | r | n | b | q | k | b | n | r | ",
            " 7 | p | p | p | p | p | p | p | p | ",
            " 6 |   |   |   |   |   |   |   |   | ",
            " 5 |   |   |   |   |   |   |   |   | ",
            " 4 |   |   |   |   |   |   |   |   | ",
            " 3 |   |   |   |   |   |   |   |   | ",
            " 2 | P | P | P | P | P | P | P | P | ",
            " 1 | R | N | B | Q | K | B | N | R | ",
        ];
        let mut expected = format!("\n{SEPARATOR}\n");
        for row in rows {
            expected.push_str(row);
            expected.push_str(&format!("\n{SEPARATOR}\n"));
        }
        expected.push_str("   | a | b | c | d | e | f | g | h | ");
        expected
    }

    #[test]
    fn test_starting_position_diagram() {
        assert_eq!(render_diagram(STARTING_FEN), starting_diagram());
    }

    #[test]
    fn test_placement_only_input() {
        let placement = STARTING_FEN.split(' ').next().unwrap();
        assert_eq!(render_diagram(placement), render_diagram(STARTING_FEN));
    }

    #[test]
    fn test_every_rank_has_eight_cells() {
        let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";
        let diagram = render_diagram(fen);

        let rank_rows: Vec<&str> = diagram
            .lines()
            .filter(|l| l.chars().nth(1).is_some_and(|c| c.is_ascii_digit()))
            .collect();
        assert_eq!(rank_rows.len(), 8);
        for row in &rank_rows {
            // label cell plus eight squares
            assert_eq!(row.matches('|').count(), 9, "{row}");
        }

        let last = diagram.lines().last().unwrap();
        assert_eq!(last, "   | a | b | c | d | e | f | g | h | ");
        assert!(rank_rows[3].starts_with(" 5 |   |   |   |   | p |   |   | Q | "));
    }
}
