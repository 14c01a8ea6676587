use chess::{Board, Color, File, MoveGen, Piece, Rank, Square};

use crate::models::TerminationReason;

/// Convert a chess color to a string
pub fn color_to_string(color: Color) -> String {
    match color {
        Color::White => "white".to_string(),
        Color::Black => "black".to_string(),
    }
}

/// Rules-based termination detectable from the position alone.
///
/// Draw-by-history conditions (move limit, repetition) are tracked by the
/// arbiter and checked there.
pub fn position_termination(board: &Board) -> Option<TerminationReason> {
    if MoveGen::new_legal(board).count() == 0 {
        if board.checkers().popcnt() > 0 {
            // The side to move is mated; the mover of the last ply wins.
            return Some(TerminationReason::Checkmate(!board.side_to_move()));
        }
        return Some(TerminationReason::Stalemate);
    }
    if has_insufficient_material(board) {
        return Some(TerminationReason::InsufficientMaterial);
    }
    None
}

/// Check if the board has insufficient material for checkmate
///
/// Covers K vs K, K+minor vs K, and K+B vs K+B with both bishops on the
/// same square color.
pub fn has_insufficient_material(board: &Board) -> bool {
    // (owner, piece, on a light square)
    let mut minors: Vec<(Color, Piece, bool)> = Vec::new();

    for rank in 0..8 {
        for file in 0..8 {
            let square = Square::make_square(Rank::from_index(rank), File::from_index(file));
            if let (Some(piece), Some(color)) = (board.piece_on(square), board.color_on(square)) {
                match piece {
                    Piece::King => {}
                    Piece::Bishop | Piece::Knight => {
                        minors.push((color, piece, (rank + file) % 2 == 1));
                    }
                    // Any pawn, rook or queen is mating material.
                    _ => return false,
                }
            }
        }
    }

    match minors.as_slice() {
        [] | [_] => true,
        [(c1, Piece::Bishop, l1), (c2, Piece::Bishop, l2)] => c1 != c2 && l1 == l2,
        _ => false,
    }
}

/// Render the board as text, oriented with `perspective` at the bottom.
pub fn render_board(board: &Board, perspective: Color) -> String {
    let (ranks, files): (Vec<usize>, Vec<usize>) = match perspective {
        Color::White => ((0..8).rev().collect(), (0..8).collect()),
        Color::Black => ((0..8).collect(), (0..8).rev().collect()),
    };

    let mut out = String::new();
    for &rank in &ranks {
        out.push(char::from(b'1' + rank as u8));
        for &file in &files {
            let square = Square::make_square(Rank::from_index(rank), File::from_index(file));
            let glyph = match (board.piece_on(square), board.color_on(square)) {
                (Some(piece), Some(color)) => piece_glyph(piece, color),
                _ => '.',
            };
            out.push(' ');
            out.push(glyph);
        }
        out.push('\n');
    }
    out.push(' ');
    for &file in &files {
        out.push(' ');
        out.push(char::from(b'a' + file as u8));
    }
    out.push('\n');
    out
}

fn piece_glyph(piece: Piece, color: Color) -> char {
    let glyph = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    match color {
        Color::White => glyph.to_ascii_uppercase(),
        Color::Black => glyph,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::Board;
    use std::str::FromStr;

    #[test]
    fn starting_position_is_not_terminal() {
        assert_eq!(position_termination(&Board::default()), None);
    }

    #[test]
    fn bare_kings_are_insufficient() {
        let board = Board::from_str("k7/8/8/8/8/8/8/K7 w - - 0 1").unwrap();
        assert_eq!(
            position_termination(&board),
            Some(TerminationReason::InsufficientMaterial)
        );
    }

    #[test]
    fn king_and_knight_is_insufficient() {
        let board = Board::from_str("k7/8/8/8/8/8/8/KN6 w - - 0 1").unwrap();
        assert!(has_insufficient_material(&board));
    }

    #[test]
    fn king_and_rook_is_sufficient() {
        let board = Board::from_str("k7/8/8/8/8/8/8/KR6 w - - 0 1").unwrap();
        assert!(!has_insufficient_material(&board));
    }

    #[test]
    fn same_colored_bishops_are_insufficient() {
        // Bishops on c1 and f8 both sit on dark squares.
        let board = Board::from_str("kb6/8/8/8/8/8/8/K1B5 w - - 0 1").unwrap();
        assert!(has_insufficient_material(&board));
    }

    #[test]
    fn stalemate_is_detected() {
        let board = Board::from_str("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(
            position_termination(&board),
            Some(TerminationReason::Stalemate)
        );
    }

    #[test]
    fn render_orientation_follows_perspective() {
        let board = Board::default();
        let white_view = render_board(&board, Color::White);
        let black_view = render_board(&board, Color::Black);
        // White sees the eighth rank first, black the first rank.
        assert!(white_view.starts_with("8 r n b q k b n r"));
        assert!(black_view.starts_with("1 R N B K Q B N R"));
    }
}
