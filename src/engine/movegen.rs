//! Geometric move generation.
//!
//! Every function here answers "where can this piece go given the current
//! occupancy?" and nothing more: turn order and king safety are the game's
//! responsibility. Each piece kind has its own generator; `piece_moves`
//! dispatches on the kind.

use crate::engine::board::Board;
use crate::engine::types::{Color, Move, Piece, PieceType, Position};

const KING_STEPS: [(i8, i8); 8] = [
    (1, -1),
    (1, 0),
    (1, 1),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
    (-2, 1),
    (-2, -1),
];

const ROOK_RAYS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, -1), (0, 1)];

const BISHOP_RAYS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

// =========================================================================
// Public API
// =========================================================================

/// All geometrically reachable moves for `piece` standing on `from`.
///
/// The result never contains duplicates and never leaves the board.
pub fn piece_moves(piece: Piece, board: &Board, from: Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(28);
    match piece.kind {
        PieceType::King => king_moves(board, piece.color, from, &mut moves),
        PieceType::Queen => queen_moves(board, piece.color, from, &mut moves),
        PieceType::Bishop => bishop_moves(board, piece.color, from, &mut moves),
        PieceType::Knight => knight_moves(board, piece.color, from, &mut moves),
        PieceType::Rook => rook_moves(board, piece.color, from, &mut moves),
        PieceType::Pawn => pawn_moves(board, piece.color, from, &mut moves),
    }
    moves
}

/// Does any piece of colour `by` have a candidate move ending on `target`?
pub fn is_attacked(board: &Board, target: Position, by: Color) -> bool {
    board
        .pieces_of(by)
        .any(|(pos, piece)| piece_moves(piece, board, pos).iter().any(|m| m.end == target))
}

// =========================================================================
// King & knight (single steps)
// =========================================================================

fn king_moves(board: &Board, us: Color, from: Position, moves: &mut Vec<Move>) {
    step_moves(board, us, from, &KING_STEPS, moves);
}

fn knight_moves(board: &Board, us: Color, from: Position, moves: &mut Vec<Move>) {
    step_moves(board, us, from, &KNIGHT_JUMPS, moves);
}

/// One hop per offset: land on empty cells or enemy pieces.
fn step_moves(
    board: &Board,
    us: Color,
    from: Position,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in offsets {
        let Some(to) = from.offset(dr, dc) else {
            continue;
        };
        match board.get_piece(to) {
            Some(occupant) if occupant.color == us => {}
            _ => moves.push(Move::new(from, to)),
        }
    }
}

// =========================================================================
// Sliders (rook, bishop, queen)
// =========================================================================

fn rook_moves(board: &Board, us: Color, from: Position, moves: &mut Vec<Move>) {
    ray_moves(board, us, from, &ROOK_RAYS, moves);
}

fn bishop_moves(board: &Board, us: Color, from: Position, moves: &mut Vec<Move>) {
    ray_moves(board, us, from, &BISHOP_RAYS, moves);
}

fn queen_moves(board: &Board, us: Color, from: Position, moves: &mut Vec<Move>) {
    ray_moves(board, us, from, &ROOK_RAYS, moves);
    ray_moves(board, us, from, &BISHOP_RAYS, moves);
}

/// Walk each ray outward. Empty cells are included; the first occupied cell
/// is included only if it holds an enemy, and ends the ray either way.
fn ray_moves(
    board: &Board,
    us: Color,
    from: Position,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in directions {
        let mut cursor = from;
        while let Some(to) = cursor.offset(dr, dc) {
            match board.get_piece(to) {
                None => moves.push(Move::new(from, to)),
                Some(occupant) => {
                    if occupant.color != us {
                        moves.push(Move::new(from, to));
                    }
                    break;
                }
            }
            cursor = to;
        }
    }
}

// =========================================================================
// Pawn
// =========================================================================

fn pawn_moves(board: &Board, us: Color, from: Position, moves: &mut Vec<Move>) {
    let dir = us.forward();

    // --- Single push ---
    if let Some(one) = from.offset(dir, 0)
        && board.is_empty(one)
    {
        push_pawn_move(us, from, one, moves);

        // --- Double push from the starting row ---
        if from.row() == us.pawn_row()
            && let Some(two) = from.offset(2 * dir, 0)
            && board.is_empty(two)
        {
            moves.push(Move::new(from, two));
        }
    }

    // --- Diagonal captures ---
    for dc in [-1, 1] {
        if let Some(to) = from.offset(dir, dc)
            && let Some(occupant) = board.get_piece(to)
            && occupant.color != us
        {
            push_pawn_move(us, from, to, moves);
        }
    }
}

/// Push a pawn move, expanding it into the four promotion choices when it
/// lands on the far row.
fn push_pawn_move(us: Color, from: Position, to: Position, moves: &mut Vec<Move>) {
    if to.row() == us.promotion_row() {
        for promo in PieceType::PROMOTIONS {
            moves.push(Move::with_promotion(from, to, promo));
        }
    } else {
        moves.push(Move::new(from, to));
    }
}

// =========================================================================
// Tests
// =========================================================================
