pub mod moves;
pub mod position;
pub mod resolver;

pub use moves::{CastleSide, MoveToken, PieceMove};
pub use position::{Board, Color, Piece, PieceKind, Snapshot, Square};
pub use resolver::{AppliedMove, MoveResolver};
