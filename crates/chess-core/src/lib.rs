//! Position handling for the game service: parsing, move application, the
//! status document and the ASCII diagram.

pub use shakmaty;

pub mod diagram;
pub mod error;
pub mod game;
pub mod status;

pub use diagram::render_diagram;
pub use error::GameError;
pub use game::{Game, GameResult, STARTING_FEN};
pub use status::GameStatus;
