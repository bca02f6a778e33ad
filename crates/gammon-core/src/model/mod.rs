pub mod board;
pub mod cube;
pub mod dice;
pub mod moves;
