pub mod block;
pub mod block_grid;
pub mod pixel;
