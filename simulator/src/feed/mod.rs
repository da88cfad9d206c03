pub mod replay;
pub mod sample;
