use alloc::string::String;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("No card at that position")]
    InvalidPosition,
    #[error("No images to deal")]
    EmptyImageSet,
    #[error("Card face {0:?} appears an odd number of times")]
    UnpairedFace(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
