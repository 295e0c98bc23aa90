#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid routing pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
