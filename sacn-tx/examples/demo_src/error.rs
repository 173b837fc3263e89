use sacn_tx::{priority::PriorityError, universe_id::UniverseError};

#[derive(Debug, thiserror::Error)]
pub enum ExampleError {
    #[error(transparent)]
    StdIo(#[from] std::io::Error),
    #[error(transparent)]
    Sacn(#[from] sacn_tx::error::Error),
}

impl From<UniverseError> for ExampleError {
    fn from(value: UniverseError) -> Self {
        ExampleError::Sacn(value.into())
    }
}

impl From<PriorityError> for ExampleError {
    fn from(value: PriorityError) -> Self {
        ExampleError::Sacn(value.into())
    }
}

pub type ExampleResult<T> = Result<T, ExampleError>;
