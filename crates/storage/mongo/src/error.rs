use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum MongoStorageError {
    #[error(transparent)]
    DatabaseError(#[from] mongodb::error::Error),
}
