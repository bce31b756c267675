use crate::{
    Database,
    error::{Error, Result},
};
use async_trait::async_trait;
use sqlx::sqlite::SqliteQueryResult;

/// Common behavior for objects that can be fetched from and removed from the
/// database by their unique id
#[async_trait]
pub trait Loadable: Sized {
    type Id: Send + Sync + PartialEq;

    /// The sentinel id value assigned to objects that have not been inserted
    /// into the database yet
    fn invalid_id() -> Self::Id;

    fn id(&self) -> Self::Id;

    fn set_id(&mut self, id: Self::Id);

    /// Load the object with the given id from the database
    async fn load(id: Self::Id, db: &Database) -> Result<Self>;

    /// Delete the database row with the given id
    async fn delete_id(id: &Self::Id, db: &Database) -> Result<SqliteQueryResult>;

    /// Delete this object from the database. If this call completes
    /// successfully, the id of this object is reset to the invalid sentinel.
    async fn delete(&mut self, db: &Database) -> Result<SqliteQueryResult> {
        let id = self.id();
        if id == Self::invalid_id() {
            return Err(Error::InvalidOperation(
                "id not set, cannot delete object".to_string(),
            ));
        }
        let res = Self::delete_id(&id, db).await?;
        self.set_id(Self::invalid_id());
        Ok(res)
    }
}
