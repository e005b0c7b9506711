/*!
 * Extensions to some builtin or external types
 */

use diesel::result::{OptionalExtension, QueryResult};

use crate::error::{Entity, Error, Result};
use crate::id::Id;

pub trait QueryResultExt<T> {
    /// Turns a missing row into [`Error::NotFound`] for `entity` `id`.
    fn found(self, entity: Entity, id: Id) -> Result<T>;
}

impl<T> QueryResultExt<T> for QueryResult<T> {
    fn found(self, entity: Entity, id: Id) -> Result<T> {
        self.optional()?.ok_or(Error::NotFound { entity, id })
    }
}
