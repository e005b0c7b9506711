/*!
 * Diesel plugin for pagination
 * https://github.com/diesel-rs/diesel/blob/master/examples/postgres/advanced-blog-cli/src/pagination.rs
 */

use diesel::{
    prelude::*,
    query_builder::*,
    query_dsl::methods::LoadQuery,
    sql_types::BigInt,
    sqlite::Sqlite,
};
use serde_derive::Serialize;

pub trait Paginate: Sized {
    fn paginate(self, page: i64) -> Paginated<Self>;
}

impl<T> Paginate for T {
    fn paginate(self, page: i64) -> Paginated<Self> {
        Paginated { query: self, per_page: 20, page, offset: (page - 1).saturating_mul(20) }
    }
}

#[derive(Debug, Clone, Copy, QueryId)]
pub struct Paginated<T> {
    query: T,
    page: i64,
    per_page: i64,
    offset: i64,
}

impl<T> Paginated<T> {
    pub fn per_page(self, per_page: i64) -> Self {
        Paginated { per_page, offset: (self.page - 1).saturating_mul(per_page), ..self }
    }

    pub fn load_page<'a, U>(self, conn: &mut SqliteConnection) -> QueryResult<Page<U>>
    where
        Self: LoadQuery<'a, SqliteConnection, (U, i64)>,
    {
        let (page, per_page) = (self.page, self.per_page);
        let res: Vec<(U, i64)> = self.load(conn)?;
        // The window count rides on every row, so an empty page reports 0
        let total = res.first().map(|x| x.1).unwrap_or(0);
        let items = res.into_iter().map(|x| x.0).collect();
        Ok(Page { items, page, per_page, total })
    }
}

impl<T: Query> Query for Paginated<T> {
    type SqlType = (T::SqlType, BigInt);
}

impl<T> RunQueryDsl<SqliteConnection> for Paginated<T> {}

impl<T> QueryFragment<Sqlite> for Paginated<T>
where
    T: QueryFragment<Sqlite>,
{
    fn walk_ast<'b>(&'b self, mut out: AstPass<'_, 'b, Sqlite>) -> QueryResult<()> {
        out.push_sql("SELECT *, COUNT(*) OVER () FROM (");
        self.query.walk_ast(out.reborrow())?;
        out.push_sql(") t LIMIT ");
        out.push_bind_param::<BigInt, _>(&self.per_page)?;
        out.push_sql(" OFFSET ");
        out.push_bind_param::<BigInt, _>(&self.offset)?;
        Ok(())
    }
}

/// One page of a listing, 1-based
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn page_count(&self) -> i64 {
        if self.per_page <= 0 {
            return 0;
        }
        (self.total + self.per_page - 1) / self.per_page
    }
}
