use std::marker::PhantomData;
use std::str::FromStr;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbConn, DbErr, EntityTrait, IntoActiveModel, Iterable,
    Order, PaginatorTrait, PrimaryKeyToColumn, PrimaryKeyTrait, QueryOrder, Select, SqlErr,
};

use quill_core::domain::{Page, PageRequest, SortDirection};
use quill_core::error::RepoError;
use quill_core::ports::BaseRepository;

/// Generic PostgreSQL repository implementation.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
    E::Model: Send + Sync + 'static,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// All rows of `select` in primary key order.
    pub(crate) async fn fetch_all<T>(&self, select: Select<E>) -> Result<Vec<T>, RepoError>
    where
        T: From<E::Model>,
    {
        let rows = by_primary_key(select)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// One window of `select`, ordered by the requested column with the
    /// primary key as tie-breaker, plus the count of all matching rows.
    pub(crate) async fn fetch_page<T>(
        &self,
        select: Select<E>,
        request: &PageRequest,
    ) -> Result<Page<T>, RepoError>
    where
        T: From<E::Model>,
    {
        let column = E::Column::from_str(&request.sort_by)
            .map_err(|_| RepoError::InvalidSort(request.sort_by.clone()))?;
        let order = match request.direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };

        let paginator =
            by_primary_key(select.order_by(column, order)).paginate(&self.db, request.size);
        let total = paginator.num_items().await.map_err(map_db_err)?;

        // PostgreSQL rejects an OFFSET above i64::MAX; such windows are empty anyway.
        let rows = match request.page.checked_mul(request.size) {
            Some(offset) if offset <= i64::MAX as u64 => paginator
                .fetch_page(request.page)
                .await
                .map_err(map_db_err)?,
            _ => Vec::new(),
        };

        tracing::debug!(
            page = request.page,
            size = request.size,
            total,
            "Fetched page"
        );

        Ok(Page::new(
            rows.into_iter().map(Into::into).collect(),
            request,
            total,
        ))
    }
}

fn by_primary_key<E: EntityTrait>(mut select: Select<E>) -> Select<E> {
    for key in E::PrimaryKey::iter() {
        select = select.order_by_asc(key.into_column());
    }
    select
}

/// Classify a SeaORM error. Constraint violations are recognised by SQLSTATE.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg))
        | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => return RepoError::Constraint(msg),
        _ => {}
    }

    match err {
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
        other => RepoError::Query(other.to_string()),
    }
}

#[async_trait]
impl<E, T, N> BaseRepository<T, N, i64> for PostgresBaseRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync + 'static,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i64>,
    T: From<E::Model> + Into<E::ActiveModel> + Send + Sync + 'static,
    N: Into<E::ActiveModel> + Send + 'static,
{
    async fn find_by_id(&self, id: i64) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_all(&self) -> Result<Vec<T>, RepoError> {
        self.fetch_all(E::find()).await
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<T>, RepoError> {
        self.fetch_page(E::find(), request).await
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, RepoError> {
        let count = E::find_by_id(id)
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }

    async fn insert(&self, entity: N) -> Result<T, RepoError> {
        let active_model: E::ActiveModel = entity.into();
        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let active_model: E::ActiveModel = entity.into();
        let model = active_model.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let result = E::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
