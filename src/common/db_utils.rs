// src/common/db_utils.rs

use sqlx::{Executor, Postgres};

use crate::common::error::AppError;

/// Tabelas que seguem o padrão de entidade base (id, uuid, timestamps, deleted_at).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftDeleteTable {
    Companies,
    CompanyMembers,
    CompanyThemes,
}

impl SoftDeleteTable {
    fn name(self) -> &'static str {
        match self {
            SoftDeleteTable::Companies => "companies",
            SoftDeleteTable::CompanyMembers => "company_members",
            SoftDeleteTable::CompanyThemes => "company_themes",
        }
    }
}

/// Marca o registro como apagado. Devolve `false` se ele já estava apagado.
pub async fn soft_delete<'e, E>(executor: E, table: SoftDeleteTable, id: i64) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        "UPDATE {} SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        table.name()
    );
    let result = sqlx::query(&sql).bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

/// Limpa o `deleted_at`. Devolve `false` se o registro não estava apagado.
pub async fn restore<'e, E>(executor: E, table: SoftDeleteTable, id: i64) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        "UPDATE {} SET deleted_at = NULL, updated_at = NOW() WHERE id = $1 AND deleted_at IS NOT NULL",
        table.name()
    );
    let result = sqlx::query(&sql).bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

/// Remove o registro de vez (as FKs em cascata levam os dependentes).
pub async fn hard_delete<'e, E>(executor: E, table: SoftDeleteTable, id: i64) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!("DELETE FROM {} WHERE id = $1", table.name());
    let result = sqlx::query(&sql).bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

/// Nome da constraint quando o erro é uma violação de unicidade.
pub fn unique_violation(e: &sqlx::Error) -> Option<&str> {
    match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => db_err.constraint(),
        _ => None,
    }
}
