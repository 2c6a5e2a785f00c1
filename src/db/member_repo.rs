// src/db/member_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::member::{CompanyMember, MemberRole, MemberWithUser},
};

const MEMBER_COLUMNS: &str =
    "id, uuid, user_id, company_id, role, is_active, created_at, updated_at, deleted_at";

// Membro + dados resumidos do usuário
const MEMBER_WITH_USER: &str = r#"
    SELECT
        m.id, m.uuid, m.company_id, m.role, m.is_active, m.created_at,
        u.id AS user_id, u.email AS user_email, u.first_name AS user_first_name,
        u.last_name AS user_last_name, u.phone AS user_phone
    FROM company_members m
    JOIN users u ON u.id = m.user_id
"#;

#[derive(Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// O vínculo (usuário, empresa), inclusive se estiver apagado.
    pub async fn find_membership<'e, E>(
        &self,
        executor: E,
        user_id: i64,
        company_id: i64,
    ) -> Result<Option<CompanyMember>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM company_members WHERE user_id = $1 AND company_id = $2"
        );
        let member = sqlx::query_as::<_, CompanyMember>(&sql)
            .bind(user_id)
            .bind(company_id)
            .fetch_optional(executor)
            .await?;
        Ok(member)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        user_id: i64,
        company_id: i64,
        role: MemberRole,
    ) -> Result<CompanyMember, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO company_members (user_id, company_id, role)
            VALUES ($1, $2, $3)
            RETURNING {MEMBER_COLUMNS}
            "#
        );
        let member = sqlx::query_as::<_, CompanyMember>(&sql)
            .bind(user_id)
            .bind(company_id)
            .bind(role)
            .fetch_one(executor)
            .await?;
        Ok(member)
    }

    /// Define o papel e deixa o vínculo ativo e não apagado.
    pub async fn reactivate<'e, E>(&self, executor: E, id: i64, role: MemberRole) -> Result<CompanyMember, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE company_members
            SET role = $2, is_active = TRUE, deleted_at = NULL, updated_at = NOW()
            WHERE id = $1
            RETURNING {MEMBER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, CompanyMember>(&sql)
            .bind(id)
            .bind(role)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::MemberNotFound)
    }

    pub async fn update_role(&self, id: i64, role: MemberRole) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE company_members SET role = $2, updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(role)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::MemberNotFound);
        }
        Ok(())
    }

    pub async fn find_with_user_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<MemberWithUser>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{MEMBER_WITH_USER} WHERE m.id = $1");
        let member = sqlx::query_as::<_, MemberWithUser>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(member)
    }

    /// Membro não apagado da empresa, pelo UUID público.
    pub async fn find_with_user(&self, company_id: i64, member_uuid: Uuid) -> Result<Option<MemberWithUser>, AppError> {
        let sql = format!(
            "{MEMBER_WITH_USER} WHERE m.company_id = $1 AND m.uuid = $2 AND m.deleted_at IS NULL"
        );
        let member = sqlx::query_as::<_, MemberWithUser>(&sql)
            .bind(company_id)
            .bind(member_uuid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(member)
    }

    /// Membros ativos e não apagados, por nome e depois e-mail.
    pub async fn list_active(&self, company_id: i64, limit: i64, offset: i64) -> Result<Vec<MemberWithUser>, AppError> {
        let sql = format!(
            r#"
            {MEMBER_WITH_USER}
            WHERE m.company_id = $1 AND m.is_active = TRUE AND m.deleted_at IS NULL
            ORDER BY u.first_name, u.email
            LIMIT $2 OFFSET $3
            "#
        );
        let members = sqlx::query_as::<_, MemberWithUser>(&sql)
            .bind(company_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(members)
    }

    pub async fn count_active(&self, company_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM company_members WHERE company_id = $1 AND is_active = TRUE AND deleted_at IS NULL",
        )
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Vínculos ativos do usuário com empresas não apagadas, por nome fantasia.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<CompanyMember>, AppError> {
        let sql = r#"
            SELECT m.id, m.uuid, m.user_id, m.company_id, m.role, m.is_active,
                   m.created_at, m.updated_at, m.deleted_at
            FROM company_members m
            JOIN companies c ON c.id = m.company_id
            WHERE m.user_id = $1
              AND m.is_active = TRUE AND m.deleted_at IS NULL
              AND c.deleted_at IS NULL
            ORDER BY c.trade_name
        "#;
        let members = sqlx::query_as::<_, CompanyMember>(sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(members)
    }
}
