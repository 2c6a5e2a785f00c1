// src/db/company_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::unique_violation, error::AppError},
    models::company::{Company, CreateCompanyPayload},
};

const COMPANY_COLUMNS: &str = "id, uuid, trade_name, legal_name, cnpj, email, phone, address, \
     city, state, zip_code, logo, points_per_real, is_active, created_at, updated_at, deleted_at";

fn map_unique(e: sqlx::Error) -> AppError {
    match unique_violation(&e) {
        Some("companies_cnpj_key") => AppError::CnpjAlreadyExists,
        Some(constraint) => AppError::UniqueConstraintViolation(constraint.to_string()),
        None => e.into(),
    }
}

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Busca pelo UUID público, inclusive empresas apagadas.
    pub async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Company>, AppError> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE uuid = $1");
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(company)
    }

    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Company>, AppError> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = ANY($1)");
        let companies = sqlx::query_as::<_, Company>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(companies)
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &CreateCompanyPayload) -> Result<Company, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO companies (
                trade_name, legal_name, cnpj, email, phone,
                address, city, state, zip_code, logo, points_per_real
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {COMPANY_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Company>(&sql)
            .bind(payload.trade_name.trim())
            .bind(payload.legal_name.trim())
            .bind(&payload.cnpj)
            .bind(&payload.email)
            .bind(&payload.phone)
            .bind(&payload.address)
            .bind(&payload.city)
            .bind(&payload.state)
            .bind(&payload.zip_code)
            .bind(payload.logo.as_deref().filter(|l| !l.is_empty()))
            .bind(payload.points_per_real.unwrap_or(Decimal::ONE))
            .fetch_one(executor)
            .await
            .map_err(map_unique)
    }

    /// Grava todos os campos editáveis de `company`.
    pub async fn update(&self, company: &Company) -> Result<Company, AppError> {
        let sql = format!(
            r#"
            UPDATE companies SET
                trade_name = $2, legal_name = $3, cnpj = $4, email = $5, phone = $6,
                address = $7, city = $8, state = $9, zip_code = $10, logo = $11,
                points_per_real = $12, is_active = $13, updated_at = NOW()
            WHERE id = $1
            RETURNING {COMPANY_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Company>(&sql)
            .bind(company.id)
            .bind(&company.trade_name)
            .bind(&company.legal_name)
            .bind(&company.cnpj)
            .bind(&company.email)
            .bind(&company.phone)
            .bind(&company.address)
            .bind(&company.city)
            .bind(&company.state)
            .bind(&company.zip_code)
            .bind(&company.logo)
            .bind(company.points_per_real)
            .bind(company.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique)?
            .ok_or(AppError::CompanyNotFound)
    }
}
