// src/services/company_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{self, SoftDeleteTable},
        error::AppError,
    },
    db::{CompanyRepository, MemberRepository, ThemeRepository},
    models::{
        base::SoftDelete,
        company::{Company, CreateCompanyPayload, UpdateCompanyPayload},
        member::{MemberRole, UserCompany},
        theme::ThemeValues,
    },
};

/// A empresa alvo da requisição e o papel do usuário nela.
/// `role` só existe quando o vínculo está ativo e não apagado.
#[derive(Debug, Clone)]
pub struct CompanyContext {
    pub company: Company,
    pub role: Option<MemberRole>,
}

#[derive(Clone)]
pub struct CompanyService {
    company_repo: CompanyRepository,
    member_repo: MemberRepository,
    theme_repo: ThemeRepository,
    pool: PgPool,
}

impl CompanyService {
    pub fn new(
        company_repo: CompanyRepository,
        member_repo: MemberRepository,
        theme_repo: ThemeRepository,
        pool: PgPool,
    ) -> Self {
        Self { company_repo, member_repo, theme_repo, pool }
    }

    /// Carrega a empresa (mesmo apagada) e o papel do usuário nela.
    pub async fn access_context(&self, user_id: i64, company_uuid: Uuid) -> Result<Option<CompanyContext>, AppError> {
        let Some(company) = self.company_repo.find_by_uuid(company_uuid).await? else {
            return Ok(None);
        };
        let role = self
            .member_repo
            .find_membership(&self.pool, user_id, company.id)
            .await?
            .filter(|m| m.grants_access())
            .map(|m| m.role);
        Ok(Some(CompanyContext { company, role }))
    }

    /// Cria a empresa, o vínculo de proprietário e o tema padrão numa transação só.
    pub async fn create_company(&self, owner_id: i64, payload: &CreateCompanyPayload) -> Result<Company, AppError> {
        let mut tx = self.pool.begin().await?;

        let company = self.company_repo.create(&mut *tx, payload).await?;
        self.member_repo
            .insert(&mut *tx, owner_id, company.id, MemberRole::Owner)
            .await?;
        self.theme_repo
            .save(&mut *tx, company.id, &ThemeValues::default())
            .await?;

        tx.commit().await?;
        tracing::info!("Empresa {} criada pelo usuário {}", company.uuid, owner_id);
        Ok(company)
    }

    pub async fn update_company(&self, company: &Company, payload: UpdateCompanyPayload) -> Result<Company, AppError> {
        let updated = payload.apply_to(company);
        self.company_repo.update(&updated).await
    }

    pub async fn delete_company(&self, company: &Company) -> Result<(), AppError> {
        if !db_utils::soft_delete(&self.pool, SoftDeleteTable::Companies, company.id).await? {
            return Err(AppError::CompanyNotFound);
        }
        tracing::info!("Empresa {} apagada", company.uuid);
        Ok(())
    }

    pub async fn restore_company(&self, company: &Company) -> Result<Company, AppError> {
        if !company.is_deleted() {
            return Ok(company.clone());
        }
        db_utils::restore(&self.pool, SoftDeleteTable::Companies, company.id).await?;
        tracing::info!("Empresa {} restaurada", company.uuid);
        self.company_repo
            .find_by_uuid(company.uuid)
            .await?
            .ok_or(AppError::CompanyNotFound)
    }

    /// Remove de vez; membros e tema vão junto (ON DELETE CASCADE).
    pub async fn purge_company(&self, company: &Company) -> Result<(), AppError> {
        if !db_utils::hard_delete(&self.pool, SoftDeleteTable::Companies, company.id).await? {
            return Err(AppError::CompanyNotFound);
        }
        tracing::info!("Empresa {} removida permanentemente", company.uuid);
        Ok(())
    }

    /// Empresas do usuário (vínculos ativos, empresas não apagadas), por nome fantasia.
    pub async fn list_user_companies(&self, user_id: i64) -> Result<Vec<UserCompany>, AppError> {
        let memberships = self.member_repo.list_for_user(user_id).await?;
        if memberships.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = memberships.iter().map(|m| m.company_id).collect();
        let mut companies: HashMap<i64, Company> = self
            .company_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let mut themes: HashMap<_, _> = self
            .theme_repo
            .find_by_company_ids(&ids)
            .await?
            .into_iter()
            .map(|t| (t.company_id, t))
            .collect();

        // A ordem vem da consulta de vínculos
        Ok(memberships
            .into_iter()
            .filter_map(|membership| {
                let company = companies.remove(&membership.company_id)?;
                let theme = themes.remove(&membership.company_id);
                Some(UserCompany { membership, company, theme })
            })
            .collect())
    }
}
