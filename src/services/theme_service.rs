// src/services/theme_service.rs

use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{self, SoftDeleteTable},
        error::AppError,
    },
    db::ThemeRepository,
    models::{
        base::SoftDelete,
        theme::{ColorsPayload, CompanyTheme, ThemeValues, UpdateThemePayload},
    },
};

#[derive(Clone)]
pub struct ThemeService {
    theme_repo: ThemeRepository,
    pool: PgPool,
}

impl ThemeService {
    pub fn new(theme_repo: ThemeRepository, pool: PgPool) -> Self {
        Self { theme_repo, pool }
    }

    /// Tema não apagado da empresa.
    pub async fn get_theme(&self, company_id: i64) -> Result<CompanyTheme, AppError> {
        self.theme_repo
            .find_by_company(company_id)
            .await?
            .filter(|t| !t.is_deleted())
            .ok_or(AppError::ThemeNotFound)
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<CompanyTheme>, AppError> {
        self.theme_repo.list_for_user(user_id).await
    }

    /// PUT: o que não foi enviado volta ao padrão. Cria o tema se não houver.
    pub async fn replace_theme(&self, company_id: i64, payload: UpdateThemePayload) -> Result<CompanyTheme, AppError> {
        let values = payload.apply(ThemeValues::default());
        let theme = self.theme_repo.save(&self.pool, company_id, &values).await?;
        tracing::info!("Tema da empresa {} substituído", company_id);
        Ok(theme)
    }

    /// PATCH: só os campos enviados mudam.
    pub async fn update_theme(&self, company_id: i64, payload: UpdateThemePayload) -> Result<CompanyTheme, AppError> {
        let current = self.get_theme(company_id).await?;
        let values = payload.apply(current.values);
        self.theme_repo.save(&self.pool, company_id, &values).await
    }

    pub async fn update_colors(&self, company_id: i64, colors: ColorsPayload) -> Result<CompanyTheme, AppError> {
        let current = self.get_theme(company_id).await?;
        let values = ThemeValues {
            palette: colors.apply(current.values.palette.clone()),
            ..current.values
        };
        self.theme_repo.save(&self.pool, company_id, &values).await
    }

    pub async fn reset_to_default(&self, company_id: i64) -> Result<CompanyTheme, AppError> {
        let current = self.get_theme(company_id).await?;
        let theme = self
            .theme_repo
            .save(&self.pool, company_id, &current.values.reset_to_default())
            .await?;
        tracing::info!("Tema da empresa {} restaurado ao padrão", company_id);
        Ok(theme)
    }

    pub async fn delete_theme(&self, company_id: i64) -> Result<(), AppError> {
        let theme = self.get_theme(company_id).await?;
        if !db_utils::soft_delete(&self.pool, SoftDeleteTable::CompanyThemes, theme.id).await? {
            return Err(AppError::ThemeNotFound);
        }
        tracing::info!("Tema da empresa {} apagado", company_id);
        Ok(())
    }
}
