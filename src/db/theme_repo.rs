// src/db/theme_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::theme::{CompanyTheme, ThemeValues},
};

const THEME_COLUMNS: &str = "id, uuid, company_id, logo_light, logo_dark, favicon, \
     primary_color, secondary_color, accent_color, success_color, warning_color, error_color, \
     text_primary, text_secondary, background_color, background_secondary, card_background, \
     custom_css, extra_config, is_active, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct ThemeRepository {
    pool: PgPool,
}

impl ThemeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// O tema da empresa, inclusive se estiver apagado.
    pub async fn find_by_company(&self, company_id: i64) -> Result<Option<CompanyTheme>, AppError> {
        let sql = format!("SELECT {THEME_COLUMNS} FROM company_themes WHERE company_id = $1");
        let theme = sqlx::query_as::<_, CompanyTheme>(&sql)
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(theme)
    }

    pub async fn find_by_company_ids(&self, company_ids: &[i64]) -> Result<Vec<CompanyTheme>, AppError> {
        let sql = format!(
            "SELECT {THEME_COLUMNS} FROM company_themes WHERE company_id = ANY($1) AND deleted_at IS NULL"
        );
        let themes = sqlx::query_as::<_, CompanyTheme>(&sql)
            .bind(company_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(themes)
    }

    /// Temas das empresas em que o usuário é membro ativo.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<CompanyTheme>, AppError> {
        let sql = r#"
            SELECT t.*
            FROM company_themes t
            JOIN companies c ON c.id = t.company_id
            JOIN company_members m ON m.company_id = c.id
            WHERE m.user_id = $1
              AND m.is_active = TRUE AND m.deleted_at IS NULL
              AND c.deleted_at IS NULL
              AND t.deleted_at IS NULL
            ORDER BY c.trade_name
        "#;
        let themes = sqlx::query_as::<_, CompanyTheme>(sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(themes)
    }

    /// Cria ou sobrescreve o tema da empresa. Um tema apagado volta a existir.
    pub async fn save<'e, E>(&self, executor: E, company_id: i64, values: &ThemeValues) -> Result<CompanyTheme, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let p = &values.palette;
        let sql = format!(
            r#"
            INSERT INTO company_themes (
                company_id, logo_light, logo_dark, favicon,
                primary_color, secondary_color, accent_color, success_color, warning_color, error_color,
                text_primary, text_secondary, background_color, background_secondary, card_background,
                custom_css, extra_config, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ON CONFLICT (company_id) DO UPDATE SET
                logo_light = EXCLUDED.logo_light,
                logo_dark = EXCLUDED.logo_dark,
                favicon = EXCLUDED.favicon,
                primary_color = EXCLUDED.primary_color,
                secondary_color = EXCLUDED.secondary_color,
                accent_color = EXCLUDED.accent_color,
                success_color = EXCLUDED.success_color,
                warning_color = EXCLUDED.warning_color,
                error_color = EXCLUDED.error_color,
                text_primary = EXCLUDED.text_primary,
                text_secondary = EXCLUDED.text_secondary,
                background_color = EXCLUDED.background_color,
                background_secondary = EXCLUDED.background_secondary,
                card_background = EXCLUDED.card_background,
                custom_css = EXCLUDED.custom_css,
                extra_config = EXCLUDED.extra_config,
                is_active = EXCLUDED.is_active,
                deleted_at = NULL,
                updated_at = NOW()
            RETURNING {THEME_COLUMNS}
            "#
        );
        let theme = sqlx::query_as::<_, CompanyTheme>(&sql)
            .bind(company_id)
            .bind(&values.logo_light)
            .bind(&values.logo_dark)
            .bind(&values.favicon)
            .bind(&p.primary_color)
            .bind(&p.secondary_color)
            .bind(&p.accent_color)
            .bind(&p.success_color)
            .bind(&p.warning_color)
            .bind(&p.error_color)
            .bind(&p.text_primary)
            .bind(&p.text_secondary)
            .bind(&p.background_color)
            .bind(&p.background_secondary)
            .bind(&p.card_background)
            .bind(&values.custom_css)
            .bind(&values.extra_config)
            .bind(values.is_active)
            .fetch_one(executor)
            .await?;
        Ok(theme)
    }
}
