// src/models/company.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{
    validate_not_blank, validate_points_per_real, validate_state, validate_zip_code, CNPJ,
};
use crate::models::base::{impl_soft_delete, media_url};

// ---
// Company (empresa parceira do programa de fidelidade)
// ---
#[derive(Debug, Clone, FromRow)]
pub struct Company {
    pub id: i64,
    pub uuid: Uuid,
    pub trade_name: String,
    pub legal_name: String,
    pub cnpj: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub logo: Option<String>,
    pub points_per_real: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_soft_delete!(Company);

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyResponse {
    pub uuid: Uuid,
    #[schema(example = "Padaria Central")]
    pub trade_name: String,
    #[schema(example = "Padaria Central Ltda")]
    pub legal_name: String,
    #[schema(example = "12.345.678/0001-99")]
    pub cnpj: String,
    pub email: String,
    #[schema(example = "(11) 3333-4444")]
    pub phone: String,
    pub address: String,
    pub city: String,
    #[schema(example = "SP")]
    pub state: String,
    #[schema(example = "01310-100")]
    pub zip_code: String,
    pub logo: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String, example = "1.50")]
    pub points_per_real: Decimal,
    pub is_active: bool,
}

impl CompanyResponse {
    pub fn new(company: &Company, media_base: &str) -> Self {
        Self {
            uuid: company.uuid,
            trade_name: company.trade_name.clone(),
            legal_name: company.legal_name.clone(),
            cnpj: company.cnpj.clone(),
            email: company.email.clone(),
            phone: company.phone.clone(),
            address: company.address.clone(),
            city: company.city.clone(),
            state: company.state.clone(),
            zip_code: company.zip_code.clone(),
            logo: media_url(media_base, company.logo.as_deref()),
            points_per_real: company.points_per_real,
            is_active: company.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCompanyPayload {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"), length(max = 255, message = "too_long"))]
    pub trade_name: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"), length(max = 255, message = "too_long"))]
    pub legal_name: String,

    #[serde(default)]
    #[validate(regex(path = *CNPJ, message = "invalid_cnpj"))]
    #[schema(example = "12.345.678/0001-99")]
    pub cnpj: String,

    #[serde(default)]
    #[validate(email(message = "invalid_email"))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"), length(max = 20, message = "too_long"))]
    pub phone: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "too_long"))]
    pub address: String,

    #[serde(default)]
    #[validate(length(max = 100, message = "too_long"))]
    pub city: String,

    #[serde(default)]
    #[validate(custom(function = "validate_state"))]
    pub state: String,

    #[serde(default)]
    #[validate(custom(function = "validate_zip_code"))]
    pub zip_code: String,

    pub logo: Option<String>,

    #[validate(custom(function = "validate_points_per_real"))]
    #[schema(value_type = Option<String>, example = "1.50")]
    pub points_per_real: Option<Decimal>,
}

// PATCH: só os campos enviados mudam
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCompanyPayload {
    #[validate(custom(function = "validate_not_blank"), length(max = 255, message = "too_long"))]
    pub trade_name: Option<String>,
    #[validate(custom(function = "validate_not_blank"), length(max = 255, message = "too_long"))]
    pub legal_name: Option<String>,
    #[validate(regex(path = *CNPJ, message = "invalid_cnpj"))]
    pub cnpj: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_not_blank"), length(max = 20, message = "too_long"))]
    pub phone: Option<String>,
    #[validate(length(max = 255, message = "too_long"))]
    pub address: Option<String>,
    #[validate(length(max = 100, message = "too_long"))]
    pub city: Option<String>,
    #[validate(custom(function = "validate_state"))]
    pub state: Option<String>,
    #[validate(custom(function = "validate_zip_code"))]
    pub zip_code: Option<String>,
    pub logo: Option<String>,
    #[validate(custom(function = "validate_points_per_real"))]
    #[schema(value_type = Option<String>, example = "2.00")]
    pub points_per_real: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl UpdateCompanyPayload {
    /// Aplica as mudanças sobre uma cópia da empresa.
    pub fn apply_to(self, company: &Company) -> Company {
        let mut updated = company.clone();
        if let Some(v) = self.trade_name { updated.trade_name = v; }
        if let Some(v) = self.legal_name { updated.legal_name = v; }
        if let Some(v) = self.cnpj { updated.cnpj = v; }
        if let Some(v) = self.email { updated.email = v; }
        if let Some(v) = self.phone { updated.phone = v; }
        if let Some(v) = self.address { updated.address = v; }
        if let Some(v) = self.city { updated.city = v; }
        if let Some(v) = self.state { updated.state = v; }
        if let Some(v) = self.zip_code { updated.zip_code = v; }
        if let Some(v) = self.logo { updated.logo = (!v.is_empty()).then_some(v); }
        if let Some(v) = self.points_per_real { updated.points_per_real = v; }
        if let Some(v) = self.is_active { updated.is_active = v; }
        updated
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::base::SoftDelete;

    pub(crate) fn company() -> Company {
        Company {
            id: 7,
            uuid: Uuid::new_v4(),
            trade_name: "Padaria Central".into(),
            legal_name: "Padaria Central Ltda".into(),
            cnpj: "12.345.678/0001-99".into(),
            email: "contato@padaria.com".into(),
            phone: "(11) 3333-4444".into(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            logo: Some("companies/logos/p.png".into()),
            points_per_real: Decimal::new(150, 2),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn response_serializes_decimal_as_string() {
        let response = CompanyResponse::new(&company(), "https://cdn.x/media");
        let json = serde_json::to_value(&response).expect("serializa");
        assert_eq!(json["points_per_real"], "1.50");
        assert_eq!(json["logo"], "https://cdn.x/media/companies/logos/p.png");
    }

    #[test]
    fn patch_touches_only_sent_fields() {
        let original = company();
        let patch = UpdateCompanyPayload {
            trade_name: Some("Padaria Nova".into()),
            logo: Some(String::new()),
            ..Default::default()
        };
        let updated = patch.apply_to(&original);
        assert_eq!(updated.trade_name, "Padaria Nova");
        assert_eq!(updated.cnpj, original.cnpj);
        assert!(updated.logo.is_none());
        assert!(!updated.is_deleted());
    }

    #[test]
    fn create_payload_checks_cnpj_format() {
        let payload: CreateCompanyPayload = serde_json::from_value(serde_json::json!({
            "trade_name": "Loja",
            "legal_name": "Loja Ltda",
            "cnpj": "12345678000199",
            "email": "loja@x.com",
            "phone": "(11) 1111-1111",
            "points_per_real": "1.50"
        }))
        .expect("desserializa");
        let errors = payload.validate().expect_err("CNPJ sem máscara");
        let fields = errors.field_errors();
        assert_eq!(fields["cnpj"][0].code, "regex");
        assert_eq!(fields["cnpj"][0].message.as_deref(), Some("invalid_cnpj"));
    }
}
