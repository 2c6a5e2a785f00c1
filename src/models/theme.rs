// src/models/theme.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{validate_extra_config, HEX_COLOR};
use crate::models::base::{impl_soft_delete, media_url};

// As 11 cores do tema, na ordem das colunas
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Palette {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub success_color: String,
    pub warning_color: String,
    pub error_color: String,
    pub text_primary: String,
    pub text_secondary: String,
    pub background_color: String,
    pub background_secondary: String,
    pub card_background: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary_color: "#1976D2".into(),
            secondary_color: "#424242".into(),
            accent_color: "#FF5722".into(),
            success_color: "#4CAF50".into(),
            warning_color: "#FF9800".into(),
            error_color: "#F44336".into(),
            text_primary: "#212121".into(),
            text_secondary: "#757575".into(),
            background_color: "#FFFFFF".into(),
            background_secondary: "#FAFAFA".into(),
            card_background: "#FFFFFF".into(),
        }
    }
}

/// Tudo o que o dono/admin pode editar num tema.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ThemeValues {
    pub logo_light: Option<String>,
    pub logo_dark: Option<String>,
    pub favicon: Option<String>,
    #[sqlx(flatten)]
    pub palette: Palette,
    pub custom_css: String,
    pub extra_config: Value,
    pub is_active: bool,
}

impl Default for ThemeValues {
    fn default() -> Self {
        Self {
            logo_light: None,
            logo_dark: None,
            favicon: None,
            palette: Palette::default(),
            custom_css: String::new(),
            extra_config: json!({}),
            is_active: true,
        }
    }
}

impl ThemeValues {
    /// Cores, CSS e configurações extras de volta ao padrão; logos e `is_active` ficam.
    pub fn reset_to_default(&self) -> Self {
        Self {
            palette: Palette::default(),
            custom_css: String::new(),
            extra_config: json!({}),
            ..self.clone()
        }
    }
}

// ---
// CompanyTheme (identidade visual, um-para-um com Company)
// ---
#[derive(Debug, Clone, FromRow)]
pub struct CompanyTheme {
    pub id: i64,
    pub uuid: Uuid,
    pub company_id: i64,
    #[sqlx(flatten)]
    pub values: ThemeValues,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_soft_delete!(CompanyTheme);

#[derive(Debug, Serialize, ToSchema)]
pub struct ThemeLogos {
    pub light: Option<String>,
    pub dark: Option<String>,
    pub favicon: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ThemeColors {
    #[schema(example = "#1976D2")]
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub success: String,
    pub warning: String,
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ThemeText {
    pub primary: String,
    pub secondary: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ThemeBackground {
    pub primary: String,
    pub secondary: String,
    pub card: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ThemeResponse {
    pub uuid: Uuid,
    pub logos: ThemeLogos,
    pub colors: ThemeColors,
    pub text: ThemeText,
    pub background: ThemeBackground,
    pub custom_css: String,
    #[schema(value_type = Object)]
    pub extra_config: Value,
    pub is_active: bool,
}

impl ThemeResponse {
    pub fn new(theme: &CompanyTheme, media_base: &str) -> Self {
        Self::from_values(theme.uuid, &theme.values, media_base)
    }

    /// Tema efetivo da empresa: um tema desativado é exibido com os valores padrão.
    pub fn resolved(theme: &CompanyTheme, media_base: &str) -> Self {
        if theme.values.is_active {
            Self::new(theme, media_base)
        } else {
            let defaults = ThemeValues { is_active: false, ..ThemeValues::default() };
            Self::from_values(theme.uuid, &defaults, media_base)
        }
    }

    fn from_values(uuid: Uuid, values: &ThemeValues, media_base: &str) -> Self {
        let p = &values.palette;
        Self {
            uuid,
            logos: ThemeLogos {
                light: media_url(media_base, values.logo_light.as_deref()),
                dark: media_url(media_base, values.logo_dark.as_deref()),
                favicon: media_url(media_base, values.favicon.as_deref()),
            },
            colors: ThemeColors {
                primary: p.primary_color.clone(),
                secondary: p.secondary_color.clone(),
                accent: p.accent_color.clone(),
                success: p.success_color.clone(),
                warning: p.warning_color.clone(),
                error: p.error_color.clone(),
            },
            text: ThemeText {
                primary: p.text_primary.clone(),
                secondary: p.text_secondary.clone(),
            },
            background: ThemeBackground {
                primary: p.background_color.clone(),
                secondary: p.background_secondary.clone(),
                card: p.card_background.clone(),
            },
            custom_css: values.custom_css.clone(),
            extra_config: values.extra_config.clone(),
            is_active: values.is_active,
        }
    }
}

/// Apenas as cores; qualquer outro campo do corpo é ignorado.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct ColorsPayload {
    #[validate(regex(path = *HEX_COLOR, message = "invalid_hex_color"))]
    #[schema(example = "#FF5733")]
    pub primary_color: Option<String>,
    #[validate(regex(path = *HEX_COLOR, message = "invalid_hex_color"))]
    pub secondary_color: Option<String>,
    #[validate(regex(path = *HEX_COLOR, message = "invalid_hex_color"))]
    pub accent_color: Option<String>,
    #[validate(regex(path = *HEX_COLOR, message = "invalid_hex_color"))]
    pub success_color: Option<String>,
    #[validate(regex(path = *HEX_COLOR, message = "invalid_hex_color"))]
    pub warning_color: Option<String>,
    #[validate(regex(path = *HEX_COLOR, message = "invalid_hex_color"))]
    pub error_color: Option<String>,
    #[validate(regex(path = *HEX_COLOR, message = "invalid_hex_color"))]
    pub text_primary: Option<String>,
    #[validate(regex(path = *HEX_COLOR, message = "invalid_hex_color"))]
    pub text_secondary: Option<String>,
    #[validate(regex(path = *HEX_COLOR, message = "invalid_hex_color"))]
    pub background_color: Option<String>,
    #[validate(regex(path = *HEX_COLOR, message = "invalid_hex_color"))]
    pub background_secondary: Option<String>,
    #[validate(regex(path = *HEX_COLOR, message = "invalid_hex_color"))]
    pub card_background: Option<String>,
}

impl ColorsPayload {
    pub fn apply(self, mut palette: Palette) -> Palette {
        if let Some(v) = self.primary_color { palette.primary_color = v; }
        if let Some(v) = self.secondary_color { palette.secondary_color = v; }
        if let Some(v) = self.accent_color { palette.accent_color = v; }
        if let Some(v) = self.success_color { palette.success_color = v; }
        if let Some(v) = self.warning_color { palette.warning_color = v; }
        if let Some(v) = self.error_color { palette.error_color = v; }
        if let Some(v) = self.text_primary { palette.text_primary = v; }
        if let Some(v) = self.text_secondary { palette.text_secondary = v; }
        if let Some(v) = self.background_color { palette.background_color = v; }
        if let Some(v) = self.background_secondary { palette.background_secondary = v; }
        if let Some(v) = self.card_background { palette.card_background = v; }
        palette
    }
}

// PUT/PATCH do tema
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateThemePayload {
    pub logo_light: Option<String>,
    pub logo_dark: Option<String>,
    pub favicon: Option<String>,

    #[serde(flatten)]
    #[validate(nested)]
    pub colors: ColorsPayload,

    pub custom_css: Option<String>,

    #[validate(custom(function = "validate_extra_config"))]
    #[schema(value_type = Option<Object>)]
    pub extra_config: Option<Value>,

    pub is_active: Option<bool>,
}

impl UpdateThemePayload {
    /// Aplica os campos enviados sobre `base`.
    /// PATCH usa os valores atuais como base; PUT usa os valores padrão.
    pub fn apply(self, base: ThemeValues) -> ThemeValues {
        // String vazia remove a imagem
        let logo = |sent: Option<String>, current: Option<String>| match sent {
            Some(v) if v.is_empty() => None,
            Some(v) => Some(v),
            None => current,
        };
        ThemeValues {
            logo_light: logo(self.logo_light, base.logo_light),
            logo_dark: logo(self.logo_dark, base.logo_dark),
            favicon: logo(self.favicon, base.favicon),
            palette: self.colors.apply(base.palette),
            custom_css: self.custom_css.unwrap_or(base.custom_css),
            extra_config: self.extra_config.unwrap_or(base.extra_config),
            is_active: self.is_active.unwrap_or(base.is_active),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme(values: ThemeValues) -> CompanyTheme {
        CompanyTheme {
            id: 1,
            uuid: Uuid::new_v4(),
            company_id: 7,
            values,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn default_palette_matches_brand_defaults() {
        let response = ThemeResponse::new(&theme(ThemeValues::default()), "");
        let json = serde_json::to_value(&response).expect("serializa");
        assert_eq!(json["colors"]["primary"], "#1976D2");
        assert_eq!(json["colors"]["secondary"], "#424242");
        assert_eq!(json["colors"]["accent"], "#FF5722");
        assert_eq!(json["colors"]["success"], "#4CAF50");
        assert_eq!(json["colors"]["warning"], "#FF9800");
        assert_eq!(json["colors"]["error"], "#F44336");
        assert_eq!(json["text"]["primary"], "#212121");
        assert_eq!(json["text"]["secondary"], "#757575");
        assert_eq!(json["background"]["primary"], "#FFFFFF");
        assert_eq!(json["background"]["secondary"], "#FAFAFA");
        assert_eq!(json["background"]["card"], "#FFFFFF");
        assert_eq!(json["extra_config"], json!({}));
        assert_eq!(json["logos"]["light"], Value::Null);
    }

    #[test]
    fn update_colors_rejects_invalid_hex() {
        let payload: ColorsPayload =
            serde_json::from_value(json!({ "primary_color": "#ZZZZZZ" })).expect("desserializa");
        let errors = payload.validate().expect_err("cor inválida");
        let fields = errors.field_errors();
        assert_eq!(fields["primary_color"][0].message.as_deref(), Some("invalid_hex_color"));
    }

    #[test]
    fn update_colors_ignores_non_color_fields() {
        let payload: ColorsPayload = serde_json::from_value(json!({
            "accent_color": "#E74C3C",
            "custom_css": "body { display: none }",
            "is_active": false
        }))
        .expect("campos extras são ignorados");
        assert!(payload.validate().is_ok());
        let palette = payload.apply(Palette::default());
        assert_eq!(palette.accent_color, "#E74C3C");
        assert_eq!(palette.primary_color, "#1976D2");
    }

    #[test]
    fn theme_payload_validates_flattened_colors() {
        let payload: UpdateThemePayload = serde_json::from_value(json!({
            "secondary_color": "blue",
            "extra_config": [1, 2]
        }))
        .expect("desserializa");
        let errors = payload.validate().expect_err("cor e extra_config inválidos");
        let all = errors.errors();
        assert!(all.contains_key("colors"));
        assert!(all.contains_key("extra_config"));
    }

    #[test]
    fn patch_keeps_unsent_fields_and_put_resets_them() {
        let mut current = ThemeValues::default();
        current.custom_css = ".btn { border-radius: 8px }".into();
        current.logo_light = Some("themes/logos/l.png".into());

        let patch: UpdateThemePayload =
            serde_json::from_value(json!({ "primary_color": "#000" })).expect("desserializa");
        let patched = patch.apply(current.clone());
        assert_eq!(patched.palette.primary_color, "#000");
        assert_eq!(patched.custom_css, current.custom_css);
        assert_eq!(patched.logo_light, current.logo_light);

        let put: UpdateThemePayload =
            serde_json::from_value(json!({ "primary_color": "#000" })).expect("desserializa");
        let replaced = put.apply(ThemeValues::default());
        assert_eq!(replaced.palette.primary_color, "#000");
        assert!(replaced.custom_css.is_empty());
        assert!(replaced.logo_light.is_none());
    }

    #[test]
    fn reset_restores_palette_but_keeps_logos() {
        let mut values = ThemeValues::default();
        values.palette.primary_color = "#123456".into();
        values.extra_config = json!({ "font_family": "Roboto" });
        values.logo_dark = Some("d.png".into());

        let reset = values.reset_to_default();
        assert_eq!(reset.palette, Palette::default());
        assert_eq!(reset.extra_config, json!({}));
        assert_eq!(reset.logo_dark.as_deref(), Some("d.png"));
    }

    #[test]
    fn inactive_theme_resolves_to_defaults() {
        let mut values = ThemeValues::default();
        values.palette.primary_color = "#123456".into();
        values.is_active = false;
        let resolved = ThemeResponse::resolved(&theme(values), "");
        assert_eq!(resolved.colors.primary, "#1976D2");
        assert!(!resolved.is_active);
    }
}
