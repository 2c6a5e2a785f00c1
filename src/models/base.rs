// src/models/base.rs

use chrono::{DateTime, Utc};

/// Entidades com exclusão lógica: "apagar" só preenche `deleted_at`.
pub trait SoftDelete {
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }
}

/// Implementa `SoftDelete` para structs com um campo `deleted_at`.
macro_rules! impl_soft_delete {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::models::base::SoftDelete for $ty {
                fn deleted_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
                    self.deleted_at
                }
            }
        )+
    };
}

pub(crate) use impl_soft_delete;

/// Caminhos relativos de mídia (logos) viram URLs absolutas com a base configurada.
pub fn media_url(base: &str, path: Option<&str>) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    if path.starts_with("http://") || path.starts_with("https://") || base.is_empty() {
        return Some(path.to_string());
    }
    Some(format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}
