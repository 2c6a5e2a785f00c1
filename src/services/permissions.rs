// src/services/permissions.rs

use axum::http::Method;

use crate::{common::error::AppError, models::member::MemberRole};

/// O que a requisição quer fazer com o recurso da empresa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
    Delete,
}

impl Action {
    pub fn from_method(method: &Method) -> Self {
        match *method {
            Method::GET | Method::HEAD | Method::OPTIONS => Action::Read,
            Method::DELETE => Action::Delete,
            _ => Action::Write,
        }
    }
}

// leitura: todos | escrita: owner, admin | exclusão: só owner
pub fn role_allows(role: MemberRole, action: Action) -> bool {
    match action {
        Action::Read => true,
        Action::Write => matches!(role, MemberRole::Owner | MemberRole::Admin),
        Action::Delete => role == MemberRole::Owner,
    }
}

pub fn can_manage_members(role: MemberRole) -> bool {
    matches!(role, MemberRole::Owner | MemberRole::Admin)
}

/// Admin gerencia atendentes e outros admins, mas não toca em proprietários
/// nem promove alguém a proprietário.
pub fn check_member_change(
    actor: MemberRole,
    target_current: Option<MemberRole>,
    target_new: Option<MemberRole>,
) -> Result<(), AppError> {
    if !can_manage_members(actor) {
        return Err(AppError::Forbidden("manage_members_denied"));
    }
    if actor == MemberRole::Owner {
        return Ok(());
    }
    if target_current == Some(MemberRole::Owner) || target_new == Some(MemberRole::Owner) {
        return Err(AppError::Forbidden("owner_protected"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use MemberRole::*;

    #[test]
    fn permission_table() {
        let expected = [
            (Owner, [true, true, true]),
            (Admin, [true, true, false]),
            (Attendant, [true, false, false]),
        ];
        for (role, [read, write, delete]) in expected {
            assert_eq!(role_allows(role, Action::Read), read, "{role:?} read");
            assert_eq!(role_allows(role, Action::Write), write, "{role:?} write");
            assert_eq!(role_allows(role, Action::Delete), delete, "{role:?} delete");
        }
    }

    #[test]
    fn actions_from_http_methods() {
        assert_eq!(Action::from_method(&Method::GET), Action::Read);
        assert_eq!(Action::from_method(&Method::HEAD), Action::Read);
        assert_eq!(Action::from_method(&Method::OPTIONS), Action::Read);
        assert_eq!(Action::from_method(&Method::POST), Action::Write);
        assert_eq!(Action::from_method(&Method::PUT), Action::Write);
        assert_eq!(Action::from_method(&Method::PATCH), Action::Write);
        assert_eq!(Action::from_method(&Method::DELETE), Action::Delete);
    }

    #[test]
    fn member_management() {
        assert!(can_manage_members(Owner));
        assert!(can_manage_members(Admin));
        assert!(!can_manage_members(Attendant));

        assert!(check_member_change(Owner, Some(Owner), Some(Attendant)).is_ok());
        assert!(check_member_change(Admin, Some(Attendant), Some(Admin)).is_ok());
        assert!(check_member_change(Admin, None, Some(Attendant)).is_ok());
        assert!(matches!(
            check_member_change(Admin, None, Some(Owner)),
            Err(AppError::Forbidden("owner_protected"))
        ));
        assert!(matches!(
            check_member_change(Admin, Some(Owner), None),
            Err(AppError::Forbidden("owner_protected"))
        ));
        assert!(matches!(
            check_member_change(Attendant, None, Some(Attendant)),
            Err(AppError::Forbidden("manage_members_denied"))
        ));
    }
}
