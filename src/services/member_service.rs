// src/services/member_service.rs

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{self, SoftDeleteTable},
        error::AppError,
        pagination::PageQuery,
        validation::normalize_email,
    },
    db::{MemberRepository, UserRepository},
    models::{
        auth::{NewUser, User},
        member::{AddMemberPayload, CompanyMember, MemberRole, MemberWithUser},
    },
    services::{
        password::{generate_password, hash_password},
        permissions::check_member_change,
    },
};

/// O que fazer com o vínculo (usuário, empresa) ao adicionar um membro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipPlan {
    Create,
    Restore { id: i64 },
    Update { id: i64 },
    Unchanged { id: i64 },
}

impl MembershipPlan {
    /// Houve escrita no vínculo (201); `Unchanged` responde 200.
    pub fn writes(self) -> bool {
        !matches!(self, MembershipPlan::Unchanged { .. })
    }
}

pub fn plan_membership(existing: Option<&CompanyMember>, role: MemberRole) -> MembershipPlan {
    match existing {
        None => MembershipPlan::Create,
        Some(m) if m.deleted_at.is_some() => MembershipPlan::Restore { id: m.id },
        Some(m) if m.is_active && m.role == role => MembershipPlan::Unchanged { id: m.id },
        Some(m) => MembershipPlan::Update { id: m.id },
    }
}

/// Usuário novo precisa de nome.
pub fn require_name_for_new_user(existing: Option<&User>, first_name: Option<&str>) -> Result<(), AppError> {
    let has_name = first_name.is_some_and(|n| !n.trim().is_empty());
    if existing.is_none() && !has_name {
        return Err(AppError::field("first_name", "missing_name"));
    }
    Ok(())
}

// Valor enviado e não vazio que difere do atual
fn changed<'a>(sent: Option<&'a str>, current: &str) -> Option<&'a str> {
    sent.map(str::trim).filter(|v| !v.is_empty() && *v != current)
}

#[derive(Clone)]
pub struct MemberService {
    user_repo: UserRepository,
    member_repo: MemberRepository,
    pool: PgPool,
}

impl MemberService {
    pub fn new(user_repo: UserRepository, member_repo: MemberRepository, pool: PgPool) -> Self {
        Self { user_repo, member_repo, pool }
    }

    /// Adiciona (ou reativa) um membro pelo e-mail, criando o usuário se preciso.
    /// Devolve o membro e se houve escrita no vínculo.
    pub async fn add_member(
        &self,
        company_id: i64,
        actor: MemberRole,
        payload: &AddMemberPayload,
    ) -> Result<(MemberWithUser, bool), AppError> {
        let email = normalize_email(&payload.email);
        let mut tx = self.pool.begin().await?;

        let existing_user = self.user_repo.find_by_email(&mut *tx, &email).await?;
        require_name_for_new_user(existing_user.as_ref(), payload.first_name.as_deref())?;

        let user = match existing_user {
            None => {
                let password = match payload.password.as_deref().filter(|p| !p.is_empty()) {
                    Some(p) => p.to_string(),
                    None => generate_password(),
                };
                let new_user = NewUser {
                    email,
                    password_hash: hash_password(&password).await?,
                    first_name: payload.first_name.as_deref().unwrap_or_default().trim().to_string(),
                    last_name: payload.last_name.as_deref().unwrap_or_default().trim().to_string(),
                    phone: payload.phone.clone().filter(|p| !p.is_empty()),
                    ..Default::default()
                };
                match self.create_user(&mut tx, &new_user).await? {
                    Some(user) => user,
                    // Outra requisição cadastrou o mesmo e-mail primeiro
                    None => {
                        let user = self
                            .user_repo
                            .find_by_email(&mut *tx, &new_user.email)
                            .await?
                            .ok_or(AppError::EmailAlreadyExists)?;
                        tracing::info!("E-mail de {} cadastrado em paralelo; usando o usuário existente", user.id);
                        self.refresh_existing_user(&mut tx, user, payload).await?
                    }
                }
            }
            Some(user) => self.refresh_existing_user(&mut tx, user, payload).await?,
        };

        let existing = self
            .member_repo
            .find_membership(&mut *tx, user.id, company_id)
            .await?;
        let current_role = existing.as_ref().filter(|m| m.grants_access()).map(|m| m.role);
        check_member_change(actor, current_role, Some(payload.role))?;

        let plan = plan_membership(existing.as_ref(), payload.role);
        let member_id = match plan {
            MembershipPlan::Create => {
                self.member_repo
                    .insert(&mut *tx, user.id, company_id, payload.role)
                    .await?
                    .id
            }
            MembershipPlan::Restore { id } | MembershipPlan::Update { id } => {
                self.member_repo.reactivate(&mut *tx, id, payload.role).await?.id
            }
            MembershipPlan::Unchanged { id } => id,
        };

        let member = self
            .member_repo
            .find_with_user_by_id(&mut *tx, member_id)
            .await?
            .ok_or(AppError::MemberNotFound)?;
        tx.commit().await?;

        if plan.writes() {
            tracing::info!("Membro {} ({:?}) gravado na empresa {}", member.uuid, plan, company_id);
        }
        Ok((member, plan.writes()))
    }

    // Insere num savepoint: se o e-mail já existe, a transação externa segue válida.
    // `None` quando o e-mail foi cadastrado por outra requisição.
    async fn create_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        new_user: &NewUser,
    ) -> Result<Option<User>, AppError> {
        let mut savepoint = sqlx::Connection::begin(&mut **tx).await?;
        match self.user_repo.create_user(&mut *savepoint, new_user).await {
            Ok(user) => {
                savepoint.commit().await?;
                tracing::info!("Usuário {} criado ao ser adicionado como membro", user.id);
                Ok(Some(user))
            }
            Err(AppError::EmailAlreadyExists) => {
                savepoint.rollback().await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    // Usuário já cadastrado: atualiza nome/telefone enviados e troca a senha se vier uma.
    // TODO: trocar a senha de uma conta que já existe só pelo e-mail permite que o
    // proprietário de qualquer empresa assuma a conta; exigir confirmação por e-mail.
    async fn refresh_existing_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: User,
        payload: &AddMemberPayload,
    ) -> Result<User, AppError> {
        let first_name = changed(payload.first_name.as_deref(), &user.first_name);
        let last_name = changed(payload.last_name.as_deref(), &user.last_name);
        let phone = changed(payload.phone.as_deref(), user.phone.as_deref().unwrap_or_default());

        let user = if first_name.is_some() || last_name.is_some() || phone.is_some() {
            self.user_repo
                .update_profile(
                    &mut **tx,
                    user.id,
                    first_name.unwrap_or(&user.first_name),
                    last_name.unwrap_or(&user.last_name),
                    phone.or(user.phone.as_deref()),
                )
                .await?
        } else {
            user
        };

        if let Some(password) = payload.password.as_deref().filter(|p| !p.is_empty()) {
            let password_hash = hash_password(password).await?;
            self.user_repo.set_password(&mut **tx, user.id, &password_hash).await?;
        }
        Ok(user)
    }

    pub async fn list_members(&self, company_id: i64, query: &PageQuery) -> Result<(Vec<MemberWithUser>, i64), AppError> {
        let members = self
            .member_repo
            .list_active(company_id, query.limit(), query.offset())
            .await?;
        let count = self.member_repo.count_active(company_id).await?;
        Ok((members, count))
    }

    pub async fn get_member(&self, company_id: i64, member_uuid: Uuid) -> Result<MemberWithUser, AppError> {
        self.member_repo
            .find_with_user(company_id, member_uuid)
            .await?
            .ok_or(AppError::MemberNotFound)
    }

    pub async fn update_role(
        &self,
        company_id: i64,
        member_uuid: Uuid,
        actor: MemberRole,
        role: MemberRole,
    ) -> Result<MemberWithUser, AppError> {
        let member = self.get_member(company_id, member_uuid).await?;
        check_member_change(actor, Some(member.role), Some(role))?;

        if member.role != role {
            self.member_repo.update_role(member.id, role).await?;
            tracing::info!("Membro {} agora é {:?}", member.uuid, role);
        }
        Ok(MemberWithUser { role, ..member })
    }

    pub async fn remove_member(&self, company_id: i64, member_uuid: Uuid, actor: MemberRole) -> Result<(), AppError> {
        let member = self.get_member(company_id, member_uuid).await?;
        check_member_change(actor, Some(member.role), None)?;

        if !db_utils::soft_delete(&self.pool, SoftDeleteTable::CompanyMembers, member.id).await? {
            return Err(AppError::MemberNotFound);
        }
        tracing::info!("Membro {} removido da empresa {}", member.uuid, company_id);
        Ok(())
    }

    pub async fn reset_password(
        &self,
        company_id: i64,
        member_uuid: Uuid,
        actor: MemberRole,
        password: &str,
    ) -> Result<(), AppError> {
        let member = self.get_member(company_id, member_uuid).await?;
        check_member_change(actor, Some(member.role), None)?;

        let password_hash = hash_password(password).await?;
        self.user_repo
            .set_password(&self.pool, member.user_id, &password_hash)
            .await?;
        tracing::info!("Senha do membro {} redefinida", member.uuid);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn membership(role: MemberRole, is_active: bool, deleted: bool) -> CompanyMember {
        CompanyMember {
            id: 10,
            uuid: Uuid::new_v4(),
            user_id: 1,
            company_id: 2,
            role,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: deleted.then(Utc::now),
        }
    }

    #[test]
    fn new_membership_is_created() {
        let plan = plan_membership(None, MemberRole::Attendant);
        assert_eq!(plan, MembershipPlan::Create);
        assert!(plan.writes());
    }

    #[test]
    fn same_role_twice_writes_nothing() {
        let existing = membership(MemberRole::Admin, true, false);
        let plan = plan_membership(Some(&existing), MemberRole::Admin);
        assert_eq!(plan, MembershipPlan::Unchanged { id: 10 });
        assert!(!plan.writes());
    }

    #[test]
    fn deleted_membership_is_restored_even_with_same_role() {
        let existing = membership(MemberRole::Admin, true, true);
        assert_eq!(
            plan_membership(Some(&existing), MemberRole::Admin),
            MembershipPlan::Restore { id: 10 }
        );
    }

    #[test]
    fn role_change_or_inactive_membership_is_updated() {
        let existing = membership(MemberRole::Attendant, true, false);
        assert_eq!(
            plan_membership(Some(&existing), MemberRole::Admin),
            MembershipPlan::Update { id: 10 }
        );
        let inactive = membership(MemberRole::Admin, false, false);
        assert_eq!(
            plan_membership(Some(&inactive), MemberRole::Admin),
            MembershipPlan::Update { id: 10 }
        );
    }

    #[test]
    fn unknown_email_without_name_is_rejected() {
        let err = require_name_for_new_user(None, None).expect_err("sem nome");
        match err {
            AppError::ValidationError(errors) => {
                let fields = errors.field_errors();
                assert_eq!(fields["first_name"][0].code, "missing_name");
            }
            other => panic!("erro inesperado: {other:?}"),
        }
        assert!(require_name_for_new_user(None, Some("   ")).is_err());
        assert!(require_name_for_new_user(None, Some("Bruno")).is_ok());
    }

    #[test]
    fn existing_user_needs_no_name() {
        let user = crate::services::token::tests::user();
        assert!(require_name_for_new_user(Some(&user), None).is_ok());
    }

    #[test]
    fn only_non_empty_differences_count_as_changes() {
        assert_eq!(changed(Some("Ana"), "Ana"), None);
        assert_eq!(changed(Some(""), "Ana"), None);
        assert_eq!(changed(None, "Ana"), None);
        assert_eq!(changed(Some(" Bia "), "Ana"), Some("Bia"));
    }
}
