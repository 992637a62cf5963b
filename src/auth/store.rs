//! Account Store
//!
//! Keeps the user list and the active session in the shared key-value store.
//! The user list is the single source of truth: the session slot holds only
//! a user id and every read of the current user goes through the list.

use crate::auth::error::{AuthError, AuthResult};
use crate::auth::types::{ProfilePatch, Registration, Session, User, UserType, DEFAULT_AVATAR};
use crate::storage::{
    load_json, load_list, next_id, save_json, SharedStore, SESSION_KEY, USERS_KEY,
};
use chrono::Utc;

/// Register/login/logout/update over the shared store
pub struct AccountStore {
    store: SharedStore,
}

impl AccountStore {
    /// Open the account store, seeding the demo account on first use
    pub fn open(store: SharedStore) -> AuthResult<Self> {
        let accounts = Self { store };

        if accounts.store.get(USERS_KEY)?.is_none() {
            tracing::info!("No user list found, seeding demo account");
            accounts.save_users(&[demo_user()])?;
        }

        Ok(accounts)
    }

    /// All registered users
    pub fn users(&self) -> AuthResult<Vec<User>> {
        Ok(load_list(self.store.as_ref(), USERS_KEY)?)
    }

    fn save_users(&self, users: &[User]) -> AuthResult<()> {
        save_json(self.store.as_ref(), USERS_KEY, users)?;
        Ok(())
    }

    /// Find a user by exact email
    pub fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        Ok(self.users()?.into_iter().find(|u| u.email == email))
    }

    /// Create an account and log it in
    pub fn register(&self, registration: Registration) -> AuthResult<User> {
        registration.validate()?;

        let mut users = self.users()?;
        if users.iter().any(|u| u.email == registration.email) {
            tracing::debug!("Registration rejected: {} already exists", registration.email);
            return Err(AuthError::EmailTaken(registration.email));
        }

        let id = next_id(users.iter().map(|u| u.id));
        let email = registration.email.clone();
        let password = registration.password.clone();
        users.push(registration.into_user(id));
        self.save_users(&users)?;

        tracing::info!(user_id = id, "Registered new account {}", email);
        self.login(&email, &password)
    }

    /// Start a session for an active account with matching credentials
    pub fn login(&self, email: &str, password: &str) -> AuthResult<User> {
        let user = self
            .users()?
            .into_iter()
            .find(|u| u.accepts(email, password))
            .ok_or(AuthError::InvalidCredentials)?;

        save_json(self.store.as_ref(), SESSION_KEY, &Session::new(user.id))?;
        tracing::info!(user_id = user.id, "Logged in");
        Ok(user)
    }

    /// End the current session
    pub fn logout(&self) -> AuthResult<()> {
        self.store.remove(SESSION_KEY)?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// The raw session record, if one is stored
    pub fn session(&self) -> AuthResult<Option<Session>> {
        Ok(load_json(self.store.as_ref(), SESSION_KEY)?)
    }

    /// Resolve the session against the user list
    ///
    /// A session pointing at a missing or deactivated user counts as
    /// logged out.
    pub fn current_user(&self) -> AuthResult<Option<User>> {
        let Some(session) = self.session()? else {
            return Ok(None);
        };

        let user = self
            .users()?
            .into_iter()
            .find(|u| u.id == session.user_id && u.is_active);

        if user.is_none() {
            tracing::warn!(
                user_id = session.user_id,
                "Session refers to a missing or inactive user"
            );
        }
        Ok(user)
    }

    /// Merge `patch` into the logged-in user's list entry
    pub fn update_profile(&self, patch: ProfilePatch) -> AuthResult<User> {
        let current = self.current_user()?.ok_or(AuthError::NotAuthenticated)?;

        patch.validate()?;

        let mut users = self.users()?;
        if let Some(email) = &patch.email {
            if users.iter().any(|u| u.id != current.id && &u.email == email) {
                return Err(AuthError::EmailTaken(email.clone()));
            }
        }

        let user = self.modify_user(&mut users, current.id, |u| patch.apply(u))?;
        tracing::info!(user_id = user.id, "Profile updated");
        Ok(user)
    }

    /// Enable or disable an account
    pub fn set_active(&self, user_id: i64, active: bool) -> AuthResult<User> {
        let mut users = self.users()?;
        let user = self.modify_user(&mut users, user_id, |u| u.is_active = active)?;
        tracing::info!(user_id, active, "Account status changed");
        Ok(user)
    }

    pub fn activate(&self, user_id: i64) -> AuthResult<User> {
        self.set_active(user_id, true)
    }

    /// Deactivated accounts cannot log in
    pub fn deactivate(&self, user_id: i64) -> AuthResult<User> {
        self.set_active(user_id, false)
    }

    /// Record a calculation id on the logged-in user
    pub fn link_calculation(&self, calculation_id: i64) -> AuthResult<User> {
        self.modify_current(|u| u.calculations.push(calculation_id))
    }

    /// Record a service order id on the logged-in user
    pub fn link_service(&self, service_id: i64) -> AuthResult<User> {
        self.modify_current(|u| u.services.push(service_id))
    }

    fn modify_current(&self, f: impl FnOnce(&mut User)) -> AuthResult<User> {
        let current = self.current_user()?.ok_or(AuthError::NotAuthenticated)?;
        let mut users = self.users()?;
        self.modify_user(&mut users, current.id, f)
    }

    fn modify_user(
        &self,
        users: &mut [User],
        user_id: i64,
        f: impl FnOnce(&mut User),
    ) -> AuthResult<User> {
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(AuthError::UserNotFound(user_id))?;
        f(user);
        let updated = user.clone();
        self.save_users(users)?;
        Ok(updated)
    }
}

/// Demo account present in a fresh namespace
fn demo_user() -> User {
    User {
        id: 1,
        first_name: "Ahmed".to_string(),
        last_name: "Mohammed".to_string(),
        email: "ahmed@example.com".to_string(),
        password: "123456".to_string(),
        phone: "+966500000001".to_string(),
        company: "Ideal Technology Co.".to_string(),
        user_type: UserType::Client,
        registration_date: Utc::now(),
        avatar: DEFAULT_AVATAR.to_string(),
        services: Vec::new(),
        calculations: Vec::new(),
        is_active: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn registration(email: &str) -> Registration {
        Registration {
            first_name: "Sara".to_string(),
            last_name: "Ali".to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
            confirm_password: "secret".to_string(),
            phone: "+966500000002".to_string(),
            agree_terms: true,
            ..Default::default()
        }
    }

    fn create_test_accounts() -> AccountStore {
        AccountStore::open(MemoryStore::shared()).unwrap()
    }

    #[test]
    fn test_seeds_demo_user_once() {
        let store = MemoryStore::shared();
        let accounts = AccountStore::open(Arc::clone(&store)).unwrap();
        assert_eq!(accounts.users().unwrap().len(), 1);

        accounts.register(registration("sara@example.com")).unwrap();
        let reopened = AccountStore::open(store).unwrap();
        assert_eq!(reopened.users().unwrap().len(), 2);
    }

    #[test]
    fn test_register_logs_in() {
        let accounts = create_test_accounts();
        let user = accounts.register(registration("sara@example.com")).unwrap();

        assert!(user.is_active);
        assert_eq!(user.avatar, DEFAULT_AVATAR);
        assert_eq!(accounts.current_user().unwrap().unwrap().id, user.id);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let accounts = create_test_accounts();
        accounts.register(registration("sara@example.com")).unwrap();
        let before = accounts.users().unwrap();

        let mut second = registration("sara@example.com");
        second.first_name = "Other".to_string();
        let result = accounts.register(second);

        assert!(matches!(result, Err(AuthError::EmailTaken(_))));
        let after = accounts.users().unwrap();
        assert_eq!(after.len(), before.len());
        assert!(after.iter().all(|u| u.first_name != "Other"));
    }

    #[test]
    fn test_invalid_registration_changes_nothing() {
        let accounts = create_test_accounts();
        let mut reg = registration("sara@example.com");
        reg.confirm_password = "typo".to_string();

        assert!(matches!(accounts.register(reg), Err(AuthError::Validation(_))));
        assert_eq!(accounts.users().unwrap().len(), 1);
        assert!(accounts.session().unwrap().is_none());
    }

    #[test]
    fn test_wrong_password_keeps_session() {
        let accounts = create_test_accounts();
        let user = accounts.register(registration("sara@example.com")).unwrap();
        let session = accounts.session().unwrap();

        let result = accounts.login("ahmed@example.com", "wrong");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert_eq!(accounts.session().unwrap(), session);
        assert_eq!(accounts.current_user().unwrap().unwrap().id, user.id);
    }

    #[test]
    fn test_deactivated_account_cannot_login() {
        let accounts = create_test_accounts();
        accounts.logout().unwrap();
        accounts.deactivate(1).unwrap();

        let result = accounts.login("ahmed@example.com", "123456");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert!(accounts.session().unwrap().is_none());

        accounts.activate(1).unwrap();
        assert!(accounts.login("ahmed@example.com", "123456").is_ok());
    }

    #[test]
    fn test_deactivation_ends_read_through_session() {
        let accounts = create_test_accounts();
        accounts.login("ahmed@example.com", "123456").unwrap();
        accounts.deactivate(1).unwrap();

        assert!(accounts.session().unwrap().is_some());
        assert!(accounts.current_user().unwrap().is_none());
    }

    #[test]
    fn test_logout_clears_session() {
        let accounts = create_test_accounts();
        accounts.login("ahmed@example.com", "123456").unwrap();
        accounts.logout().unwrap();

        assert!(accounts.session().unwrap().is_none());
        assert!(accounts.current_user().unwrap().is_none());
    }

    #[test]
    fn test_update_profile_is_visible_through_session() {
        let accounts = create_test_accounts();
        accounts.login("ahmed@example.com", "123456").unwrap();

        let updated = accounts
            .update_profile(ProfilePatch::new().phone("+966511111111"))
            .unwrap();
        assert_eq!(updated.phone, "+966511111111");

        let current = accounts.current_user().unwrap().unwrap();
        assert_eq!(current, updated);
        let listed = accounts.find_by_email("ahmed@example.com").unwrap().unwrap();
        assert_eq!(listed, updated);
    }

    #[test]
    fn test_update_profile_email_conflict() {
        let accounts = create_test_accounts();
        accounts.register(registration("sara@example.com")).unwrap();

        let result = accounts.update_profile(ProfilePatch::new().email("ahmed@example.com"));
        assert!(matches!(result, Err(AuthError::EmailTaken(_))));
        assert!(accounts.find_by_email("sara@example.com").unwrap().is_some());
    }

    #[test]
    fn test_update_profile_rejects_blank_required_fields() {
        let accounts = create_test_accounts();
        accounts.login("ahmed@example.com", "123456").unwrap();

        let patches = [
            ProfilePatch::new().password(""),
            ProfilePatch::new().first_name(" "),
            ProfilePatch::new().phone(""),
            ProfilePatch::new().email("a b@c"),
            ProfilePatch::new().email("@"),
        ];
        for patch in patches {
            assert!(matches!(
                accounts.update_profile(patch),
                Err(AuthError::Validation(_))
            ));
        }

        let user = accounts.current_user().unwrap().unwrap();
        assert_eq!(user.password, "123456");
        assert_eq!(user.email, "ahmed@example.com");
        assert!(accounts.login("ahmed@example.com", "").is_err());
    }

    #[test]
    fn test_update_profile_requires_login() {
        let accounts = create_test_accounts();
        let result = accounts.update_profile(ProfilePatch::new().phone("1"));
        assert!(matches!(result, Err(AuthError::NotAuthenticated)));
    }

    #[test]
    fn test_link_ids() {
        let accounts = create_test_accounts();
        assert!(matches!(
            accounts.link_calculation(10),
            Err(AuthError::NotAuthenticated)
        ));

        accounts.login("ahmed@example.com", "123456").unwrap();
        accounts.link_calculation(10).unwrap();
        let user = accounts.link_service(20).unwrap();

        assert_eq!(user.calculations, vec![10]);
        assert_eq!(user.services, vec![20]);
    }

    #[test]
    fn test_session_survives_reopen() {
        let dir = tempdir().unwrap();
        let user_id;

        {
            let store: SharedStore = Arc::new(FileStore::open(dir.path()).unwrap());
            let accounts = AccountStore::open(store).unwrap();
            user_id = accounts.register(registration("sara@example.com")).unwrap().id;
        }

        let store: SharedStore = Arc::new(FileStore::open(dir.path()).unwrap());
        let accounts = AccountStore::open(store).unwrap();
        assert_eq!(accounts.current_user().unwrap().unwrap().id, user_id);
    }
}
