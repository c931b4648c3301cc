//! # Auth Commands
//!
//! Staff login/logout and the admin gate.
//!
//! ## Login Screen
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Dyad Cafe                                                              │
//! │                                                                         │
//! │   [ Ahmed ]  [ Fatima ]          ◄── login_candidates (admin hidden)   │
//! │                                       tap ─► login_as(staff_id)         │
//! │                                                                         │
//! │   Access code: [_][_][_][_]      ◄── login_with_code("1111")           │
//! │                                                                         │
//! │   ⚙ Settings ─► unlock_admin("0000")                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Wrong codes are reported and can be retried without limit.

use tally_core::validation::validate_access_code;
use tally_core::{CoreError, Staff};
use tracing::{debug, info, warn};

use crate::commands::OrderResponse;
use crate::error::{ApiError, AuthError};
use crate::state::{AdminGate, SessionState, StoreState};

/// Staff shown on the login screen.
///
/// Admins are left out, as is anyone whose code is the admin code.
pub async fn login_candidates(store: &StoreState) -> Vec<Staff> {
    debug!("login_candidates command");

    let admin_code = store.inner().settings().settings().await.admin_code;
    store
        .inner()
        .catalog()
        .staff()
        .await
        .into_iter()
        .filter(|s| !s.is_admin() && s.access_code != admin_code)
        .collect()
}

/// Logs in whoever owns the access code.
pub async fn login_with_code(
    store: &StoreState,
    session: &SessionState,
    code: &str,
) -> Result<OrderResponse, ApiError> {
    debug!("login_with_code command");

    validate_access_code(code)?;

    let staff = match store.inner().catalog().staff_by_code(code).await {
        Some(staff) => staff,
        None => {
            warn!("Login attempt with unknown access code");
            return Err(AuthError::UnknownAccessCode.into());
        }
    };

    start_session(session, staff)
}

/// Logs in a staff member picked from the login list.
pub async fn login_as(
    store: &StoreState,
    session: &SessionState,
    staff_id: &str,
) -> Result<OrderResponse, ApiError> {
    debug!(staff_id = %staff_id, "login_as command");

    let staff = store
        .inner()
        .catalog()
        .staff()
        .await
        .into_iter()
        .find(|s| s.id == staff_id)
        .ok_or_else(|| AuthError::UnknownStaff(staff_id.to_string()))?;

    start_session(session, staff)
}

fn start_session(session: &SessionState, staff: Staff) -> Result<OrderResponse, ApiError> {
    let staff_id = staff.id.clone();

    let response = session.with_session_mut(|s| {
        s.login(staff)?;
        Ok::<_, CoreError>(OrderResponse::from(&*s))
    })?;

    info!(staff_id = %staff_id, "Staff logged in");
    Ok(response)
}

/// Ends the session, discarding any unsubmitted items, and re-locks the
/// admin gate.
pub fn logout(session: &SessionState, admin: &AdminGate) -> OrderResponse {
    debug!("logout command");

    let (discarded, response) = session.with_session_mut(|s| {
        let discarded = s.logout();
        (discarded, OrderResponse::from(&*s))
    });
    admin.lock();

    if discarded > 0 {
        warn!(items = discarded, "Logged out with unsubmitted items; order discarded");
    } else {
        info!("Staff logged out");
    }

    response
}

/// Opens the admin gate if `code` matches the shop's admin code.
pub async fn unlock_admin(store: &StoreState, admin: &AdminGate, code: &str) -> Result<(), ApiError> {
    debug!("unlock_admin command");

    let settings = store.inner().settings().settings().await;
    if code != settings.admin_code {
        warn!("Wrong admin code entered");
        return Err(AuthError::WrongAdminCode.into());
    }

    admin.unlock();
    info!("Admin gate unlocked");
    Ok(())
}

pub fn lock_admin(admin: &AdminGate) {
    debug!("lock_admin command");
    admin.lock();
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::register;
    use crate::error::ErrorCode;
    use tally_core::{Money, Product, SessionPhase};

    #[tokio::test]
    async fn test_login_candidates_hide_admin() {
        let (reg, _) = register().await;

        let names: Vec<String> = login_candidates(&reg.store)
            .await
            .into_iter()
            .map(|s| s.name)
            .collect();

        assert_eq!(names, vec!["Ahmed", "Fatima"]);
    }

    #[tokio::test]
    async fn test_login_with_code() {
        let (reg, _) = register().await;

        let response = login_with_code(&reg.store, &reg.session, "2222").await.unwrap();

        assert_eq!(response.phase, SessionPhase::ActiveEmpty);
        assert_eq!(response.staff.unwrap().name, "Fatima");
        assert_eq!(response.order.unwrap().staff_id, "w2");
    }

    #[tokio::test]
    async fn test_login_with_bad_codes() {
        let (reg, _) = register().await;

        let err = login_with_code(&reg.store, &reg.session, "9999").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);

        let err = login_with_code(&reg.store, &reg.session, "12a4").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        // No lockout after failures
        assert!(login_with_code(&reg.store, &reg.session, "1111").await.is_ok());
    }

    #[tokio::test]
    async fn test_second_login_requires_logout() {
        let (reg, _) = register().await;
        login_as(&reg.store, &reg.session, "w1").await.unwrap();

        let err = login_as(&reg.store, &reg.session, "w2").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionError);

        logout(&reg.session, &reg.admin);
        let response = login_as(&reg.store, &reg.session, "w2").await.unwrap();
        assert_eq!(response.staff.unwrap().id, "w2");
    }

    #[tokio::test]
    async fn test_login_as_unknown_staff() {
        let (reg, _) = register().await;
        let err = login_as(&reg.store, &reg.session, "nobody").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_logout_discards_order_and_locks_admin() {
        let (reg, _) = register().await;
        login_as(&reg.store, &reg.session, "w1").await.unwrap();
        reg.session
            .with_session_mut(|s| s.add_item(&Product::new("p1", "Espresso", Money::from_major(15)), &[]))
            .unwrap();
        unlock_admin(&reg.store, &reg.admin, "0000").await.unwrap();

        let response = logout(&reg.session, &reg.admin);

        assert_eq!(response.phase, SessionPhase::NoSession);
        assert!(response.order.is_none());
        assert!(!reg.admin.is_unlocked());
        assert!(reg.store.inner().ledger().orders().await.is_empty());
    }

    #[tokio::test]
    async fn test_unlock_admin() {
        let (reg, _) = register().await;

        let err = unlock_admin(&reg.store, &reg.admin, "1234").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert!(!reg.admin.is_unlocked());

        unlock_admin(&reg.store, &reg.admin, "0000").await.unwrap();
        assert!(reg.admin.is_unlocked());

        lock_admin(&reg.admin);
        assert!(!reg.admin.is_unlocked());
    }
}
