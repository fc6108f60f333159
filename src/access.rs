//! Role-based capability checks shared by the console session and the service.
//!
//! | Resource      | View | Create / Edit        | Delete |
//! |---------------|------|----------------------|--------|
//! | Campus        | any  | ADMIN                | ADMIN  |
//! | Building/Room | any  | ADMIN, DATA_MANAGER  | ADMIN  |
//! | UserAccount   | ADMIN| ADMIN                | ADMIN  |

use crate::client::session::SessionState;
use crate::models::user::Role;

/// A kind of registry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Campus,
    Building,
    Room,
    UserAccount,
}

/// An operation on a registry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

impl Role {
    /// Whether this role may perform `action` on `resource`.
    pub fn permits(self, resource: Resource, action: Action) -> bool {
        match (resource, action) {
            (Resource::UserAccount, _) => self == Role::Admin,
            (_, Action::View) => true,
            (Resource::Campus, _) | (_, Action::Delete) => self == Role::Admin,
            (Resource::Building | Resource::Room, Action::Create | Action::Edit) => {
                matches!(self, Role::Admin | Role::DataManager)
            }
        }
    }

    /// Whether this role may create or edit `resource` records.
    pub fn can_edit(self, resource: Resource) -> bool {
        self.permits(resource, Action::Edit)
    }

    /// Whether this role may delete `resource` records.
    pub fn can_delete(self, resource: Resource) -> bool {
        self.permits(resource, Action::Delete)
    }
}

/// What a protected view should do for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// The session is still restoring or logging in: render neither the view nor a redirect.
    Pending,
    /// Nobody is signed in.
    RedirectToLogin,
    /// Signed in, but the role lacks the required capability.
    Forbidden,
    /// Render the view.
    Granted,
}

/// Decides access to a protected view.
///
/// `required` is the capability the view needs, or `None` for any signed-in user.
pub fn route_access(state: &SessionState, required: Option<(Resource, Action)>) -> RouteAccess {
    if state.is_loading() {
        return RouteAccess::Pending;
    }

    let Some(role) = state.role() else {
        return RouteAccess::RedirectToLogin;
    };

    match required {
        Some((resource, action)) if !role.permits(resource, action) => RouteAccess::Forbidden,
        _ => RouteAccess::Granted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOURCES: [Resource; 4] = [
        Resource::Campus,
        Resource::Building,
        Resource::Room,
        Resource::UserAccount,
    ];

    #[test]
    fn admin_can_do_everything() {
        for resource in RESOURCES {
            for action in [Action::View, Action::Create, Action::Edit, Action::Delete] {
                assert!(Role::Admin.permits(resource, action), "{:?} {:?}", resource, action);
            }
        }
    }

    #[test]
    fn data_manager_edits_buildings_and_rooms_only() {
        let role = Role::DataManager;
        assert!(role.can_edit(Resource::Building));
        assert!(role.can_edit(Resource::Room));
        assert!(!role.can_edit(Resource::Campus));
        assert!(!role.can_delete(Resource::Building));
        assert!(!role.can_delete(Resource::Room));
        assert!(role.permits(Resource::Campus, Action::View));
        assert!(!role.permits(Resource::UserAccount, Action::View));
    }

    #[test]
    fn viewer_is_read_only() {
        let role = Role::Viewer;
        for resource in [Resource::Campus, Resource::Building, Resource::Room] {
            assert!(role.permits(resource, Action::View));
            assert!(!role.can_edit(resource));
            assert!(!role.can_delete(resource));
        }
        assert!(!role.permits(Resource::UserAccount, Action::View));
    }
}
