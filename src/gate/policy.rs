pub const LOGIN_PATH:     &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToLogin,
    RedirectToDashboard,
}

impl GateDecision {
    pub fn location(&self) -> Option<&'static str> {
        match self {
            GateDecision::Allow               => None,
            GateDecision::RedirectToLogin     => Some(LOGIN_PATH),
            GateDecision::RedirectToDashboard => Some(DASHBOARD_PATH),
        }
    }
}

/// Signed-out callers stay on public paths; signed-in callers skip the login page.
pub fn decide(has_identity: bool, is_public: bool, path: &str) -> GateDecision {
    match (has_identity, is_public) {
        (false, false) => GateDecision::RedirectToLogin,
        (false, true)  => GateDecision::Allow,
        (true, _) if path == LOGIN_PATH => GateDecision::RedirectToDashboard,
        (true, _)      => GateDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::paths::is_public;

    fn gate(has_identity: bool, path: &str) -> GateDecision {
        decide(has_identity, is_public(path), path)
    }

    #[test]
    fn signed_out_protected_goes_to_login() {
        for path in ["/", "/dashboard", "/phone", "/api/admin/users", "/anything/new"] {
            assert_eq!(gate(false, path), GateDecision::RedirectToLogin, "{path}");
        }
    }

    #[test]
    fn signed_out_public_passes() {
        for path in ["/login", "/auth/login", "/auth/callback"] {
            assert_eq!(gate(false, path), GateDecision::Allow, "{path}");
        }
    }

    #[test]
    fn signed_in_login_goes_to_dashboard() {
        assert_eq!(gate(true, "/login"), GateDecision::RedirectToDashboard);
        assert_eq!(gate(true, "/login").location(), Some("/dashboard"));
    }

    #[test]
    fn signed_in_elsewhere_passes() {
        for path in ["/", "/dashboard", "/auth/me", "/login/help", "/api/admin/users"] {
            assert_eq!(gate(true, path), GateDecision::Allow, "{path}");
        }
    }
}
