// ============================================================================
// ROUTES - Route table + guard for the protected dashboard pages
// ============================================================================

use crate::stores::SessionStore;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Route {
    Login,
    Root,
    Dashboard,
    Bookings,
    Vaccines,
    Users,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Login,
        Route::Root,
        Route::Dashboard,
        Route::Bookings,
        Route::Vaccines,
        Route::Users,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Root => "/",
            Route::Dashboard => "/dashboard/default",
            Route::Bookings => "/dashboard/bookings",
            Route::Vaccines => "/dashboard/Vaccines",
            Route::Users => "/dashboard/users",
        }
    }

    /// Exact match, ignoring a trailing slash.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Route::ALL.into_iter().find(|route| route.path() == trimmed)
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

/// Moves the browser to another route.
pub trait Navigator {
    fn push(&self, route: Route);
    fn replace(&self, route: Route);
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GuardDecision {
    Allow,
    Redirect { to: Route, replace: bool },
}

/// Keeps anonymous users out of the dashboard.
#[derive(Clone)]
pub struct RouteGuard {
    session: SessionStore,
}

impl RouteGuard {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// Session is read on every call, never cached.
    pub fn check(&self, route: Route) -> GuardDecision {
        if !route.is_protected() || self.session.is_authenticated() {
            return GuardDecision::Allow;
        }
        log::info!("🔒 {} requires login, redirecting", route.path());
        GuardDecision::Redirect {
            to: Route::Login,
            replace: true,
        }
    }

    /// Applies the decision; returns whether the route may render.
    pub fn enforce(&self, route: Route, navigator: &dyn Navigator) -> bool {
        match self.check(route) {
            GuardDecision::Allow => true,
            GuardDecision::Redirect { to, replace } => {
                if replace {
                    navigator.replace(to);
                } else {
                    navigator.push(to);
                }
                false
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserNavigator;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::*;
    use wasm_bindgen::JsValue;

    pub const ROUTE_CHANGE_EVENT: &str = "routechange";

    /// History API navigator. Fires `routechange` on `window` after each move.
    #[derive(Clone, Copy, Default)]
    pub struct BrowserNavigator;

    impl BrowserNavigator {
        pub fn current_route() -> Option<Route> {
            let path = web_sys::window()?.location().pathname().ok()?;
            Route::from_path(&path)
        }

        fn go(route: Route, replace: bool) {
            let Some(window) = web_sys::window() else {
                log::error!("❌ No window available for navigation");
                return;
            };
            let history = match window.history() {
                Ok(history) => history,
                Err(e) => {
                    log::error!("❌ History API unavailable: {:?}", e);
                    return;
                }
            };
            let result = if replace {
                history.replace_state_with_url(&JsValue::NULL, "", Some(route.path()))
            } else {
                history.push_state_with_url(&JsValue::NULL, "", Some(route.path()))
            };
            if let Err(e) = result {
                log::error!("❌ Navigation to {} failed: {:?}", route.path(), e);
                return;
            }
            if let Ok(event) = web_sys::Event::new(ROUTE_CHANGE_EVENT) {
                let _ = window.dispatch_event(&event);
            }
        }
    }

    impl Navigator for BrowserNavigator {
        fn push(&self, route: Route) {
            Self::go(route, false);
        }

        fn replace(&self, route: Route) {
            Self::go(route, true);
        }
    }
}
