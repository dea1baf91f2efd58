//! History API router.
//!
//! All `window.history` access lives here. Every navigation, initial load,
//! popstate and auth change goes through [`resolve`] before a page renders.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, Resolution, redirect_on_auth_change, resolve};

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// Page origin, e.g. `https://gogreen.example`. Used for share links.
pub fn current_origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// Used for redirects, so Back skips the rejected path.
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn scroll_to_top() {
    if let Some(window) = web_sys::window() {
        window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}

/// Router service.
///
/// The current route is a signal; the auth flag is injected so this module
/// never depends on `auth`.
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    is_authenticated: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>) -> Self {
        // the first render is guarded too
        let requested = AppRoute::from_path(&current_path());
        let initial = match resolve(requested, is_authenticated.get_untracked()) {
            Resolution::Render(route) => route,
            Resolution::Redirect(route) => {
                log::info!("[Router] Initial redirect to {route}");
                replace_history_state(&route.to_path());
                route
            }
        };
        let (current_route, set_route) = signal(initial);

        Self {
            current_route,
            set_route,
            is_authenticated,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// Guarded navigation: resolve, push history, render, scroll to top.
    pub fn navigate_to(&self, target_route: AppRoute) {
        let is_auth = self.is_authenticated.get_untracked();

        let route = match resolve(target_route.clone(), is_auth) {
            Resolution::Render(route) => route,
            Resolution::Redirect(route) => {
                log::info!("[Router] {target_route} redirected to {route}");
                route
            }
        };

        push_history_state(&route.to_path());
        self.set_route.set(route);
        scroll_to_top();
    }

    /// Back/forward buttons.
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target_route = AppRoute::from_path(&current_path());

            match resolve(target_route, is_authenticated.get_untracked()) {
                Resolution::Render(route) => set_route.set(route),
                Resolution::Redirect(route) => {
                    replace_history_state(&route.to_path());
                    set_route.set(route);
                }
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // lives as long as the page
        closure.forget();
    }

    /// Re-checks the current route whenever the auth flag flips.
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;

        Effect::new(move |_| {
            let is_auth = is_authenticated.get();
            let route = current_route.get_untracked();

            if let Some(redirect) = redirect_on_auth_change(&route, is_auth) {
                log::info!(
                    "[Router] Auth state changed (authenticated: {is_auth}), redirecting to {redirect}"
                );
                push_history_state(&redirect.to_path());
                set_route.set(redirect);
            }
        });
    }
}

fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// Components
// ============================================================================

#[component]
pub fn Router(
    is_authenticated: Signal<bool>,
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated);

    children()
}

/// Renders the page for the current route.
#[component]
pub fn RouterOutlet(
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// In-app anchor: keeps a real `href` but navigates through the router.
#[component]
pub fn Link(
    to: AppRoute,
    #[prop(into, optional)] class: String,
    /// Extra classes while `to` is the current route.
    #[prop(into, optional)]
    active_class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let href = to.to_path();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate_to(target.clone());
    };

    let class = move || {
        if !active_class.is_empty() && router.current_route().get() == to {
            format!("{class} {active_class}")
        } else {
            class.clone()
        }
    };

    view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    }
}
