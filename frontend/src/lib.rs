//! GoGreen web client.
//!
//! Services are shared through Leptos context:
//! - `web::route`: route table and guard
//! - `web::router`: History API router
//! - `auth`: session state, the only session writer
//! - `api`: typed REST client
//! - `components`: pages and widgets

pub mod api;
pub mod auth;
pub mod checkout;
pub mod config;
pub mod orders;
pub mod search;
pub mod sync;

mod components {
    pub mod certificate;
    pub mod common;
    pub mod dashboard;
    pub mod donate;
    pub mod icons;
    pub mod impact;
    pub mod landing;
    pub mod login;
    pub mod otp;
    pub mod profile;
    pub mod register;
    pub mod reviews;
    pub mod shell;
    pub mod support;
    pub mod tracking;
}

// Browser API wrappers
pub(crate) mod web {
    pub mod http;
    pub mod razorpay;
    pub mod route;
    pub mod router;
    pub mod storage;
    pub mod timer;
}

use crate::api::GoGreenApi;
use crate::auth::AuthContext;
use crate::components::certificate::CertificatePage;
use crate::components::dashboard::DashboardPage;
use crate::components::donate::DonatePage;
use crate::components::impact::ImpactPage;
use crate::components::landing::LandingPage;
use crate::components::login::LoginPage;
use crate::components::otp::VerifyOtpPage;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;
use crate::components::shell::{Footer, Navbar};
use crate::components::tracking::TrackingPage;
use crate::config::AppConfig;

use leptos::prelude::*;

use web::route::AppRoute;
use web::router::{Router, RouterOutlet, use_router};

/// Route matcher.
///
/// Maps each [`AppRoute`] to its page.
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Landing => view! { <LandingPage /> }.into_any(),
        AppRoute::Impact => view! { <ImpactPage /> }.into_any(),
        AppRoute::Signup => view! { <RegisterPage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::VerifyOtp => view! { <VerifyOtpPage /> }.into_any(),
        AppRoute::DonateTrees => view! { <DonatePage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::Track(token) => view! { <TrackingPage token=token /> }.into_any(),
        AppRoute::Certificate(token) => view! { <CertificatePage token=token /> }.into_any(),
        // resolve() redirects unknown paths before they get here
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-[60vh]">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

/// Navbar and footer around the outlet, hidden on print-style routes.
#[component]
fn Shell() -> impl IntoView {
    let router = use_router();
    let chrome = Memo::new(move |_| router.current_route().with(AppRoute::shows_chrome));

    view! {
        <div class="min-h-screen flex flex-col bg-base-200 font-sans">
            <Show when=move || chrome.get()>
                <Navbar />
            </Show>
            <main class="flex-1">
                <RouterOutlet matcher=route_matcher />
            </main>
            <Show when=move || chrome.get()>
                <Footer />
            </Show>
        </div>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. Session, restored from LocalStorage
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. API client
    provide_context(GoGreenApi::new(AppConfig::from_env().api));

    // 3. Router, guarded by the auth flag
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        <Router is_authenticated=is_authenticated>
            <Shell />
        </Router>
    }
}
