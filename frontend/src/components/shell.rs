use crate::auth::use_auth;
use crate::components::common::Avatar;
use crate::components::icons::{Leaf, LogOut};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;

const NAV_LINK: &str = "btn btn-ghost btn-sm font-medium";
const NAV_ACTIVE: &str = "text-primary bg-primary/10";

#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let user = auth.user();
    let authenticated = auth.is_authenticated_signal();

    let on_logout = move |_| {
        auth.logout();
        router.navigate_to(AppRoute::Landing);
    };

    view! {
        <div class="navbar bg-base-100 shadow-sm sticky top-0 z-40 px-4 md:px-8">
            <div class="flex-1">
                <Link to=AppRoute::Landing class="flex items-center gap-2 text-primary">
                    <Leaf attr:class="h-7 w-7" />
                    <span class="text-lg md:text-xl font-bold tracking-wide">
                        "GREEN CAMPUS TRACKER"
                    </span>
                </Link>
            </div>

            <div class="flex-none gap-1 md:gap-2 items-center">
                <div class="hidden md:flex gap-1">
                    <Link to=AppRoute::Landing class=NAV_LINK active_class=NAV_ACTIVE>
                        "Home"
                    </Link>
                    <Link to=AppRoute::Impact class=NAV_LINK active_class=NAV_ACTIVE>
                        "Impact"
                    </Link>
                    <Show when=move || authenticated.get()>
                        <Link to=AppRoute::DonateTrees class=NAV_LINK active_class=NAV_ACTIVE>
                            "Donate Trees"
                        </Link>
                        <Link to=AppRoute::Dashboard class=NAV_LINK active_class=NAV_ACTIVE>
                            "Dashboard"
                        </Link>
                    </Show>
                </div>

                {move || match user.get() {
                    Some(user) => {
                        let name = user.display_name().to_string();
                        view! {
                            <div class="flex items-center gap-2">
                                <Link
                                    to=AppRoute::Profile
                                    class="btn btn-ghost btn-sm h-auto py-1 gap-2 normal-case"
                                >
                                    <Avatar
                                        name=name.clone()
                                        src=user.avatar.clone()
                                        class="w-8 h-8"
                                    />
                                    <span class="hidden lg:flex flex-col items-start leading-tight">
                                        <span class="text-sm font-semibold">{name}</span>
                                        <span class="text-xs text-base-content/60">
                                            "View or update"
                                        </span>
                                    </span>
                                </Link>
                                <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                                    <LogOut attr:class="h-4 w-4" />
                                    <span class="hidden sm:inline">"Logout"</span>
                                </button>
                            </div>
                        }
                        .into_any()
                    }
                    None => {
                        view! {
                            <div class="flex items-center gap-2">
                                <Link to=AppRoute::Login class="btn btn-ghost btn-sm">
                                    "Login"
                                </Link>
                                <Link to=AppRoute::Signup class="btn btn-primary btn-sm">
                                    "Get Started"
                                </Link>
                            </div>
                        }
                        .into_any()
                    }
                }}
            </div>
        </div>
    }
}

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer class="bg-base-100 border-t border-base-300 mt-20">
            <div class="max-w-7xl mx-auto px-6 py-16">
                <div class="grid md:grid-cols-3 gap-10">
                    <div>
                        <div class="flex items-center gap-2 mb-4 text-primary">
                            <Leaf attr:class="h-6 w-6" />
                            <span class="text-2xl font-bold">"GREEN CAMPUS TRACKER"</span>
                        </div>
                        <p class="text-base-content/70 leading-relaxed">
                            "Empowering individuals and organizations to offset their carbon footprint through transparent, trackable tree plantations."
                        </p>
                    </div>

                    <div>
                        <h3 class="font-semibold mb-4">"Platform"</h3>
                        <ul class="space-y-3 text-base-content/70">
                            <li><Link to=AppRoute::Impact class="link link-hover">"Impact Dashboard"</Link></li>
                            <li><Link to=AppRoute::DonateTrees class="link link-hover">"Plant a Tree"</Link></li>
                            <li><Link to=AppRoute::Dashboard class="link link-hover">"My Orders"</Link></li>
                        </ul>
                    </div>

                    <div>
                        <h3 class="font-semibold mb-4">"Account"</h3>
                        <ul class="space-y-3 text-base-content/70">
                            <li><Link to=AppRoute::Signup class="link link-hover">"Create Account"</Link></li>
                            <li><Link to=AppRoute::Login class="link link-hover">"Login"</Link></li>
                            <li><Link to=AppRoute::Profile class="link link-hover">"Profile & Support"</Link></li>
                        </ul>
                    </div>
                </div>

                <div class="border-t border-base-300 mt-12 pt-6 text-sm text-base-content/60">
                    <p>"© 2026 Green Campus Tracker Initiative. All rights reserved."</p>
                </div>
            </div>
        </footer>
    }
}
