use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::common::{Flash, Notice};
use crate::components::icons::ShieldCheck;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use gogreen_shared::protocol::LoginRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (flash, set_flash) = signal(Option::<Flash>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let request = LoginRequest {
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
        };
        if request.email.is_empty() || request.password.is_empty() {
            set_flash.set(Some(Flash::error("Please fill in all fields")));
            return;
        }

        set_is_submitting.set(true);
        set_flash.set(None);

        let api = api.clone();
        spawn_local(async move {
            let result = api.call(&request).await;
            match result.map(|res| res.user) {
                Ok(Some(user)) => match auth.on_login(user) {
                    Ok(()) => router.navigate_to(AppRoute::auth_success_redirect()),
                    Err(e) => set_flash.set(Some(Flash::error(e))),
                },
                Ok(None) => set_flash.set(Some(Flash::error("Login failed"))),
                Err(e) => set_flash.set(Some(e.into())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-[80vh]">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="flex flex-col items-center gap-2 mb-2 text-center">
                    <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                        <ShieldCheck attr:class="h-8 w-8" />
                    </div>
                    <h1 class="text-3xl font-bold text-primary">"Login"</h1>
                    <p class="text-base-content/70">"Welcome back. Track your trees and impact."</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body gap-4" on:submit=on_submit>
                        <Notice flash=flash />

                        <label class="form-control w-full">
                            <input
                                type="email"
                                placeholder="Email Address"
                                class="input input-bordered w-full"
                                required
                                prop:value=email
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                            />
                        </label>
                        <label class="form-control w-full">
                            <input
                                type="password"
                                placeholder="Password"
                                class="input input-bordered w-full"
                                required
                                prop:value=password
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                            />
                        </label>

                        <button type="submit" class="btn btn-primary w-full" disabled=is_submitting>
                            <Show when=move || is_submitting.get()>
                                <span class="loading loading-spinner"></span>
                            </Show>
                            {move || if is_submitting.get() { "Logging in..." } else { "Login" }}
                        </button>

                        <p class="text-sm text-center text-base-content/70">
                            "New here? "
                            <Link to=AppRoute::Signup class="link link-primary font-medium">
                                "Create account"
                            </Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
