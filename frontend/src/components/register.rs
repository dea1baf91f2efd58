use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::common::{Flash, Notice, preview_url, selected_file};
use crate::web::http::Attachment;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use gogreen_shared::protocol::RegisterRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();

    let (full_name, set_full_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (phone, set_phone) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let avatar = RwSignal::new_local(Option::<web_sys::File>::None);
    let (avatar_preview, set_avatar_preview) = signal(Option::<String>::None);
    let (is_submitting, set_is_submitting) = signal(false);
    let (flash, set_flash) = signal(Option::<Flash>::None);

    let on_avatar = move |ev: web_sys::Event| {
        let file = selected_file(&ev);
        set_avatar_preview.set(file.as_ref().and_then(preview_url));
        avatar.set(file);
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_flash.set(None);
        set_is_submitting.set(true);

        let request = RegisterRequest {
            full_name: full_name.get_untracked().trim().to_string(),
            email: email.get_untracked().trim().to_string(),
            phone: phone.get_untracked().trim().to_string(),
            password: password.get_untracked(),
        };
        let attachment = avatar
            .get_untracked()
            .map(|file| Attachment { field: "avatar", file });

        let api = api.clone();
        spawn_local(async move {
            match api.call_with(&request, attachment).await {
                Ok(res) => {
                    let pending = res
                        .email
                        .filter(|e| !e.is_empty())
                        .unwrap_or(request.email);
                    auth.set_pending_email(pending);
                    router.navigate_to(AppRoute::VerifyOtp);
                }
                Err(e) => set_flash.set(Some(e.into())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-[80vh] py-10">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body gap-4" on:submit=on_submit>
                        <h1 class="text-3xl font-bold text-center text-primary">"Create Account"</h1>
                        <Notice flash=flash />

                        <div class="flex justify-center">
                            <label class="cursor-pointer">
                                <div class="w-24 h-24 rounded-full bg-primary/10 flex items-center justify-center overflow-hidden border-2 border-primary">
                                    {move || match avatar_preview.get() {
                                        Some(src) => view! {
                                            <img src=src alt="Preview" class="w-full h-full object-cover" />
                                        }
                                        .into_any(),
                                        None => view! {
                                            <span class="text-primary text-sm">"Upload Photo"</span>
                                        }
                                        .into_any(),
                                    }}
                                </div>
                                <input type="file" accept="image/*" class="hidden" on:change=on_avatar />
                            </label>
                        </div>

                        <input
                            type="text"
                            placeholder="Full Name"
                            class="input input-bordered w-full"
                            required
                            prop:value=full_name
                            on:input=move |ev| set_full_name.set(event_target_value(&ev))
                        />
                        <input
                            type="email"
                            placeholder="Email Address"
                            class="input input-bordered w-full"
                            required
                            prop:value=email
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                        />
                        <input
                            type="tel"
                            placeholder="Phone Number"
                            class="input input-bordered w-full"
                            required
                            prop:value=phone
                            on:input=move |ev| set_phone.set(event_target_value(&ev))
                        />
                        <input
                            type="password"
                            placeholder="Password"
                            class="input input-bordered w-full"
                            required
                            prop:value=password
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                        />

                        <button type="submit" class="btn btn-primary w-full" disabled=is_submitting>
                            {move || if is_submitting.get() { "Sending OTP..." } else { "Register" }}
                        </button>

                        <p class="text-sm text-center text-base-content/70">
                            "Already have an account? "
                            <Link to=AppRoute::Login class="link link-primary font-medium">
                                "Login"
                            </Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
