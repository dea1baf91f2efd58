use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::common::{Flash, Notice, preview_url, selected_file};
use crate::components::reviews::ReviewForm;
use crate::components::support::SupportCard;
use crate::sync::RequestGuard;
use crate::web::http::Attachment;
use gogreen_shared::SessionUser;
use gogreen_shared::protocol::{ProfileQuery, ProfileUpdate};
use leptos::prelude::*;
use leptos::task::spawn_local;

const PROFILE_SAVED_MESSAGE: &str = "Profile updated successfully";

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let email = auth.email();
    let user = auth.user();

    let (full_name, set_full_name) = signal(String::new());
    let (phone, set_phone) = signal(String::new());
    let avatar = RwSignal::new_local(Option::<web_sys::File>::None);
    let (avatar_preview, set_avatar_preview) = signal(String::new());
    let (loading, set_loading) = signal(false);
    let (saving, set_saving) = signal(false);
    let (flash, set_flash) = signal(Option::<Flash>::None);

    let guard = RequestGuard::new();
    on_cleanup({
        let guard = guard.clone();
        move || guard.cancel()
    });

    // Form follows the session record; a pending avatar pick is dropped.
    Effect::new(move |_| {
        if let Some(current) = user.get() {
            set_full_name.set(current.full_name.clone());
            set_phone.set(current.phone.clone());
            set_avatar_preview.set(current.avatar_url());
            avatar.set(None);
        }
    });

    let apply_user = move |fresh: Option<SessionUser>| -> Result<(), Flash> {
        match fresh {
            Some(fresh) => auth.on_profile_updated(fresh).map_err(Flash::error),
            None => Ok(()),
        }
    };

    // Pull the latest record whenever the session email changes.
    Effect::new({
        let api = api.clone();
        let guard = guard.clone();
        move |_| {
            let email = email.get();
            if email.is_empty() {
                return;
            }
            let ticket = guard.begin();
            set_loading.set(true);
            set_flash.set(None);
            let api = api.clone();
            spawn_local(async move {
                let result = api.call(&ProfileQuery { email }).await;
                ticket.apply(result, |result| {
                    let outcome = result
                        .map_err(Flash::from)
                        .and_then(|res| apply_user(res.user));
                    if let Err(flash) = outcome {
                        set_flash.set(Some(flash));
                    }
                    set_loading.set(false);
                });
            });
        }
    });

    let on_avatar = move |ev: web_sys::Event| {
        if let Some(file) = selected_file(&ev) {
            if let Some(url) = preview_url(&file) {
                set_avatar_preview.set(url);
            }
            avatar.set(Some(file));
        }
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_flash.set(None);
        set_saving.set(true);

        let update = ProfileUpdate {
            email: email.get_untracked(),
            full_name: full_name.get_untracked().trim().to_string(),
            phone: phone.get_untracked().trim().to_string(),
        };
        let attachment = avatar
            .get_untracked()
            .map(|file| Attachment { field: "avatar", file });

        let api = api.clone();
        let ticket = guard.begin();
        spawn_local(async move {
            let result = api.call_with(&update, attachment).await;
            let flash = match result {
                Ok(res) => {
                    let message = res
                        .message
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| PROFILE_SAVED_MESSAGE.to_string());
                    match apply_user(res.user) {
                        Ok(()) => Flash::success(message),
                        Err(flash) => flash,
                    }
                }
                Err(e) => e.into(),
            };
            if ticket.is_current() {
                set_flash.set(Some(flash));
                set_loading.set(false);
            }
            set_saving.set(false);
        });
    };

    view! {
        <div class="max-w-5xl mx-auto px-4 py-10 grid gap-8 lg:grid-cols-2">
            <div class="card bg-base-100 shadow-xl lg:row-span-2">
                <form class="card-body gap-4" on:submit=on_submit>
                    <h1 class="text-3xl font-bold text-center text-primary">"My Profile"</h1>

                    <Show when=move || loading.get()>
                        <div class="alert text-sm py-2">"Loading latest profile..."</div>
                    </Show>
                    <Notice flash=flash />

                    <div class="flex flex-col items-center gap-2">
                        <label class="cursor-pointer">
                            <div class="w-24 h-24 rounded-full overflow-hidden border-2 border-primary">
                                <img src=avatar_preview alt="Profile avatar" class="w-full h-full object-cover" />
                            </div>
                            <input type="file" accept="image/*" class="hidden" on:change=on_avatar />
                        </label>
                        <p class="text-xs text-base-content/60">"Click image to change avatar"</p>
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
                        class="input input-bordered w-full bg-base-200 cursor-not-allowed"
                        readonly
                        prop:value=email
                    />
                    <input
                        type="tel"
                        placeholder="Phone Number"
                        class="input input-bordered w-full"
                        required
                        prop:value=phone
                        on:input=move |ev| set_phone.set(event_target_value(&ev))
                    />

                    <button type="submit" class="btn btn-primary w-full" disabled=saving>
                        {move || if saving.get() { "Saving..." } else { "Update Profile" }}
                    </button>
                </form>
            </div>

            <ReviewForm />
            <SupportCard />
        </div>
    }
}
