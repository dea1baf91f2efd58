use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::common::{Flash, Notice};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use gogreen_shared::protocol::{ResendOtpRequest, VerifyOtpRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;

const RESENT_MESSAGE: &str = "OTP sent again.";

#[component]
pub fn VerifyOtpPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();

    // Handed over by registration; editable for users arriving directly.
    let (email, set_email) = signal(auth.pending_email().unwrap_or_default());
    let (otp, set_otp) = signal(String::new());
    let (verifying, set_verifying) = signal(false);
    let (resending, set_resending) = signal(false);
    let (flash, set_flash) = signal(Option::<Flash>::None);

    let on_verify = {
        let api = api.clone();
        move |_| {
            set_flash.set(None);
            set_verifying.set(true);
            let request = VerifyOtpRequest {
                email: email.get_untracked().trim().to_string(),
                otp: otp.get_untracked().trim().to_string(),
            };
            let api = api.clone();
            spawn_local(async move {
                match api.call(&request).await.map(|res| res.user) {
                    Ok(Some(user)) => match auth.on_login(user) {
                        Ok(()) => router.navigate_to(AppRoute::Dashboard),
                        Err(e) => set_flash.set(Some(Flash::error(e))),
                    },
                    Ok(None) => set_flash.set(Some(Flash::error("OTP verification failed"))),
                    Err(e) => set_flash.set(Some(e.into())),
                }
                set_verifying.set(false);
            });
        }
    };

    let on_resend = move |_| {
        set_flash.set(None);
        set_resending.set(true);
        let request = ResendOtpRequest {
            email: email.get_untracked().trim().to_string(),
        };
        let api = api.clone();
        spawn_local(async move {
            let flash = match api.call(&request).await {
                Ok(res) => Flash::success(
                    res.message
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| RESENT_MESSAGE.to_string()),
                ),
                Err(e) => e.into(),
            };
            set_flash.set(Some(flash));
            set_resending.set(false);
        });
    };

    view! {
        <div class="hero min-h-[80vh]">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <div class="card-body gap-4">
                        <h1 class="text-3xl font-bold text-center text-primary">"Verify Email"</h1>
                        <p class="text-sm text-center text-base-content/70">
                            "Enter the OTP sent to your email to complete registration."
                        </p>
                        <Notice flash=flash />

                        <input
                            type="email"
                            placeholder="Email address"
                            class="input input-bordered w-full"
                            prop:value=email
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                        />
                        <input
                            type="text"
                            inputmode="numeric"
                            placeholder="Enter OTP"
                            class="input input-bordered w-full tracking-widest"
                            prop:value=otp
                            on:input=move |ev| set_otp.set(event_target_value(&ev))
                        />

                        <button class="btn btn-primary w-full" disabled=verifying on:click=on_verify>
                            {move || if verifying.get() { "Verifying..." } else { "Verify OTP" }}
                        </button>
                        <button class="btn btn-outline btn-primary w-full" disabled=resending on:click=on_resend>
                            {move || if resending.get() { "Resending..." } else { "Resend OTP" }}
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}
