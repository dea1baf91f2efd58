use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::common::{Flash, Notice};
use crate::components::icons::{Mail, MessageCircle};
use crate::sync::RequestGuard;
use gogreen_shared::SupportInfo;
use gogreen_shared::protocol::{SupportInfoQuery, SupportTicket};
use leptos::prelude::*;
use leptos::task::spawn_local;

const TICKET_SENT_MESSAGE: &str = "Support request sent. We will get back to you soon.";

#[component]
pub fn SupportCard() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();

    let (info, set_info) = signal(Option::<SupportInfo>::None);
    let (subject, set_subject) = signal(String::new());
    let (message, set_message) = signal(String::new());
    let (sending, set_sending) = signal(false);
    let (flash, set_flash) = signal(Option::<Flash>::None);

    let guard = RequestGuard::new();
    on_cleanup({
        let guard = guard.clone();
        move || guard.cancel()
    });

    {
        let api = api.clone();
        let ticket = guard.begin();
        spawn_local(async move {
            let result = api.call(&SupportInfoQuery).await;
            ticket.apply(result, |result| match result {
                Ok(found) => set_info.set(Some(found)),
                // contact details are optional; the form still works
                Err(e) => log::warn!("Support details unavailable: {e}"),
            });
        });
    }

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let (full_name, email, phone) = auth
            .user()
            .get_untracked()
            .map(|u| (u.full_name, u.email, u.phone))
            .unwrap_or_default();
        let ticket = SupportTicket {
            full_name,
            email,
            phone,
            subject: subject.get_untracked().trim().to_string(),
            message: message.get_untracked().trim().to_string(),
        };
        if let Err(e) = ticket.validate() {
            set_flash.set(Some(e.into()));
            return;
        }

        set_flash.set(None);
        set_sending.set(true);
        let api = api.clone();
        spawn_local(async move {
            let flash = match api.call(&ticket).await {
                Ok(res) => {
                    set_subject.set(String::new());
                    set_message.set(String::new());
                    Flash::success(
                        res.message
                            .filter(|m| !m.is_empty())
                            .unwrap_or_else(|| TICKET_SENT_MESSAGE.to_string()),
                    )
                }
                Err(e) => e.into(),
            };
            set_flash.set(Some(flash));
            set_sending.set(false);
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <form class="card-body gap-4" on:submit=on_submit>
                <h2 class="card-title">"Need help?"</h2>

                {move || {
                    info.get().map(|info| {
                        let email = (!info.support_email.is_empty()).then(|| {
                            view! {
                                <a href=format!("mailto:{}", info.support_email) class="btn btn-sm btn-outline gap-2">
                                    <Mail attr:class="h-4 w-4" />
                                    {info.support_email.clone()}
                                </a>
                            }
                        });
                        let whatsapp = info.whatsapp_link().map(|href| {
                            let label = if info.whatsapp_display.is_empty() {
                                info.whatsapp_number.clone()
                            } else {
                                info.whatsapp_display.clone()
                            };
                            view! {
                                <a href=href target="_blank" rel="noreferrer" class="btn btn-sm btn-outline gap-2">
                                    <MessageCircle attr:class="h-4 w-4" />
                                    {label}
                                </a>
                            }
                        });
                        view! {
                            <div class="flex flex-wrap gap-2">
                                {email}
                                {whatsapp}
                            </div>
                        }
                    })
                }}

                <Notice flash=flash />

                <input
                    type="text"
                    placeholder="Subject"
                    class="input input-bordered w-full"
                    prop:value=subject
                    on:input=move |ev| set_subject.set(event_target_value(&ev))
                />
                <textarea
                    class="textarea textarea-bordered w-full min-h-28"
                    placeholder="How can we help?"
                    prop:value=message
                    on:input=move |ev| set_message.set(event_target_value(&ev))
                ></textarea>

                <button type="submit" class="btn btn-secondary" disabled=sending>
                    {move || if sending.get() { "Sending..." } else { "Contact Support" }}
                </button>
            </form>
        </div>
    }
}
