use crate::components::common::Loading;
use crate::components::icons::{Leaf, Printer};
use crate::components::tracking::{TrackedOrder, unavailable, use_tracked_order};
use crate::web::router::current_origin;
use gogreen_shared::Order;
use gogreen_shared::date::format_date;
use gogreen_shared::format::{number, qr_code_url};
use leptos::prelude::*;

const CERTIFICATE_QR_SIZE: u32 = 180;

fn print_page() {
    if let Err(e) = window().print() {
        log::warn!("Print dialog unavailable: {e:?}");
    }
}

fn certificate(order: &Order) -> impl IntoView {
    let approval = &order.approval_details;
    let location = approval
        .planted_location
        .as_deref()
        .filter(|l| !l.is_empty())
        .unwrap_or(&order.planting_location);
    let location = if location.is_empty() { "-" } else { location }.to_string();
    let species = if order.tree_species.is_empty() {
        "-".to_string()
    } else {
        order.tree_species.clone()
    };
    let planted = format_date(
        approval
            .plantation_date
            .as_deref()
            .or(order.approved_at.as_deref()),
    );
    let statement = approval
        .thank_you_note
        .clone()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| {
            "Your contribution supports biodiversity restoration and carbon capture.".to_string()
        });
    let qr = qr_code_url(&order.tracking_link(&current_origin()), CERTIFICATE_QR_SIZE);

    view! {
        <div class="max-w-3xl mx-auto card bg-base-100 border border-primary/30 shadow-xl overflow-hidden">
            <div class="bg-primary text-primary-content px-8 py-6">
                <p class="text-sm uppercase tracking-widest opacity-90 flex items-center gap-2">
                    <Leaf attr:class="h-4 w-4" />
                    "Go Green"
                </p>
                <h1 class="text-3xl font-bold mt-2">"Tree Plantation Certificate"</h1>
                <p class="opacity-90 mt-2">{format!("Certificate ID: GREEN-{}", order.id)}</p>
            </div>
            <div class="p-8 space-y-6">
                <p class="text-lg">
                    "This certifies that "
                    <span class="font-bold text-primary">{order.full_name.clone()}</span>
                    " has contributed to plantation of "
                    <span class="font-bold text-primary">{order.trees_planted()}</span>
                    " trees through Go Green."
                </p>
                <div class="grid md:grid-cols-2 gap-4 text-sm">
                    <p><span class="font-semibold">"Plantation Location: "</span>{location}</p>
                    <p><span class="font-semibold">"Plantation Date: "</span>{planted}</p>
                    <p><span class="font-semibold">"Species: "</span>{species}</p>
                    <p>
                        <span class="font-semibold">"Annual Carbon Offset: "</span>
                        {format!("{} kg/year", number(order.impact.carbon_offset_kg_per_year))}
                    </p>
                    <p class="md:col-span-2">
                        <span class="font-semibold">"Impact Statement: "</span>
                        {statement}
                    </p>
                </div>
                <div class="flex flex-wrap items-center justify-between gap-4 pt-4 border-t border-base-300">
                    <button class="btn btn-primary gap-2 print:hidden" on:click=move |_| print_page()>
                        <Printer attr:class="h-4 w-4" />
                        "Print Certificate"
                    </button>
                    <div class="flex items-center gap-3">
                        <div class="text-right">
                            <p class="text-xs text-base-content/60 uppercase tracking-wide">"Scan QR"</p>
                            <p class="text-sm">"Track plantation status"</p>
                        </div>
                        <img src=qr alt="Tracking QR" class="w-20 h-20 rounded-lg border border-base-300" />
                    </div>
                </div>
            </div>
        </div>
    }
}

/// Printable certificate behind `/certificate/:token`; rendered without the shell chrome.
#[component]
pub fn CertificatePage(token: String) -> impl IntoView {
    let state = use_tracked_order(token);

    view! {
        <div class="min-h-screen bg-base-200 py-10 px-4">
            {move || match state.get() {
                TrackedOrder::Loading => view! { <Loading text="Preparing certificate..." /> }.into_any(),
                TrackedOrder::Found(order) => certificate(&order).into_any(),
                TrackedOrder::Missing(error) => {
                    unavailable(error.unwrap_or_else(|| "Certificate not available.".to_string())).into_any()
                }
            }}
        </div>
    }
}
