use crate::api::use_api;
use crate::components::common::Loading;
use crate::components::icons::{Award, MapPin};
use crate::sync::RequestGuard;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use gogreen_shared::Order;
use gogreen_shared::date::format_date;
use gogreen_shared::format::number;
use gogreen_shared::protocol::TrackQuery;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Load state of a public, token-addressed order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TrackedOrder {
    Loading,
    Found(Box<Order>),
    Missing(Option<String>),
}

/// Fetches the order behind a tracking token; shared with the certificate page.
pub(crate) fn use_tracked_order(token: String) -> ReadSignal<TrackedOrder> {
    let api = use_api();
    let (state, set_state) = signal(TrackedOrder::Loading);

    let guard = RequestGuard::new();
    on_cleanup({
        let guard = guard.clone();
        move || guard.cancel()
    });

    if token.is_empty() {
        set_state.set(TrackedOrder::Missing(None));
        return state;
    }

    let ticket = guard.begin();
    spawn_local(async move {
        let result = api.call(&TrackQuery { token }).await;
        ticket.apply(result, |result| {
            set_state.set(match result {
                Ok(res) => match res.order {
                    Some(order) => TrackedOrder::Found(Box::new(order)),
                    None => TrackedOrder::Missing(None),
                },
                Err(e) => TrackedOrder::Missing(Some(e.to_string())),
            });
        });
    });

    state
}

pub(crate) fn unavailable(message: String) -> impl IntoView {
    view! {
        <div class="min-h-[60vh] flex items-center justify-center px-4">
            <div class="alert alert-error max-w-lg w-full">
                <span>{message}</span>
            </div>
        </div>
    }
}

fn tracking_card(order: &Order) -> impl IntoView {
    let approval = &order.approval_details;
    let requested = &order.user_order_details;

    let species = requested
        .tree_species
        .clone()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Native Species".to_string());
    let location = approval
        .planted_location
        .clone()
        .or_else(|| requested.planting_location.clone())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| "Plantation Site".to_string());
    let planted = format_date(
        approval
            .plantation_date
            .as_deref()
            .or(order.approved_at.as_deref()),
    );
    let note = approval
        .plantation_update
        .clone()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Plantation update will appear after admin approval.".to_string());
    let map_url = order.map_link().map(str::to_string);

    view! {
        <div class="max-w-xl mx-auto card bg-base-100 shadow-xl overflow-hidden">
            <figure class="relative h-64">
                <img src=order.hero_image().to_string() alt="Native Species" class="w-full h-full object-cover" />
                <div class="absolute inset-0 bg-gradient-to-t from-black/70 to-black/10"></div>
                <div class="absolute left-6 bottom-6 text-white">
                    <p class="text-4xl font-semibold tracking-tight">{species}</p>
                    <p class="text-sm mt-1 opacity-90 flex items-center gap-1">
                        <MapPin attr:class="h-4 w-4" />
                        {location}
                    </p>
                </div>
            </figure>
            <div class="card-body">
                <div class="grid grid-cols-2 gap-3 mb-2">
                    <div class="bg-primary/5 rounded-box p-4">
                        <p class="text-xs font-semibold uppercase tracking-wide text-primary">"Planted"</p>
                        <p class="text-xl font-semibold">{planted}</p>
                    </div>
                    <div class="bg-primary/5 rounded-box p-4">
                        <p class="text-xs font-semibold uppercase tracking-wide text-primary">"Offset"</p>
                        <p class="text-xl font-semibold">
                            {format!("{} kg/yr", number(order.impact.carbon_offset_kg_per_year))}
                        </p>
                    </div>
                </div>

                <div class="space-y-2 text-sm mb-4">
                    <p><span class="font-semibold">"Order #: "</span>{order.id}</p>
                    <p><span class="font-semibold">"Status: "</span>{order.display_approval_status()}</p>
                    <p><span class="font-semibold">"Trees: "</span>{order.trees_planted()}</p>
                    <p><span class="font-semibold">"Impact Note: "</span>{note}</p>
                </div>

                <div class="card-actions justify-between items-center">
                    <Link to=AppRoute::Certificate(order.tracking_token.clone()) class="btn btn-outline btn-primary gap-2">
                        <Award attr:class="h-4 w-4" />
                        "View Certificate"
                    </Link>
                    {map_url.map(|href| view! {
                        <a href=href target="_blank" rel="noreferrer" class="btn btn-primary">
                            "Open Map"
                        </a>
                    })}
                </div>
            </div>
        </div>
    }
}

/// Public order status behind `/track/:token`.
#[component]
pub fn TrackingPage(token: String) -> impl IntoView {
    let state = use_tracked_order(token);

    view! {
        <div class="py-10 px-4">
            {move || match state.get() {
                TrackedOrder::Loading => view! { <Loading text="Loading tracking details..." /> }.into_any(),
                TrackedOrder::Found(order) => tracking_card(&order).into_any(),
                TrackedOrder::Missing(error) => {
                    unavailable(error.unwrap_or_else(|| "Tracking record not found.".to_string())).into_any()
                }
            }}
        </div>
    }
}
