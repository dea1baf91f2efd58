use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::common::{Flash, Loading, Notice};
use crate::components::icons::{Award, BarChart, MapPin, Pencil, RefreshCw, Trash, TreePine, Wallet};
use crate::orders::{DeleteOutcome, OrderBook, OrderEditForm};
use crate::sync::{RequestGuard, Ticket};
use crate::web::route::AppRoute;
use crate::web::router::{Link, current_origin};
use gogreen_shared::date::{format_date, format_date_time};
use gogreen_shared::format::{number, paise_to_rupees, qr_code_url};
use gogreen_shared::{ApiResult, Order, OrderList, OrderTotals};
use leptos::prelude::*;
use leptos::task::spawn_local;

const DASHBOARD_QR_SIZE: u32 = 130;

/// Non-empty `primary`, else `fallback`.
fn prefer(primary: Option<&str>, fallback: &str) -> String {
    primary
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(fallback)
        .to_string()
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn payment_badge(status: &str) -> &'static str {
    match status {
        "paid" => "badge badge-success",
        "failed" => "badge badge-error",
        _ => "badge badge-warning",
    }
}

fn approval_badge(status: &str) -> &'static str {
    match status {
        "approved" => "badge badge-success",
        "rejected" => "badge badge-error",
        _ => "badge badge-warning",
    }
}

fn edit_input(
    form: RwSignal<OrderEditForm>,
    kind: &'static str,
    placeholder: &'static str,
    get: impl Fn(&OrderEditForm) -> String + Send + Sync + 'static,
    set: impl Fn(&mut OrderEditForm, String) + Send + Sync + 'static,
) -> impl IntoView {
    view! {
        <input
            type=kind
            placeholder=placeholder
            class="input input-bordered input-sm w-full"
            prop:value=move || form.with(&get)
            on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
        />
    }
}

fn detail(label: &'static str, value: String) -> impl IntoView {
    view! {
        <p>
            <span class="font-semibold">{label}": "</span>
            {value}
        </p>
    }
}

/// Approval block: verified plantation details once approved, a status note otherwise.
fn approval_section(order: &Order) -> AnyView {
    let approval = &order.approval_details;
    match order.approval_status.as_str() {
        "approved" => {
            let proofs: Vec<(String, &'static str)> = [
                (approval.proof_image_1_url.clone(), "Proof 1"),
                (approval.proof_image_2_url.clone(), "Proof 2"),
            ]
            .into_iter()
            .filter_map(|(url, alt)| url.filter(|u| !u.is_empty()).map(|u| (u, alt)))
            .collect();

            view! {
                <div class="space-y-2 text-sm">
                    {detail(
                        "Approved At",
                        format_date_time(approval.approved_at.as_deref().or(order.approved_at.as_deref())),
                    )}
                    {detail("Planted Location", or_dash(approval.planted_location.as_deref().unwrap_or_default()))}
                    {detail("Plantation Date", format_date(approval.plantation_date.as_deref()))}
                    {detail(
                        "Trees Planted",
                        approval.trees_planted_count.map(|n| n.to_string()).unwrap_or_else(|| "-".into()),
                    )}
                    {detail("Thank You Note", or_dash(approval.thank_you_note.as_deref().unwrap_or_default()))}
                    {detail("Update", or_dash(approval.plantation_update.as_deref().unwrap_or_default()))}
                    {approval.planted_map_url.clone().filter(|u| !u.is_empty()).map(|href| view! {
                        <a href=href target="_blank" rel="noreferrer" class="link link-primary font-semibold">
                            "Open Verified Plantation Location"
                        </a>
                    })}
                    {(!proofs.is_empty()).then(|| view! {
                        <div class="pt-2">
                            <p class="font-semibold mb-2">"Proof Images"</p>
                            <div class="flex gap-2">
                                {proofs
                                    .into_iter()
                                    .map(|(src, alt)| {
                                        let href = src.clone();
                                        view! {
                                            <a href=href target="_blank" rel="noreferrer">
                                                <img src=src alt=alt class="w-20 h-20 rounded-lg object-cover border border-base-300" />
                                            </a>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        </div>
                    })}
                </div>
            }
            .into_any()
        }
        "rejected" => view! {
            <p class="text-sm text-base-content/70">
                "Admin has marked this order as rejected. You can edit and submit details again."
            </p>
        }
        .into_any(),
        _ => view! {
            <p class="text-sm text-base-content/70">
                "Pending admin approval. Plantation proof and verified details will appear here."
            </p>
        }
        .into_any(),
    }
}

#[component]
fn OrderCard(
    order: Order,
    editing: RwSignal<Option<u64>>,
    form: RwSignal<OrderEditForm>,
    #[prop(into)] saving: Signal<bool>,
    #[prop(into)] deleting: Signal<Option<u64>>,
    on_save: Callback<u64>,
    on_delete: Callback<u64>,
) -> impl IntoView {
    let id = order.id;
    let user_info = &order.user_order_details;
    let approval = &order.approval_details;

    let species = prefer(Some(order.tree_species.as_str()), "Native Species");
    let location = prefer(
        approval.planted_location.as_deref(),
        &prefer(user_info.planting_location.as_deref(), &order.planting_location),
    );
    let planted = format_date(
        approval
            .plantation_date
            .as_deref()
            .or(order.approved_at.as_deref()),
    );
    let tracking_url = order.tracking_link(&current_origin());
    let qr = qr_code_url(&tracking_url, DASHBOARD_QR_SIZE);
    let amount = paise_to_rupees(user_info.amount_paise.unwrap_or(order.amount_paise));
    let status = if order.approval_status.is_empty() {
        "pending".to_string()
    } else {
        order.approval_status.clone()
    };

    let start_edit = {
        let seed = OrderEditForm::from_order(&order);
        move |_| {
            form.set(seed.clone());
            editing.set(Some(id));
        }
    };

    view! {
        <div class="card bg-base-100 shadow-xl overflow-hidden">
            <figure class="relative h-48">
                <img src=order.hero_image().to_string() alt="Plantation" class="w-full h-full object-cover" />
                <div class="absolute top-3 left-3 flex gap-2">
                    <span class=payment_badge(&order.payment_status)>{order.payment_status.to_uppercase()}</span>
                    <span class=approval_badge(&status)>{status.to_uppercase()}</span>
                </div>
            </figure>
            <div class="card-body gap-4">
                <div>
                    <h2 class="card-title">{format!("Order #{id}")}</h2>
                    <p class="font-semibold text-primary">{species}</p>
                    <p class="text-sm text-base-content/70 flex items-center gap-1">
                        <MapPin attr:class="h-4 w-4" />
                        {location}
                    </p>
                </div>

                <div class="grid grid-cols-2 md:grid-cols-3 gap-3">
                    <div class="bg-primary/5 rounded-box p-4">
                        <p class="text-xs font-semibold uppercase tracking-wide text-primary">"Planted"</p>
                        <p class="text-lg font-semibold">{planted}</p>
                    </div>
                    <div class="bg-primary/5 rounded-box p-4">
                        <p class="text-xs font-semibold uppercase tracking-wide text-primary">"Offset"</p>
                        <p class="text-lg font-semibold">
                            {format!("{} kg/yr", number(order.impact.carbon_offset_kg_per_year))}
                        </p>
                    </div>
                    <div class="bg-primary/5 rounded-box p-4 col-span-2 md:col-span-1">
                        <p class="text-xs font-semibold uppercase tracking-wide text-primary">"Trees"</p>
                        <p class="text-lg font-semibold">{order.trees_planted()}</p>
                    </div>
                </div>

                <div class="grid lg:grid-cols-2 gap-4">
                    <div class="border border-base-300 rounded-box p-4 bg-base-200/50">
                        <h3 class="text-sm font-bold mb-3">"Your Order Details"</h3>
                        <div class="space-y-2 text-sm">
                            {detail("Name", prefer(user_info.full_name.as_deref(), &order.full_name))}
                            {detail(
                                "Requested Trees",
                                user_info.number_of_trees.unwrap_or(order.number_of_trees).to_string(),
                            )}
                            {detail("Objective", prefer(user_info.objective.as_deref(), &order.objective))}
                            {detail(
                                "Requested Location",
                                prefer(user_info.planting_location.as_deref(), &order.planting_location),
                            )}
                            {detail(
                                "Dedication",
                                or_dash(&prefer(user_info.dedication_name.as_deref(), &order.dedication_name)),
                            )}
                            {detail("Notes", or_dash(&prefer(user_info.notes.as_deref(), &order.notes)))}
                            {detail(
                                "Created",
                                format_date_time(user_info.created_at.as_deref().or(order.created_at.as_deref())),
                            )}
                            {detail("Amount", format!("INR {amount}"))}
                        </div>
                    </div>
                    <div class="border border-base-300 rounded-box p-4 bg-base-200/50">
                        <h3 class="text-sm font-bold mb-3">"Approval Section"</h3>
                        {approval_section(&order)}
                    </div>
                </div>

                <div class="flex flex-wrap items-center justify-between gap-3 border-t border-base-300 pt-4">
                    <div class="flex gap-2">
                        <button class="btn btn-primary btn-sm gap-1" on:click=start_edit>
                            <Pencil attr:class="h-4 w-4" />
                            "Edit"
                        </button>
                        <button
                            class="btn btn-error btn-outline btn-sm gap-1"
                            disabled=move || deleting.get() == Some(id)
                            on:click=move |_| on_delete.run(id)
                        >
                            <Trash attr:class="h-4 w-4" />
                            {move || if deleting.get() == Some(id) { "Deleting..." } else { "Delete" }}
                        </button>
                    </div>
                    <div class="flex items-center gap-3">
                        <Link to=AppRoute::Track(order.tracking_token.clone()) class="btn btn-ghost btn-sm">
                            "Track Order"
                        </Link>
                        <Link to=AppRoute::Certificate(order.tracking_token.clone()) class="btn btn-outline btn-primary btn-sm">
                            "View Certificate"
                        </Link>
                        <a href=tracking_url target="_blank" rel="noreferrer" title="Scan to track order">
                            <img src=qr alt="Track QR" class="w-16 h-16 rounded-lg border border-base-300" />
                        </a>
                    </div>
                </div>

                <Show when=move || editing.get() == Some(id)>
                    <div class="space-y-3 bg-base-200/50 border border-base-300 rounded-box p-4">
                        <p class="text-sm font-semibold">"Edit Your Order Details"</p>
                        <div class="grid md:grid-cols-2 gap-3">
                            {edit_input(form, "text", "Full Name", |f| f.full_name.clone(), |f, v| f.full_name = v)}
                            {edit_input(form, "tel", "Phone", |f| f.phone.clone(), |f, v| f.phone = v)}
                            {edit_input(
                                form,
                                "number",
                                "Number of Trees",
                                |f| f.number_of_trees.clone(),
                                |f, v| f.number_of_trees = v,
                            )}
                            {edit_input(form, "text", "Tree Species", |f| f.tree_species.clone(), |f, v| f.tree_species = v)}
                            {edit_input(
                                form,
                                "text",
                                "Planting Location",
                                |f| f.planting_location.clone(),
                                |f, v| f.planting_location = v,
                            )}
                            {edit_input(form, "text", "Objective", |f| f.objective.clone(), |f, v| f.objective = v)}
                            {edit_input(form, "text", "Latitude (optional)", |f| f.latitude.clone(), |f, v| f.latitude = v)}
                            {edit_input(form, "text", "Longitude (optional)", |f| f.longitude.clone(), |f, v| f.longitude = v)}
                            {edit_input(
                                form,
                                "text",
                                "Dedication Name",
                                |f| f.dedication_name.clone(),
                                |f, v| f.dedication_name = v,
                            )}
                        </div>
                        <textarea
                            rows="3"
                            placeholder="Notes"
                            class="textarea textarea-bordered w-full"
                            prop:value=move || form.with(|f| f.notes.clone())
                            on:input=move |ev| form.update(|f| f.notes = event_target_value(&ev))
                        ></textarea>
                        <div class="flex gap-2">
                            <button class="btn btn-primary btn-sm" disabled=saving on:click=move |_| on_save.run(id)>
                                {move || if saving.get() { "Saving..." } else { "Save" }}
                            </button>
                            <button class="btn btn-ghost btn-sm" on:click=move |_| editing.set(None)>
                                "Cancel"
                            </button>
                        </div>
                    </div>
                </Show>
            </div>
        </div>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let email = auth.email();
    let user = auth.user();

    let (list, set_list) = signal(OrderList::default());
    let (loading, set_loading) = signal(true);
    let (saving, set_saving) = signal(false);
    let (deleting, set_deleting) = signal(Option::<u64>::None);
    let (flash, set_flash) = signal(Option::<Flash>::None);
    // List read failures; kept apart so they never hide an edit's outcome.
    let (list_flash, set_list_flash) = signal(Option::<Flash>::None);
    let editing = RwSignal::new(Option::<u64>::None);
    let form = RwSignal::new(OrderEditForm::default());

    let guard = RequestGuard::new();
    on_cleanup({
        let guard = guard.clone();
        move || guard.cancel()
    });

    // Every list read ends here, so whichever ticket is current clears the spinner.
    let show_list = move |ticket: &Ticket, result: ApiResult<OrderList>| {
        ticket.apply(result, |result| {
            match result {
                Ok(fresh) => {
                    set_list.set(fresh);
                    set_list_flash.set(None);
                }
                Err(e) => set_list_flash.set(Some(e.into())),
            }
            set_loading.set(false);
        });
    };
    let settle = move |ticket: &Ticket| {
        ticket.apply((), |()| set_loading.set(false));
    };

    let refresh = Callback::new({
        let api = api.clone();
        let guard = guard.clone();
        move |_: ()| {
            let book = OrderBook::new(api.clone(), email.get_untracked());
            let ticket = guard.begin();
            set_loading.set(true);
            spawn_local(async move {
                let result = book.refresh().await;
                show_list(&ticket, result);
            });
        }
    });

    // Reload whenever the session email changes.
    Effect::new(move |_| {
        email.track();
        refresh.run(());
    });

    let on_save = Callback::new({
        let api = api.clone();
        let guard = guard.clone();
        move |id: u64| {
            let book = OrderBook::new(api.clone(), email.get_untracked());
            let edited = form.get_untracked();
            set_flash.set(None);
            set_saving.set(true);
            let ticket = guard.begin();
            spawn_local(async move {
                match book.save(id, &edited).await {
                    Ok(committed) => {
                        editing.set(None);
                        set_flash.set(Some(Flash::success(committed.message)));
                        show_list(&ticket, committed.list);
                    }
                    Err(e) => {
                        set_flash.set(Some(e.into()));
                        settle(&ticket);
                    }
                }
                set_saving.set(false);
            });
        }
    });

    let on_delete = Callback::new(move |id: u64| {
        let book = OrderBook::new(api.clone(), email.get_untracked());
        let guard = guard.clone();
        set_flash.set(None);
        set_deleting.set(Some(id));
        spawn_local(async move {
            let confirm = |question: &str| window().confirm_with_message(question).unwrap_or(false);
            let (outcome, ticket) = book.delete_guarded(id, &guard, confirm).await;
            match (outcome, ticket) {
                (Ok(DeleteOutcome::Deleted(committed)), Some(ticket)) => {
                    if editing.get_untracked() == Some(id) {
                        editing.set(None);
                    }
                    set_flash.set(Some(Flash::success(committed.message)));
                    show_list(&ticket, committed.list);
                }
                (Err(e), ticket) => {
                    set_flash.set(Some(e.into()));
                    if let Some(ticket) = ticket {
                        settle(&ticket);
                    }
                }
                _ => {}
            }
            set_deleting.set(None);
        });
    });

    let totals = Memo::new(move |_| list.with(|l| OrderTotals::from_orders(&l.orders)));

    let stat = |label: &'static str, value: Signal<String>, icon: AnyView| {
        view! {
            <div class="stat">
                <div class="stat-figure text-primary">{icon}</div>
                <div class="stat-title">{label}</div>
                <div class="stat-value text-primary text-3xl">{move || value.get()}</div>
            </div>
        }
    };

    view! {
        <div class="max-w-7xl mx-auto px-4 py-10 space-y-8">
            <div>
                <h1 class="text-4xl font-bold text-primary">"Dashboard"</h1>
                <p class="text-base-content/70 mt-2">
                    {move || {
                        let name = user
                            .get()
                            .map(|u| u.display_name().to_string())
                            .filter(|n| !n.is_empty())
                            .unwrap_or_else(|| "User".to_string());
                        format!("Welcome, {name}. Track your plantations, approvals, and impact certificates.")
                    }}
                </p>
            </div>

            <Notice flash=flash />
            <Notice flash=list_flash />

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                {stat(
                    "Total Orders",
                    Signal::derive(move || list.with(|l| l.summary.total_orders.to_string())),
                    view! { <BarChart attr:class="h-8 w-8" /> }.into_any(),
                )}
                {stat(
                    "Completed Orders",
                    Signal::derive(move || list.with(|l| l.summary.completed_orders.to_string())),
                    view! { <Award attr:class="h-8 w-8" /> }.into_any(),
                )}
                {stat(
                    "Pending Approval",
                    Signal::derive(move || list.with(|l| l.summary.pending_orders.to_string())),
                    view! { <RefreshCw attr:class="h-8 w-8" /> }.into_any(),
                )}
                {stat(
                    "Total Trees",
                    Signal::derive(move || totals.get().total_trees.to_string()),
                    view! { <TreePine attr:class="h-8 w-8" /> }.into_any(),
                )}
                {stat(
                    "Total Paid (INR)",
                    Signal::derive(move || totals.get().total_spent_inr()),
                    view! { <Wallet attr:class="h-8 w-8" /> }.into_any(),
                )}
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <div class="flex flex-wrap items-center justify-between gap-3">
                        <h2 class="card-title text-2xl">"Your Orders"</h2>
                        <div class="flex items-center gap-2">
                            <button
                                class="btn btn-ghost btn-circle"
                                disabled=loading
                                on:click=move |_| refresh.run(())
                            >
                                <RefreshCw attr:class=move || {
                                    if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" }
                                } />
                            </button>
                            <Link to=AppRoute::DonateTrees class="btn btn-primary">
                                "Donate More Trees"
                            </Link>
                        </div>
                    </div>

                    {move || {
                        if loading.get() && list.with(|l| l.orders.is_empty()) {
                            view! { <Loading text="Loading orders..." /> }.into_any()
                        } else if list.with(|l| l.orders.is_empty()) {
                            view! {
                                <div class="alert">"No orders yet. Start by donating trees."</div>
                            }
                            .into_any()
                        } else {
                            list.get()
                                .orders
                                .into_iter()
                                .map(|order| view! {
                                    <OrderCard
                                        order=order
                                        editing=editing
                                        form=form
                                        saving=saving
                                        deleting=deleting
                                        on_save=on_save
                                        on_delete=on_delete
                                    />
                                })
                                .collect_view()
                                .into_any()
                        }
                    }}
                </div>
            </div>
        </div>
    }
}
