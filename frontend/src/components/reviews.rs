use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::common::{Flash, Loading, Notice, Stars};
use crate::sync::RequestGuard;
use gogreen_shared::date::format_review_date;
use gogreen_shared::format::{initials, number};
use gogreen_shared::protocol::{ReviewsQuery, SubmitReview};
use gogreen_shared::{Review, ReviewSummary};
use leptos::prelude::*;
use leptos::task::spawn_local;

const REVIEW_SAVED_MESSAGE: &str = "Thanks for sharing your experience.";

#[component]
fn ReviewTile(review: Review) -> impl IntoView {
    let name = if review.full_name.trim().is_empty() {
        "Go Green User".to_string()
    } else {
        review.full_name.clone()
    };
    let date = format_review_date(review.updated_at.as_deref().or(review.created_at.as_deref()));
    let text = if review.review_text.trim().is_empty() {
        "Shared a rating without written feedback.".to_string()
    } else {
        review.review_text.clone()
    };
    let rating = review.rating;

    view! {
        <article class="card bg-base-100 shadow-md border border-base-200">
            <div class="card-body p-5 gap-3">
                <div class="flex items-start gap-3">
                    {match review.avatar.filter(|a| !a.is_empty()) {
                        Some(src) => view! {
                            <img src=src alt=format!("{name} avatar") class="h-12 w-12 rounded-full object-cover ring-2 ring-primary/20" />
                        }
                        .into_any(),
                        None => view! {
                            <div class="avatar placeholder">
                                <div class="bg-primary text-primary-content h-12 w-12 rounded-full">
                                    <span class="font-semibold">{initials(&review.full_name)}</span>
                                </div>
                            </div>
                        }
                        .into_any(),
                    }}
                    <div class="min-w-0 flex-1">
                        <p class="truncate font-semibold">{name.clone()}</p>
                        <p class="text-xs uppercase tracking-widest text-base-content/60">{date}</p>
                    </div>
                </div>
                <div class="flex items-center gap-2">
                    <Stars rating=rating />
                    <span class="text-sm font-semibold text-base-content/70">{format!("{rating}/5")}</span>
                </div>
                <p class="leading-relaxed text-base-content/80">{text}</p>
            </div>
        </article>
    }
}

fn breakdown(summary: &ReviewSummary) -> impl IntoView + use<> {
    (1..=5u8)
        .rev()
        .map(|stars| {
            let percent = summary.percent_for(stars);
            let count = summary.count_for(stars);
            view! {
                <div class="flex items-center gap-3 text-sm">
                    <span class="w-8 font-semibold">{format!("{stars}★")}</span>
                    <progress class="progress progress-warning flex-1" value=percent.to_string() max="100"></progress>
                    <span class="w-10 text-right text-base-content/60">{count}</span>
                </div>
            }
        })
        .collect_view()
}

/// Public review wall with the aggregate summary.
#[component]
pub fn CommunityReviews() -> impl IntoView {
    let api = use_api();
    let (summary, set_summary) = signal(ReviewSummary::default());
    let (reviews, set_reviews) = signal(Vec::<Review>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(Option::<Flash>::None);

    let guard = RequestGuard::new();
    on_cleanup({
        let guard = guard.clone();
        move || guard.cancel()
    });

    let ticket = guard.begin();
    spawn_local(async move {
        let result = api.call(&ReviewsQuery::default()).await;
        ticket.apply(result, |result| {
            match result {
                Ok(res) => {
                    set_summary.set(res.summary);
                    set_reviews.set(res.reviews);
                }
                Err(e) => {
                    set_summary.set(ReviewSummary::default());
                    set_reviews.set(Vec::new());
                    set_error.set(Some(e.into()));
                }
            }
            set_loading.set(false);
        });
    });

    view! {
        <section class="max-w-6xl mx-auto px-6 pb-20 pt-8">
            <div class="rounded-[2rem] bg-base-100 p-8 lg:p-10 shadow-xl">
                <div class="mb-8 flex flex-col gap-6 md:flex-row md:items-end md:justify-between">
                    <div>
                        <h2 class="text-4xl md:text-5xl font-bold">"Community Reviews"</h2>
                        <p class="mt-3 max-w-2xl text-lg text-base-content/70">
                            "Public feedback from all users planting through Go Green."
                        </p>
                    </div>
                    <div class="stats shadow bg-base-200">
                        <div class="stat">
                            <div class="stat-title">"Average Rating"</div>
                            <div class="stat-value text-primary">
                                {move || format!("{:.1}", summary.with(|s| s.average_rating))}
                            </div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"Total Reviews"</div>
                            <div class="stat-value text-primary">
                                {move || number(f64::from(summary.with(|s| s.total_reviews)))}
                            </div>
                        </div>
                    </div>
                </div>

                <div class="mb-8 max-w-md space-y-1">
                    {move || summary.with(breakdown)}
                </div>

                {move || {
                    if loading.get() {
                        view! { <Loading text="Loading user reviews..." /> }.into_any()
                    } else if error.with(Option::is_some) {
                        view! { <Notice flash=error /> }.into_any()
                    } else if reviews.with(Vec::is_empty) {
                        view! {
                            <div class="alert">
                                "No public reviews yet. Be the first to share your experience."
                            </div>
                        }
                        .into_any()
                    } else {
                        view! {
                            <div class="grid gap-5 sm:grid-cols-2 xl:grid-cols-3">
                                <For
                                    each=move || reviews.get()
                                    key=|review| review.id
                                    children=|review| view! { <ReviewTile review=review /> }
                                />
                            </div>
                        }
                        .into_any()
                    }
                }}
            </div>
        </section>
    }
}

/// The signed-in user's own review, pre-filled when one exists.
#[component]
pub fn ReviewForm() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let email = auth.email();

    let (rating, set_rating) = signal(5u8);
    let (text, set_text) = signal(String::new());
    let (has_review, set_has_review) = signal(false);
    let (saving, set_saving) = signal(false);
    let (flash, set_flash) = signal(Option::<Flash>::None);

    let guard = RequestGuard::new();
    on_cleanup({
        let guard = guard.clone();
        move || guard.cancel()
    });

    let prefill = move |review: Option<Review>| match review {
        Some(review) => {
            set_rating.set(review.rating);
            set_text.set(review.review_text);
            set_has_review.set(true);
        }
        None => set_has_review.set(false),
    };

    Effect::new({
        let api = api.clone();
        let guard = guard.clone();
        move |_| {
            let email = email.get();
            if email.is_empty() {
                return;
            }
            let ticket = guard.begin();
            let api = api.clone();
            spawn_local(async move {
                let result = api.call(&ReviewsQuery { email: Some(email) }).await;
                ticket.apply(result, |result| match result {
                    Ok(res) => prefill(res.current_user_review),
                    Err(e) => set_flash.set(Some(e.into())),
                });
            });
        }
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(user) = auth.user().get_untracked() else {
            return;
        };
        let review = SubmitReview {
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            rating: rating.get_untracked(),
            review_text: text.get_untracked().trim().to_string(),
        };
        if let Err(e) = review.validate() {
            set_flash.set(Some(e.into()));
            return;
        }

        set_flash.set(None);
        set_saving.set(true);
        let api = api.clone();
        let ticket = guard.begin();
        spawn_local(async move {
            let saved = api.call(&review).await;
            let flash = match saved {
                Ok(res) => {
                    let message = res
                        .message
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| REVIEW_SAVED_MESSAGE.to_string());
                    // read back what the server stored
                    let reread = api
                        .call(&ReviewsQuery {
                            email: Some(review.email),
                        })
                        .await;
                    ticket.apply(reread, |reread| {
                        if let Ok(res) = reread {
                            prefill(res.current_user_review);
                        }
                    });
                    Flash::success(message)
                }
                Err(e) => e.into(),
            };
            set_flash.set(Some(flash));
            set_saving.set(false);
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <form class="card-body gap-4" on:submit=on_submit>
                <h2 class="card-title">
                    {move || if has_review.get() { "Update your review" } else { "Share your experience" }}
                </h2>
                <Notice flash=flash />

                <div class="rating rating-lg">
                    {(1..=5u8)
                        .map(|star| {
                            view! {
                                <input
                                    type="radio"
                                    name="review-rating"
                                    class="mask mask-star-2 bg-warning"
                                    aria-label=format!("{star} star")
                                    prop:checked=move || rating.get() == star
                                    on:change=move |_| set_rating.set(star)
                                />
                            }
                        })
                        .collect_view()}
                </div>

                <textarea
                    class="textarea textarea-bordered w-full min-h-28"
                    placeholder="Tell others about your plantation experience"
                    prop:value=text
                    on:input=move |ev| set_text.set(event_target_value(&ev))
                ></textarea>

                <button type="submit" class="btn btn-primary" disabled=saving>
                    {move || if saving.get() { "Saving..." } else { "Submit Review" }}
                </button>
            </form>
        </div>
    }
}
