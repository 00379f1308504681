//! Auth Page
//!
//! Sign-in screen. Signed-in visitors are bounced back to the
//! calendar; everyone else gets the provider sign-in button.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::state::GlobalState;

/// Sign-in page
#[component]
pub fn AuthPage() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let query = use_query_map();

    let denied = move || query.with(|q| q.get("error").cloned());

    let on_sign_in = move |_| {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(&api::login_url());
        }
    };

    view! {
        {move || {
            // Already signed in: go to the calendar
            if state.user.get().is_some() {
                view! { <Redirect path="/" /> }.into_view()
            } else {
                view! {
                    <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
                        <div class="text-6xl mb-4">"📈"</div>
                        <h1 class="text-3xl font-bold mb-2">"Paceboard"</h1>
                        <p class="text-gray-400 mb-8">
                            "Log sales and delivery entries and track your monthly pace."
                        </p>

                        {move || denied().map(|_| view! {
                            <p class="text-red-400 mb-4">
                                "Sign-in was cancelled or denied. Try again."
                            </p>
                        })}

                        <button
                            on:click=on_sign_in
                            class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg
                                   font-medium transition-colors flex items-center space-x-2"
                        >
                            <span>"𝕏"</span>
                            <span>"Sign in with X"</span>
                        </button>
                    </div>
                }.into_view()
            }
        }}
    }
}
