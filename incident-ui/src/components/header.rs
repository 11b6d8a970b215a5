use leptos::*;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::components::user_nav::UserNav;
use crate::route::{self, Route};

/// Top bar: brand block with the org name, plus the account menu. When
/// no org profile exists yet the bar offers the registration link.
#[component]
pub fn AppHeader() -> impl IntoView {
    let org_name = create_rw_signal(None::<String>);
    let needs_org = create_rw_signal(false);

    spawn_local(async move {
        match api::fetch_org_profile().await {
            Ok(profile) => org_name.set(Some(profile.name)),
            Err(err) => {
                if err.is_not_found() {
                    needs_org.set(true);
                } else {
                    log::warn!("org profile fetch failed: {err}");
                }
                org_name.set(Some("N/A".to_string()));
            }
        }
    });

    view! {
      <header class="header">
        <div class="brand" on:click=move |_| route::navigate(Route::Dashboard)>
          <span class="brand-mark">"IF"</span>
          <div>
            <b>"IncidentFlow"</b>
            <p class="meta">{move || org_name.get().unwrap_or_else(|| "...".to_string())}</p>
          </div>
        </div>
        <div class="row">
          <Show when=move || needs_org.get() fallback=|| ()>
            <a class="meta" href="#/register">"Set up organization"</a>
          </Show>
          <UserNav/>
        </div>
      </header>
    }
}
