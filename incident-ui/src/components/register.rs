use incident_core::org::RegisterOrg;
use leptos::*;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::browser;
use crate::route::{self, Route};

/// First-run organization setup. On success the whole app reloads so
/// every panel refetches under the new org.
#[component]
pub fn RegisterOrgView() -> impl IntoView {
    let name = create_rw_signal(String::new());
    let busy = create_rw_signal(false);
    let error = create_rw_signal(None::<String>);

    let submit = move || {
        let body = match RegisterOrg::new(&name.get_untracked()) {
            Ok(body) => body,
            Err(message) => {
                error.set(Some(message));
                return;
            }
        };
        busy.set(true);
        error.set(None);
        spawn_local(async move {
            match api::register_org(&body).await {
                Ok(()) => {
                    route::navigate(Route::Dashboard);
                    browser::reload();
                }
                Err(err) => {
                    log::error!("org registration failed: {err}");
                    error.set(Some(err.to_string()));
                    busy.set(false);
                }
            }
        });
    };

    view! {
      <div class="panel narrow">
        <h1>"Set Up Your Organization"</h1>
        <p class="meta">
          "Your account is not attached to an organization yet. Name one to get started."
        </p>
        <label class="field">
          <span>"Organization name"</span>
          <input
            type="text"
            placeholder="Acme SRE"
            prop:value=move || name.get()
            on:input=move |ev| name.set(event_target_value(&ev))
          />
        </label>
        {move || error.get().map(|message| view! { <p class="error">{message}</p> })}
        <button class="primary" disabled=move || busy.get() on:click=move |_| submit()>
          {move || if busy.get() { "Creating..." } else { "Create Organization" }}
        </button>
      </div>
    }
}
