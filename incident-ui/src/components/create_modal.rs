use incident_core::actions::{create_failure_message, CreateIncident};
use incident_core::incident::Severity;
use incident_core::user::User;
use leptos::*;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::browser;
use crate::directory::use_directory;
use crate::session::use_session;

/// Declare-incident dialog. Assignment defaults to the reporter; picking
/// someone else sends `owner_id` and lets the backend enforce who may
/// assign work to others.
#[component]
pub fn CreateIncidentModal(
    open: RwSignal<bool>,
    #[prop(into)] on_created: Callback<()>,
) -> impl IntoView {
    let session = use_session();
    let directory = use_directory();

    let title = create_rw_signal(String::new());
    let description = create_rw_signal(String::new());
    let severity = create_rw_signal(Severity::default());
    let assignee = create_rw_signal(String::new());
    let submitting = create_rw_signal(false);

    // Fresh form every time the dialog opens.
    create_effect(move |_| {
        if open.get() {
            title.set(String::new());
            description.set(String::new());
            severity.set(Severity::default());
            assignee.set(session.user().map(|user| user.id).unwrap_or_default());
        }
    });

    let submit = move || {
        let Some(me) = session.user() else { return };
        let body = match CreateIncident::new(
            &title.get_untracked(),
            &description.get_untracked(),
            severity.get_untracked(),
            &assignee.get_untracked(),
            &me.id,
        ) {
            Ok(body) => body,
            Err(message) => {
                browser::notify(&message);
                return;
            }
        };
        submitting.set(true);
        spawn_local(async move {
            match api::create_incident(&body).await {
                Ok(()) => {
                    open.set(false);
                    on_created.call(());
                }
                Err(err) => {
                    log::error!("incident create failed: {err}");
                    browser::notify(create_failure_message(err.status()));
                }
            }
            submitting.set(false);
        });
    };

    view! {
      <Show when=move || open.get() fallback=|| ()>
        <div class="overlay" on:click=move |_| open.set(false)>
          <div class="modal" on:click=|ev| ev.stop_propagation()>
            <div class="modal-head">
              <h2>"Declare New Incident"</h2>
              <button class="ghost" on:click=move |_| open.set(false)>"Close"</button>
            </div>

            <label class="field">
              <span>"Title"</span>
              <input
                prop:value=move || title.get()
                on:input=move |ev| title.set(event_target_value(&ev))
                placeholder="What is happening?"
              />
            </label>
            <label class="field">
              <span>"Description"</span>
              <textarea
                prop:value=move || description.get()
                on:input=move |ev| description.set(event_target_value(&ev))
                placeholder="Impact, scope, first findings..."
              ></textarea>
            </label>
            <div class="row">
              <label class="field">
                <span>"Severity"</span>
                <select
                  prop:value=move || severity.get().code().to_string()
                  on:change=move |ev| {
                      if let Ok(parsed) = event_target_value(&ev).parse::<Severity>() {
                          severity.set(parsed);
                      }
                  }
                >
                  {Severity::ALL
                      .into_iter()
                      .map(|sev| {
                          view! {
                            <option value=sev.code()>
                              {format!("{} ({})", sev.code(), sev.label())}
                            </option>
                          }
                      })
                      .collect_view()}
                </select>
              </label>
              <label class="field">
                <span>"Assign To"</span>
                <select
                  prop:value=move || assignee.get()
                  on:change=move |ev| assignee.set(event_target_value(&ev))
                >
                  <For
                    each=move || directory.directory().get().users().to_vec()
                    key=|user| user.id.clone()
                    children=move |user: User| {
                        view! { <option value=user.id.clone()>{user.full_name.clone()}</option> }
                    }
                  />
                </select>
              </label>
            </div>

            <div class="modal-foot">
              <button class="ghost" on:click=move |_| open.set(false)>"Cancel"</button>
              <button class="primary" disabled=move || submitting.get() on:click=move |_| submit()>
                {move || if submitting.get() { "Declaring..." } else { "Declare Incident" }}
              </button>
            </div>
          </div>
        </div>
      </Show>
    }
}
