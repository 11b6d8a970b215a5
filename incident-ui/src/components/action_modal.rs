use incident_core::actions::{CommentOnIncident, EditIncident, TransitionIncident};
use incident_core::incident::{Incident, Severity};
use incident_core::user::User;
use leptos::*;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::browser;
use crate::components::{severity_class, status_class};
use crate::directory::use_directory;
use crate::session::use_session;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Action {
    Transition,
    Comment,
    Edit,
    Delete,
}

enum PendingAction {
    Transition(TransitionIncident),
    Comment(CommentOnIncident),
    Edit(EditIncident),
    Delete,
}

/// Management dialog for one incident: move it through its lifecycle,
/// comment, edit severity and assignment, or delete it. Which tabs are
/// live depends on the viewer's role; the server still has the last
/// word and its refusals surface as notifications.
#[component]
pub fn ActionModal(
    target: RwSignal<Option<Incident>>,
    #[prop(into)] on_done: Callback<()>,
) -> impl IntoView {
    let session = use_session();
    let directory = use_directory();

    let action = create_rw_signal(Action::Transition);
    let next_state = create_rw_signal(String::new());
    let comment = create_rw_signal(String::new());
    let edit_severity = create_rw_signal(Severity::default());
    let edit_assignee = create_rw_signal(String::new());
    let delete_armed = create_rw_signal(false);
    let submitting = create_rw_signal(false);

    // Reset the form whenever a new incident is opened. The default tab
    // is Transition unless the record offers nowhere to go.
    create_effect(move |_| {
        if let Some(incident) = target.get() {
            action.set(if incident.allowed_transitions.is_empty() {
                Action::Comment
            } else {
                Action::Transition
            });
            next_state.set(incident.allowed_transitions.first().cloned().unwrap_or_default());
            comment.set(String::new());
            edit_severity.set(incident.severity);
            edit_assignee.set(incident.owner_id.clone().unwrap_or_default());
            delete_armed.set(false);
        }
    });

    let submit = move || {
        let Some(incident) = target.get_untracked() else { return };
        let pending = match action.get_untracked() {
            Action::Transition => TransitionIncident::new(
                &incident,
                &next_state.get_untracked(),
                &comment.get_untracked(),
            )
            .map(PendingAction::Transition),
            Action::Comment => {
                CommentOnIncident::new(&comment.get_untracked()).map(PendingAction::Comment)
            }
            Action::Edit => EditIncident::new(
                &incident,
                edit_severity.get_untracked(),
                &edit_assignee.get_untracked(),
                &comment.get_untracked(),
            )
            .map(PendingAction::Edit),
            Action::Delete => {
                if !delete_armed.get_untracked() {
                    delete_armed.set(true);
                    return;
                }
                Ok(PendingAction::Delete)
            }
        };
        let pending = match pending {
            Ok(pending) => pending,
            Err(message) => {
                browser::notify(&message);
                return;
            }
        };
        let id = incident.id.clone();
        submitting.set(true);
        spawn_local(async move {
            let outcome = match pending {
                PendingAction::Transition(body) => api::transition_incident(&id, &body).await,
                PendingAction::Comment(body) => api::comment_on_incident(&id, &body).await,
                PendingAction::Edit(body) => api::update_incident(&id, &body).await,
                PendingAction::Delete => api::delete_incident(&id).await,
            };
            match outcome {
                Ok(()) => {
                    target.set(None);
                    on_done.call(());
                }
                Err(err) => {
                    log::error!("incident action failed: {err}");
                    browser::notify(&err.to_string());
                }
            }
            submitting.set(false);
        });
    };

    let submit_label = move || match (action.get(), delete_armed.get()) {
        (Action::Transition, _) => "Update Status",
        (Action::Comment, _) => "Add Comment",
        (Action::Edit, _) => "Save Changes",
        (Action::Delete, false) => "Delete Incident",
        (Action::Delete, true) => "Confirm Permanent Delete",
    };

    view! {
      <Show when=move || target.with(|t| t.is_some()) fallback=|| ()>
        <div class="overlay" on:click=move |_| target.set(None)>
          <div class="modal wide" on:click=|ev| ev.stop_propagation()>
            <div class="modal-head">
              <div>
                <h2>{move || target.with(|t| t.as_ref().map(|i| i.title.clone()).unwrap_or_default())}</h2>
                <p class="meta mono">
                  {move || target.with(|t| t.as_ref().map(|i| i.short_id().to_string()).unwrap_or_default())}
                </p>
              </div>
              <div class="row">
                {move || target.with(|t| t.as_ref().map(|i| view! {
                    <span class=format!("badge {}", severity_class(i.severity))>{i.severity.code()}</span>
                    <span class=format!("pill {}", status_class(&i.status))>{i.status.clone()}</span>
                }))}
                <button class="ghost" on:click=move |_| target.set(None)>"Close"</button>
              </div>
            </div>

            <div class="tab-row">
              <button
                class="tab"
                class:active=move || action.get() == Action::Transition
                disabled=move || {
                    target.with(|t| t.as_ref().map_or(true, |i| i.allowed_transitions.is_empty()))
                }
                on:click=move |_| action.set(Action::Transition)
              >"Transition"</button>
              <button
                class="tab"
                class:active=move || action.get() == Action::Comment
                on:click=move |_| action.set(Action::Comment)
              >"Comment"</button>
              <button
                class="tab"
                class:active=move || action.get() == Action::Edit
                disabled=move || !session.role().can_edit_incidents()
                on:click=move |_| action.set(Action::Edit)
              >"Edit"</button>
              <Show when=move || session.role().can_delete_incidents() fallback=|| ()>
                <button
                  class="tab danger"
                  class:active=move || action.get() == Action::Delete
                  on:click=move |_| action.set(Action::Delete)
                >"Delete"</button>
              </Show>
            </div>

            {move || match action.get() {
                Action::Transition => view! {
                  <label class="field">
                    <span>"Move to"</span>
                    <select
                      prop:value=move || next_state.get()
                      on:change=move |ev| next_state.set(event_target_value(&ev))
                    >
                      {move || {
                          target
                              .with(|t| {
                                  t.as_ref()
                                      .map(|i| i.allowed_transitions.clone())
                                      .unwrap_or_default()
                              })
                              .into_iter()
                              .map(|state| view! { <option value=state.clone()>{state}</option> })
                              .collect_view()
                      }}
                    </select>
                  </label>
                  <label class="field">
                    <span>"Comment"</span>
                    <textarea
                      prop:value=move || comment.get()
                      on:input=move |ev| comment.set(event_target_value(&ev))
                      placeholder="Context for this action..."
                    ></textarea>
                  </label>
                }.into_view(),
                Action::Comment => view! {
                  <label class="field">
                    <span>"Comment"</span>
                    <textarea
                      prop:value=move || comment.get()
                      on:input=move |ev| comment.set(event_target_value(&ev))
                      placeholder="Context for this action..."
                    ></textarea>
                  </label>
                }.into_view(),
                Action::Edit => view! {
                  <div class="row">
                    <label class="field">
                      <span>"Severity"</span>
                      <select
                        prop:value=move || edit_severity.get().code().to_string()
                        on:change=move |ev| {
                            if let Ok(parsed) = event_target_value(&ev).parse::<Severity>() {
                                edit_severity.set(parsed);
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
                      <span>"Assignee"</span>
                      <select
                        prop:value=move || edit_assignee.get()
                        on:change=move |ev| edit_assignee.set(event_target_value(&ev))
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
                  <label class="field">
                    <span>"Comment"</span>
                    <textarea
                      prop:value=move || comment.get()
                      on:input=move |ev| comment.set(event_target_value(&ev))
                      placeholder="Context for this action..."
                    ></textarea>
                  </label>
                }.into_view(),
                Action::Delete => view! {
                  <div class="notice danger">
                    <b>"This permanently deletes the incident."</b>
                    <p class="meta">
                      "The audit trail and all attachments go with it. There is no undo."
                    </p>
                  </div>
                }.into_view(),
            }}

            <div class="modal-foot">
              <button class="ghost" on:click=move |_| target.set(None)>"Cancel"</button>
              <button
                class=move || {
                    if action.get() == Action::Delete { "danger" } else { "primary" }
                }
                disabled=move || submitting.get()
                on:click=move |_| submit()
              >
                {submit_label}
              </button>
            </div>
          </div>
        </div>
      </Show>
    }
}
