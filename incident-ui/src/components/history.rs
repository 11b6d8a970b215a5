use incident_core::event::IncidentEvent;
use incident_core::incident::Incident;
use incident_core::timestamp;
use leptos::*;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::components::attachments::AttachmentsPanel;
use crate::components::{severity_class, status_class};
use crate::directory::use_directory;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Timeline,
    Attachments,
}

/// Slide-over detail panel for the selected incident: the audit log on
/// one tab, attachments on the other. Events reload whenever a new
/// incident is selected or an attachment changes.
#[component]
pub fn HistoryPanel(selected: RwSignal<Option<Incident>>) -> impl IntoView {
    let directory = use_directory();

    let tab = create_rw_signal(Tab::Timeline);
    let events = create_rw_signal(Vec::<IncidentEvent>::new());
    let loading = create_rw_signal(false);
    let error = create_rw_signal(None::<String>);

    let load_events = move |id: String| {
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api::fetch_events(&id).await {
                Ok(fetched) => events.set(fetched),
                Err(err) => error.set(Some(err.to_string())),
            }
            loading.set(false);
        });
    };

    create_effect(move |_| match selected.get() {
        Some(incident) => {
            tab.set(Tab::Timeline);
            load_events(incident.id);
        }
        None => events.set(Vec::new()),
    });

    let reload = move || {
        if let Some(incident) = selected.get_untracked() {
            load_events(incident.id);
        }
    };

    view! {
      <Show when=move || selected.with(|s| s.is_some()) fallback=|| ()>
        <aside class="slideover">
          <div class="slideover-head">
            <div>
              <h2>{move || selected.with(|s| s.as_ref().map(|i| i.title.clone()).unwrap_or_default())}</h2>
              <p class="meta mono">
                {move || selected.with(|s| s.as_ref().map(|i| i.short_id().to_string()).unwrap_or_default())}
              </p>
              <p class="meta">
                {move || {
                    selected.with(|s| {
                        s.as_ref()
                            .map(|i| {
                                if i.description.is_empty() {
                                    "No description provided.".to_string()
                                } else {
                                    i.description.clone()
                                }
                            })
                            .unwrap_or_default()
                    })
                }}
              </p>
            </div>
            <div class="row">
              {move || selected.with(|s| s.as_ref().map(|i| view! {
                  <span class=format!("badge {}", severity_class(i.severity))>{i.severity.code()}</span>
                  <span class=format!("pill {}", status_class(&i.status))>{i.status.clone()}</span>
              }))}
              <button class="ghost" on:click=move |_| selected.set(None)>"Close"</button>
            </div>
          </div>

          <div class="tab-row">
            <button
              class="tab"
              class:active=move || tab.get() == Tab::Timeline
              on:click=move |_| tab.set(Tab::Timeline)
            >"Audit Log"</button>
            <button
              class="tab"
              class:active=move || tab.get() == Tab::Attachments
              on:click=move |_| tab.set(Tab::Attachments)
            >"Attachments"</button>
          </div>

          {move || match tab.get() {
              Tab::Timeline => view! {
                <div class="timeline">
                  <Show when=move || loading.get() fallback=|| ()>
                    <p class="meta">"Loading history..."</p>
                  </Show>
                  {move || error.get().map(|message| view! { <p class="error">{message}</p> })}
                  <For
                    each=move || events.get()
                    key=|event| event.id.clone()
                    children=move |event: IncidentEvent| {
                        let actor = event.actor_id.clone();
                        view! {
                          <div class="timeline-row" class:breach=event.event_type.is_breach()>
                            <div class="row spread">
                              <b>{event.event_type.label()}</b>
                              <span class="meta">{timestamp::compact_label(&event.created_at)}</span>
                            </div>
                            {event.event_type.shows_value_change().then(|| {
                                let old = event.old_value.clone().unwrap_or_else(|| "None".into());
                                let new = event.new_value.clone().unwrap_or_else(|| "None".into());
                                view! {
                                  <div class="change-row">
                                    <span class="old">{old}</span>
                                    <span class="arrow">"to"</span>
                                    <span class="new">{new}</span>
                                  </div>
                                }
                            })}
                            {event.comment.clone().map(|text| view! { <p class="note">{text}</p> })}
                            <p class="meta">
                              {move || format!("by {}", directory.actor_label(actor.as_deref()))}
                            </p>
                          </div>
                        }
                    }
                  />
                  <Show
                    when=move || !loading.get() && error.with(|e| e.is_none()) && events.with(|e| e.is_empty())
                    fallback=|| ()
                  >
                    <p class="empty">"No events recorded yet."</p>
                  </Show>
                </div>
              }.into_view(),
              Tab::Attachments => match selected.get() {
                  Some(incident) => view! {
                    <AttachmentsPanel incident=incident on_change=move |_| reload()/>
                  }.into_view(),
                  None => ().into_view(),
              },
          }}
        </aside>
      </Show>
    }
}
