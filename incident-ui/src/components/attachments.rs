use std::time::Duration;

use incident_core::attachment::{Attachment, FileKind};
use incident_core::incident::Incident;
use incident_core::timestamp;
use incident_core::upload::UploadPhase;
use leptos::html;
use leptos::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, File, HtmlInputElement};

use crate::api;
use crate::browser;
use crate::session::use_session;
use crate::uploader::Uploader;

/// Attachment list plus upload surface for one incident. Files arrive
/// via the picker or drag and drop; both feed the same upload sequence.
#[component]
pub fn AttachmentsPanel(
    incident: Incident,
    #[prop(into)] on_change: Callback<()>,
) -> impl IntoView {
    let session = use_session();
    let incident_id = store_value(incident.id);

    let attachments = create_rw_signal(Vec::<Attachment>::new());
    let loading = create_rw_signal(false);
    let error = create_rw_signal(None::<String>);
    let dragging = create_rw_signal(false);

    let uploader = Uploader::new();
    let phase = uploader.phase();
    let input_ref = create_node_ref::<html::Input>();

    let load_attachments = move || {
        let id = incident_id.get_value();
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api::fetch_attachments(&id).await {
                Ok(fetched) => attachments.set(fetched),
                Err(err) => error.set(Some(err.to_string())),
            }
            loading.set(false);
        });
    };
    load_attachments();

    let start_upload = move |file: File| {
        let id = incident_id.get_value();
        spawn_local(async move {
            match uploader.run(&id, &file).await {
                Ok(()) => {
                    load_attachments();
                    on_change.call(());
                    set_timeout(move || uploader.reset(), Duration::from_secs(3));
                }
                Err(message) => {
                    log::warn!("attachment upload failed: {message}");
                    // Size and double-start refusals never reach the
                    // phase signal, so they surface as a notification.
                    if phase.with_untracked(|p| p.error_message().is_none()) {
                        browser::notify(&message);
                    }
                }
            }
        });
    };

    let on_pick = move |ev: web_sys::Event| {
        let input = event_target::<HtmlInputElement>(&ev);
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            start_upload(file);
        }
        input.set_value("");
    };

    let open_picker = move || {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    view! {
      <div class="attachments">
        <div
          class="drop-zone"
          class:dragging=move || dragging.get()
          on:dragover=move |ev: DragEvent| {
              ev.prevent_default();
              dragging.set(true);
          }
          on:dragleave=move |_| dragging.set(false)
          on:drop=move |ev: DragEvent| {
              ev.prevent_default();
              dragging.set(false);
              let picked = ev
                  .data_transfer()
                  .and_then(|transfer| transfer.files())
                  .and_then(|files| files.get(0));
              if let Some(file) = picked {
                  start_upload(file);
              }
          }
        >
          <p>"Drop a file here, or"</p>
          <button class="ghost" on:click=move |_| open_picker()>"Browse Files"</button>
          <p class="meta">"Images and PDFs up to 10MB"</p>
          <input type="file" class="hidden-input" node_ref=input_ref on:change=on_pick/>
        </div>

        {move || match phase.get() {
            UploadPhase::Idle => ().into_view(),
            UploadPhase::Signing => view! { <p class="meta">"Preparing upload..."</p> }.into_view(),
            UploadPhase::Uploading { progress } => view! {
              <div class="progress">
                <div class="progress-fill" style:width=format!("{progress}%")></div>
              </div>
              <p class="meta">{format!("Uploading... {progress}%")}</p>
            }.into_view(),
            UploadPhase::Saving => view! { <p class="meta">"Finalizing..."</p> }.into_view(),
            UploadPhase::Success => view! { <p class="ok">"Upload complete"</p> }.into_view(),
            UploadPhase::Error { message } => view! { <p class="error">{message}</p> }.into_view(),
        }}

        <Show when=move || loading.get() fallback=|| ()>
          <p class="meta">"Loading attachments..."</p>
        </Show>
        {move || error.get().map(|message| view! { <p class="error">{message}</p> })}

        <For
          each=move || attachments.get()
          key=|att| att.id.clone()
          children=move |att: Attachment| {
              let deletable = session
                  .user()
                  .map(|user| att.deletable_by(&user.as_member()))
                  .unwrap_or(false);
              let icon = match att.kind() {
                  FileKind::Image => "icon image",
                  FileKind::Pdf => "icon pdf",
                  FileKind::Other => "icon file",
              };
              let delete = {
                  let id = att.id.clone();
                  let name = att.file_name.clone();
                  move || {
                      if !browser::confirm(&format!("Delete {name}?")) {
                          return;
                      }
                      let incident = incident_id.get_value();
                      let id = id.clone();
                      spawn_local(async move {
                          match api::delete_attachment(&incident, &id).await {
                              Ok(()) => {
                                  load_attachments();
                                  on_change.call(());
                              }
                              Err(err) => {
                                  log::error!("attachment delete failed: {err}");
                                  browser::notify(&err.to_string());
                              }
                          }
                      });
                  }
              };
              view! {
                <div class="attachment-row">
                  <span class=icon></span>
                  <div class="attachment-meta">
                    <a href=att.file_url.clone() target="_blank" rel="noopener noreferrer">
                      {att.file_name.clone()}
                    </a>
                    <p class="meta">
                      {format!(
                          "by {} on {}",
                          att.uploaded_by,
                          timestamp::date_label(&att.created_at),
                      )}
                    </p>
                  </div>
                  {deletable.then(|| view! {
                      <button class="ghost danger" on:click=move |_| delete()>"Remove"</button>
                  })}
                </div>
              }
          }
        />
        <Show
          when=move || {
              !loading.get() && error.with(|e| e.is_none()) && attachments.with(|a| a.is_empty())
          }
          fallback=|| ()
        >
          <p class="empty">"No attachments yet."</p>
        </Show>
      </div>
    }
}
