//! Drives an attachment upload end to end: sign with the API, POST the
//! bytes to object storage, then confirm the stored key. Progress and
//! failures land in a shared [`UploadPhase`] signal that views render
//! directly.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use futures::channel::oneshot;
use incident_core::upload::{self, CompleteAttachment, SignAttachment, UploadPhase};
use leptos::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{File, FormData, ProgressEvent, XmlHttpRequest};

use crate::api;

#[derive(Clone, Copy)]
pub struct Uploader {
    phase: RwSignal<UploadPhase>,
}

impl Uploader {
    pub fn new() -> Self {
        Uploader {
            phase: create_rw_signal(UploadPhase::Idle),
        }
    }

    pub fn phase(&self) -> RwSignal<UploadPhase> {
        self.phase
    }

    pub fn reset(&self) {
        self.phase.update(|phase| *phase = phase.reset());
    }

    /// Apply one machine step; illegal steps leave the phase untouched.
    fn advance(&self, step: impl FnOnce(&UploadPhase) -> Option<UploadPhase>) -> bool {
        let mut moved = false;
        self.phase.update(|phase| {
            if let Some(next) = step(phase) {
                *phase = next;
                moved = true;
            }
        });
        moved
    }

    /// Run the full upload sequence for one file. The size gate runs
    /// before the machine is touched, so an oversized pick leaves any
    /// earlier outcome visible and only raises the returned message.
    pub async fn run(&self, incident_id: &str, file: &File) -> Result<(), String> {
        if !upload::fits_size_limit(file.size() as u64) {
            return Err(upload::OVERSIZE_MESSAGE.to_string());
        }
        if !self.advance(UploadPhase::start) {
            return Err("An upload is already in progress".to_string());
        }

        let sign = SignAttachment {
            file_name: file.name(),
            file_type: file.type_(),
        };
        let signed = match api::sign_attachment(incident_id, &sign).await {
            Ok(signed) => signed,
            Err(err) => {
                log::error!("sign request failed: {err}");
                self.advance(|phase| phase.failed(upload::SIGN_FAILED));
                return Err(upload::SIGN_FAILED.to_string());
            }
        };
        self.advance(UploadPhase::signed);

        match post_to_store(&signed.data.url, &signed.data.fields, file, *self).await {
            Ok(status) if (200..300).contains(&status) => {}
            Ok(status) => {
                log::error!("storage POST returned HTTP {status}");
                self.advance(|phase| phase.failed(upload::STORE_FAILED));
                return Err(upload::STORE_FAILED.to_string());
            }
            Err(err) => {
                log::error!("storage POST failed: {err}");
                self.advance(|phase| phase.failed(upload::STORE_NETWORK_FAILED));
                return Err(upload::STORE_NETWORK_FAILED.to_string());
            }
        }
        self.advance(UploadPhase::stored);

        let complete = CompleteAttachment {
            file_name: file.name(),
            file_key: signed.file_key.clone(),
        };
        if let Err(err) = api::complete_attachment(incident_id, &complete).await {
            log::error!("upload confirmation failed: {err}");
            self.advance(|phase| phase.failed(upload::CONFIRM_FAILED));
            return Err(upload::CONFIRM_FAILED.to_string());
        }
        self.advance(UploadPhase::confirmed);
        Ok(())
    }
}

/// Multipart POST to the signed destination. XHR instead of fetch
/// because only XHR exposes upload progress events.
async fn post_to_store(
    url: &str,
    fields: &BTreeMap<String, String>,
    file: &File,
    uploader: Uploader,
) -> Result<u16, String> {
    let form = FormData::new().map_err(js_err)?;
    for (name, value) in fields {
        form.append_with_str(name, value).map_err(js_err)?;
    }
    // The file part must come after the signed fields.
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(js_err)?;

    let xhr = XmlHttpRequest::new().map_err(js_err)?;
    xhr.open("POST", url).map_err(js_err)?;

    let (sender, receiver) = oneshot::channel::<Result<u16, String>>();
    let sender = Rc::new(RefCell::new(Some(sender)));

    let onload = {
        let xhr = xhr.clone();
        let sender = Rc::clone(&sender);
        Closure::<dyn FnMut()>::new(move || {
            if let Some(sender) = sender.borrow_mut().take() {
                let _ = sender.send(Ok(xhr.status().unwrap_or(0)));
            }
        })
    };
    let onerror = {
        let sender = Rc::clone(&sender);
        Closure::<dyn FnMut()>::new(move || {
            if let Some(sender) = sender.borrow_mut().take() {
                let _ = sender.send(Err("connection dropped".to_string()));
            }
        })
    };
    let onprogress = Closure::<dyn FnMut(ProgressEvent)>::new(move |event: ProgressEvent| {
        if event.length_computable() {
            uploader.advance(|phase| {
                phase.progressed(event.loaded() as u64, event.total() as u64)
            });
        }
    });

    xhr.set_onload(Some(onload.as_ref().unchecked_ref()));
    xhr.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    xhr.upload()
        .map_err(js_err)?
        .set_onprogress(Some(onprogress.as_ref().unchecked_ref()));

    xhr.send_with_opt_form_data(Some(&form)).map_err(js_err)?;

    // The closures stay alive across this await; XHR fires nothing
    // further once the channel resolves.
    receiver
        .await
        .map_err(|_| "upload interrupted".to_string())?
}

fn js_err(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
