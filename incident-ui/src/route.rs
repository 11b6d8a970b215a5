//! Hash routing. Three destinations, no router dependency: the URL
//! fragment is the whole navigation state.

use leptos::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Admin,
    Register,
}

impl Route {
    pub fn hash(self) -> &'static str {
        match self {
            Route::Dashboard => "#/",
            Route::Admin => "#/admin",
            Route::Register => "#/register",
        }
    }

    fn from_hash(hash: &str) -> Route {
        match hash {
            "#/admin" => Route::Admin,
            "#/register" => Route::Register,
            _ => Route::Dashboard,
        }
    }
}

fn current() -> Route {
    let hash = window().location().hash().unwrap_or_default();
    Route::from_hash(&hash)
}

/// Create the route signal and keep it synced with the URL for the life
/// of the page. The listener closure is intentionally leaked; it must
/// outlive every view.
pub fn init() -> RwSignal<Route> {
    let route = create_rw_signal(current());
    let on_hashchange =
        Closure::<dyn FnMut(web_sys::Event)>::new(move |_| route.set(current()));
    if let Err(err) = window()
        .add_event_listener_with_callback("hashchange", on_hashchange.as_ref().unchecked_ref())
    {
        log::warn!("hashchange listener not installed: {err:?}");
    }
    on_hashchange.forget();
    route
}

/// Point the browser at `route`; the hashchange listener folds it back
/// into the signal.
pub fn navigate(route: Route) {
    let _ = window().location().set_hash(route.hash());
}
