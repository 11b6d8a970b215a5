mod api;
mod app;
mod browser;
mod components;
mod directory;
mod route;
mod session;
mod uploader;

use app::App;

fn main() {
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount_to_body(App);
}
