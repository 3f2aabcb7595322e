mod app;
mod browser;
mod components;
mod pages;
mod state;

use leptos::*;

fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    mount_to_body(app::App);
}
