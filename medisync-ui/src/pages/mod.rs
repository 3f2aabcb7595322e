pub mod appointments;
pub mod auth;
pub mod dashboard;
pub mod emergencies;
pub mod hospitals;
pub mod not_found;
pub mod patients;
pub mod settings;
pub mod staff;

use crate::state::use_services;
use leptos::*;
use medisync_core::records::{load_fixture, Record, RecordStore};
use wasm_bindgen_futures::spawn_local;

/// Loads a page's fixture after the simulated delay. `None` while loading.
pub fn use_fixture<R: Record + 'static>(
    fixture: fn() -> Vec<R>,
) -> RwSignal<Option<RecordStore<R>>> {
    let services = use_services();
    let store = create_rw_signal(None);
    spawn_local(async move {
        let loaded = load_fixture(&services.delay, services.config.page_load_delay, fixture).await;
        store.set(Some(loaded));
    });
    store
}
