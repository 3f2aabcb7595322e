use crate::store::HospitalStore;

#[derive(Clone, Debug)]
pub struct AppState {
    pub store: HospitalStore,
}

impl AppState {
    pub fn new(store: HospitalStore) -> Self {
        Self { store }
    }
}
