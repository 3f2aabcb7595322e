use super::not_found::NotFoundPage;
use super::use_fixture;
use crate::components::{Chip, Loading, SearchBox};
use crate::state::{use_auth, use_toasts};
use leptos::*;
use leptos_router::A;
use medisync_core::records::patients::{
    self, status_filter, Patient, PatientForm, PatientSeverity, PatientStatus,
};
use medisync_core::records::PageRequest;
use medisync_core::validation::FieldErrors;

fn today() -> String {
    let now = js_sys::Date::new_0();
    format!(
        "{:04}-{:02}-{:02}",
        now.get_full_year(),
        now.get_month() + 1,
        now.get_date()
    )
}

fn severity_class(severity: PatientSeverity) -> &'static str {
    match severity {
        PatientSeverity::Critical => "error",
        PatientSeverity::Moderate => "warning",
        PatientSeverity::Stable => "success",
    }
}

#[component]
pub fn PatientsPage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let store = use_fixture(patients::fixture);
    let search = create_rw_signal(String::new());
    let status = create_rw_signal(None::<PatientStatus>);
    // `Some(None)` is an open add dialog, `Some(Some(id))` an edit.
    let editing = create_rw_signal(None::<Option<u32>>);
    let form = create_rw_signal(PatientForm::blank(&today()));
    let errors = create_rw_signal(FieldErrors::default());
    let can_edit = create_memo({
        let auth = auth.clone();
        move |_| auth.has_permission("edit_patients")
    });
    // Nurses may change status and room on existing records.
    let can_edit_partial = create_memo(move |_| auth.has_permission("edit_patients_partial"));
    let limited = move || !can_edit.get();

    let visible = move || {
        let term = search.get();
        let filter = status_filter(status.get());
        store.with(|s| {
            s.as_ref()
                .map(|s| s.query(&term, &filter, PageRequest::everything()).items)
                .unwrap_or_default()
        })
    };

    let open_add = move |_| {
        form.set(PatientForm::blank(&today()));
        errors.set(FieldErrors::default());
        editing.set(Some(None));
    };
    let open_edit = Callback::new(move |patient: Patient| {
        form.set(PatientForm::from_patient(&patient));
        errors.set(FieldErrors::default());
        editing.set(Some(Some(patient.id)));
    });

    let save = {
        let toasts = toasts.clone();
        move |_| {
            let Some(target) = editing.get_untracked() else {
                return;
            };
            let draft = form.get_untracked();
            let full = can_edit.get_untracked();
            store.update(|s| {
                let Some(s) = s else { return };
                let base = target.and_then(|id| s.get(id).cloned());
                let applied = match (&base, full) {
                    (Some(base), false) => Ok(draft.apply_partial(base)),
                    (None, false) => return,
                    (_, true) => draft.apply(base.as_ref()),
                };
                let record = match applied {
                    Ok(record) => record,
                    Err(found) => {
                        errors.set(found);
                        return;
                    }
                };
                let outcome = match target {
                    Some(id) => s.update(id, record).map(|p| format!("{} updated", p.name)),
                    None => Ok(format!("{} admitted", s.create(record).name)),
                };
                match outcome {
                    Ok(message) => {
                        toasts.success(message);
                        editing.set(None);
                    }
                    Err(err) => toasts.error(err.to_string()),
                }
            });
        }
    };

    let remove = Callback::new(move |id: u32| {
        store.update(|s| {
            if let Some(Ok(p)) = s.as_mut().map(|s| s.delete(id)) {
                toasts.success(format!("{} removed", p.name));
            }
        });
    });

    let text_input = move |label: &'static str,
                           get: fn(&PatientForm) -> String,
                           set: fn(&mut PatientForm, String),
                           locked: bool| {
        view! {
          <label class="field">
            <span>{label}</span>
            <input
              disabled=move || locked && limited()
              prop:value=move || form.with(get)
              on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
            />
          </label>
        }
    };

    view! {
      <section>
        <header class="page-header">
          <h1>"Patient Management"</h1>
          <Show when=move || can_edit.get() fallback=|| ()>
            <button on:click=open_add>"Add Patient"</button>
          </Show>
        </header>
        <div class="filters">
          <SearchBox value=search placeholder="Search patients by name or condition..."/>
          <select on:change=move |ev| status.set(PatientStatus::parse(&event_target_value(&ev)))>
            <option value="all">"All statuses"</option>
            {PatientStatus::ALL
                .into_iter()
                .map(|s| view! { <option value=s.as_str()>{s.as_str()}</option> })
                .collect_view()}
          </select>
        </div>

        <Show when=move || editing.with(Option::is_some) fallback=|| ()>
          <div class="dialog">
            <h2>{move || if editing.with(|e| matches!(e, Some(Some(_)))) { "Edit Patient" } else { "Add Patient" }}</h2>
            {text_input("Name", |f| f.name.clone(), |f, v| f.name = v, true)}
            <span class="field-error">{move || errors.with(|e| e.get("name").map(str::to_owned))}</span>
            {text_input("Age", |f| f.age.clone(), |f, v| f.age = v, true)}
            <span class="field-error">{move || errors.with(|e| e.get("age").map(str::to_owned))}</span>
            {text_input("Gender", |f| f.gender.clone(), |f, v| f.gender = v, true)}
            {text_input("Blood type", |f| f.blood_type.clone(), |f, v| f.blood_type = v, true)}
            {text_input("Condition", |f| f.condition.clone(), |f, v| f.condition = v, true)}
            {text_input("Assigned doctor", |f| f.assigned_doctor.clone(), |f, v| f.assigned_doctor = v, true)}
            {text_input("Hospital", |f| f.assigned_hospital.clone(), |f, v| f.assigned_hospital = v, true)}
            {text_input("Room", |f| f.room_number.clone(), |f, v| f.room_number = v, false)}
            <label class="field">
              <span>"Severity"</span>
              <select disabled=limited on:change=move |ev| {
                  if let Some(s) = PatientSeverity::parse(&event_target_value(&ev)) {
                      form.update(|f| f.severity = s);
                  }
              }>
                {PatientSeverity::ALL
                    .into_iter()
                    .map(|s| view! {
                      <option value=s.as_str() selected=move || form.with(|f| f.severity == s)>{s.as_str()}</option>
                    })
                    .collect_view()}
              </select>
            </label>
            <label class="field">
              <span>"Status"</span>
              <select on:change=move |ev| {
                  if let Some(s) = PatientStatus::parse(&event_target_value(&ev)) {
                      form.update(|f| f.status = s);
                  }
              }>
                {PatientStatus::ALL
                    .into_iter()
                    .map(|s| view! {
                      <option value=s.as_str() selected=move || form.with(|f| f.status == s)>{s.as_str()}</option>
                    })
                    .collect_view()}
              </select>
            </label>
            <div class="row">
              <button on:click=save.clone()>"Save"</button>
              <button class="link" on:click=move |_| editing.set(None)>"Cancel"</button>
            </div>
          </div>
        </Show>

        <Show when=move || store.with(Option::is_some) fallback=|| view! { <Loading/> }>
          <table>
            <thead>
              <tr>
                <th>"Name"</th><th>"Age"</th><th>"Condition"</th><th>"Severity"</th>
                <th>"Doctor"</th><th>"Room"</th><th>"Status"</th><th></th>
              </tr>
            </thead>
            <tbody>
              <For
                each=visible
                key=|p| (p.id, p.last_update.clone(), p.status.as_str())
                children=move |p| {
                    let id = p.id;
                    let edit_target = p.clone();
                    view! {
                      <tr>
                        <td><A href=format!("/patients/{id}")>{p.name.clone()}</A></td>
                        <td>{p.age}</td>
                        <td>{p.condition.clone()}</td>
                        <td><Chip label=p.severity.as_str() kind=severity_class(p.severity)/></td>
                        <td>{p.assigned_doctor.clone()}</td>
                        <td>{p.room_number.clone()}</td>
                        <td>{p.status.as_str()}</td>
                        <td>
                          <Show
                            when=move || can_edit.get() || can_edit_partial.get()
                            fallback=|| ()
                          >
                            <button class="link" on:click={
                                let edit_target = edit_target.clone();
                                move |_| open_edit.call(edit_target.clone())
                            }>"Edit"</button>
                          </Show>
                          <Show when=move || can_edit.get() fallback=|| ()>
                            <button class="link danger" on:click=move |_| remove.call(id)>"Delete"</button>
                          </Show>
                        </td>
                      </tr>
                    }
                }
              />
            </tbody>
          </table>
        </Show>
      </section>
    }
}

#[component]
pub fn PatientDetailPage(id: u32) -> impl IntoView {
    let store = use_fixture(patients::fixture);
    let patient = move || store.with(|s| s.as_ref().map(|s| s.get(id).cloned()));

    view! {
      {move || match patient() {
          None => view! { <Loading/> }.into_view(),
          Some(None) => view! { <NotFoundPage/> }.into_view(),
          Some(Some(p)) => view! { <PatientSummary patient=p/> }.into_view(),
      }}
    }
}

fn list(items: &[String]) -> View {
    if items.is_empty() {
        return view! { <p class="meta">"None recorded"</p> }.into_view();
    }
    view! { <ul>{items.iter().map(|i| view! { <li>{i.clone()}</li> }).collect_view()}</ul> }.into_view()
}

#[component]
fn PatientSummary(patient: Patient) -> impl IntoView {
    view! {
      <section class="patient-detail">
        <A href="/patients">"← Back to patients"</A>
        <header class="page-header">
          <h1>{patient.name.clone()}</h1>
          <Chip label=patient.severity.as_str() kind=severity_class(patient.severity)/>
          <Chip label=patient.status.as_str() kind="tag"/>
        </header>
        <div class="grid">
          <article class="card">
            <h3>"Overview"</h3>
            <p>{format!("{} years · {} · Blood type {}", patient.age, patient.gender, patient.blood_type)}</p>
            <p>{format!("Condition: {}", patient.condition)}</p>
            <p>{format!("Admitted {} to {}, room {}", patient.admission_date, patient.assigned_hospital, patient.room_number)}</p>
            <p>{format!("Attending: {}", patient.assigned_doctor)}</p>
            <p class="meta">{format!("Last update {}", patient.last_update)}</p>
          </article>
          <article class="card">
            <h3>"Medical history"</h3>
            {list(&patient.medical_history)}
          </article>
          <article class="card">
            <h3>"Current medications"</h3>
            {list(&patient.current_medications)}
          </article>
          <article class="card">
            <h3>"Allergies"</h3>
            {list(&patient.allergies)}
          </article>
        </div>
      </section>
    }
}
