use crate::browser;
use crate::components::{Shell, ToastStack};
use crate::pages::appointments::AppointmentsPage;
use crate::pages::auth::{ForgotPasswordPage, LoginPage, RegisterPage, ResetPasswordPage};
use crate::pages::dashboard::DashboardPage;
use crate::pages::emergencies::EmergenciesPage;
use crate::pages::hospitals::HospitalsPage;
use crate::pages::not_found::NotFoundPage;
use crate::pages::patients::{PatientDetailPage, PatientsPage};
use crate::pages::settings::SettingsPage;
use crate::pages::staff::StaffPage;
use crate::state::{provide_app_state, use_auth};
use leptos::*;
use leptos_router::{use_location, Redirect, Route, Router, Routes};
use medisync_core::routes::{self, guard, Navigation};

#[component]
pub fn App() -> impl IntoView {
    provide_app_state();

    view! {
      <Router>
        <Routes>
          <Route path="/*any" view=RouteView/>
        </Routes>
        <ToastStack/>
      </Router>
    }
}

/// Maps the browser location onto an app route and runs it through the
/// authentication guard.
#[component]
fn RouteView() -> impl IntoView {
    let auth = use_auth();
    let location = use_location();
    let (pathname, query) = (location.pathname, location.query);

    let authenticated = create_memo(move |_| auth.is_authenticated());
    let route = create_memo(move |_| {
        let parsed = routes::Route::parse(&pathname.get());
        match parsed {
            routes::Route::ResetPassword { .. } => routes::Route::ResetPassword {
                token: query.with(|q| q.get("token").cloned()),
            },
            other => other,
        }
    });
    let at_root = create_memo(move |_| pathname.with(|p| p.trim_end_matches('/').is_empty()));
    let navigation = create_memo(move |_| match guard(route.get(), authenticated.get()) {
        Navigation::Render(target) if at_root.get() => Navigation::Redirect(target),
        other => other,
    });

    move || match navigation.get() {
        Navigation::Redirect(target) => {
            log::debug!("redirecting {} to {target}", route.get_untracked());
            view! { <Redirect path=target.path()/> }.into_view()
        }
        Navigation::Render(target) if target.requires_auth() => {
            view! { <Shell><Guarded>{page(target)}</Guarded></Shell> }.into_view()
        }
        Navigation::Render(target) => view! { <Guarded>{page(target)}</Guarded> }.into_view(),
    }
}

fn page(route: routes::Route) -> View {
    use routes::Route as R;

    match route {
        R::Login => view! { <LoginPage/> }.into_view(),
        R::Register => view! { <RegisterPage/> }.into_view(),
        R::ForgotPassword => view! { <ForgotPasswordPage/> }.into_view(),
        R::ResetPassword { token } => view! { <ResetPasswordPage token=token/> }.into_view(),
        R::Dashboard => view! { <DashboardPage/> }.into_view(),
        R::Patients => view! { <PatientsPage/> }.into_view(),
        R::PatientDetail(id) => view! { <PatientDetailPage id=id/> }.into_view(),
        R::Appointments => view! { <AppointmentsPage/> }.into_view(),
        R::Hospitals => view! { <HospitalsPage/> }.into_view(),
        R::Staff => view! { <StaffPage/> }.into_view(),
        R::Emergencies => view! { <EmergenciesPage/> }.into_view(),
        R::Settings => view! { <SettingsPage/> }.into_view(),
        R::NotFound => view! { <NotFoundPage/> }.into_view(),
    }
}

/// Catches errors raised while rendering a page and offers a way out.
#[component]
fn Guarded(children: Children) -> impl IntoView {
    view! {
      <ErrorBoundary fallback=|errors| view! {
        <div class="error-page" role="alert">
          <h2>"Something went wrong"</h2>
          <ul>
            {move || errors
                .get()
                .into_iter()
                .map(|(_, err)| view! { <li>{err.to_string()}</li> })
                .collect_view()}
          </ul>
          <div class="row">
            <button on:click=|_| browser::reload()>"Reload page"</button>
            <a href="/dashboard">"Go to dashboard"</a>
          </div>
        </div>
      }>
        {children()}
      </ErrorBoundary>
    }
}
