//! Sign-in, registration and password recovery screens.

use crate::components::ErrorBanner;
use crate::state::{use_auth, use_toasts};
use leptos::*;
use leptos_router::{use_navigate, NavigateOptions, A};
use medisync_core::validation::{
    validate_forgot_password, validate_login, validate_reset_password, FieldErrors,
    RegistrationForm,
};
use medisync_core::UserRole;
use wasm_bindgen_futures::spawn_local;

fn field_error(errors: RwSignal<FieldErrors>, field: &'static str) -> impl Fn() -> Option<View> {
    move || {
        errors.with(|e| {
            e.get(field)
                .map(|m| view! { <span class="field-error">{m.to_owned()}</span> }.into_view())
        })
    }
}

#[component]
fn TextField(
    #[prop(into)] label: String,
    #[prop(default = "text")] kind: &'static str,
    value: RwSignal<String>,
    errors: RwSignal<FieldErrors>,
    field: &'static str,
) -> impl IntoView {
    view! {
      <label class="field">
        <span>{label}</span>
        <input
          type=kind
          name=field
          prop:value=move || value.get()
          on:input=move |ev| value.set(event_target_value(&ev))
        />
        {field_error(errors, field)}
      </label>
    }
}

fn auth_banner() -> impl IntoView {
    let auth = use_auth();
    let error = auth.error;
    view! {
      <ErrorBanner error=Signal::from(error) on_dismiss=move |_| auth.clear_error()/>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let navigate = use_navigate();
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let errors = create_rw_signal(FieldErrors::default());
    let loading = auth.loading;

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let e = email.get_untracked().trim().to_owned();
        let p = password.get_untracked();
        let found = validate_login(&e, &p);
        let ok = found.is_empty();
        errors.set(found);
        if !ok {
            return;
        }
        let auth = auth.clone();
        let toasts = toasts.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            match auth.login(&e, &p).await {
                Ok(route) => {
                    toasts.success("Welcome back");
                    navigate(&route.path(), NavigateOptions::default());
                }
                Err(err) => log::info!("login rejected: {err}"),
            }
        });
    };

    view! {
      <div class="auth-card">
        <h1>"MediSync"</h1>
        <p class="meta">"Emergency Medical Coordination"</p>
        {auth_banner()}
        <form on:submit=submit>
          <TextField label="Email" kind="email" value=email errors=errors field="email"/>
          <TextField label="Password" kind="password" value=password errors=errors field="password"/>
          <button type="submit" disabled=move || loading.get()>
            {move || if loading.get() { "Signing in…" } else { "Sign in" }}
          </button>
        </form>
        <div class="row">
          <A href="/forgot-password">"Forgot password?"</A>
          <A href="/register">"Create an account"</A>
        </div>
      </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let navigate = use_navigate();
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let confirm = create_rw_signal(String::new());
    let first_name = create_rw_signal(String::new());
    let last_name = create_rw_signal(String::new());
    let role = create_rw_signal(String::new());
    let hospital = create_rw_signal(String::new());
    let department = create_rw_signal(String::new());
    let errors = create_rw_signal(FieldErrors::default());
    let loading = auth.loading;

    let departments = move || {
        role.with(|r| r.parse::<UserRole>().map(UserRole::departments).unwrap_or_default())
    };

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let form = RegistrationForm {
            email: email.get_untracked(),
            password: password.get_untracked(),
            confirm_password: confirm.get_untracked(),
            first_name: first_name.get_untracked(),
            last_name: last_name.get_untracked(),
            role: role.get_untracked(),
            hospital: hospital.get_untracked(),
            department: department.get_untracked(),
        };
        let request = match form.into_request() {
            Ok(request) => {
                errors.set(FieldErrors::default());
                request
            }
            Err(found) => {
                errors.set(found);
                return;
            }
        };
        let auth = auth.clone();
        let toasts = toasts.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            if let Ok(route) = auth.register(request).await {
                toasts.success("Account created");
                navigate(&route.path(), NavigateOptions::default());
            }
        });
    };

    view! {
      <div class="auth-card wide">
        <h1>"Create account"</h1>
        {auth_banner()}
        <form on:submit=submit>
          <div class="row">
            <TextField label="First name" value=first_name errors=errors field="firstName"/>
            <TextField label="Last name" value=last_name errors=errors field="lastName"/>
          </div>
          <TextField label="Email" kind="email" value=email errors=errors field="email"/>
          <div class="row">
            <TextField label="Password" kind="password" value=password errors=errors field="password"/>
            <TextField label="Confirm password" kind="password" value=confirm errors=errors field="confirmPassword"/>
          </div>
          <label class="field">
            <span>"Role"</span>
            <select on:change=move |ev| {
                role.set(event_target_value(&ev));
                department.set(String::new());
            }>
              <option value="" selected=move || role.with(String::is_empty)>"Select a role"</option>
              {UserRole::ALL
                  .into_iter()
                  .map(|r| view! { <option value=r.as_str()>{r.label()}</option> })
                  .collect_view()}
            </select>
            {field_error(errors, "role")}
          </label>
          <TextField label="Hospital" value=hospital errors=errors field="hospital"/>
          <label class="field">
            <span>"Department"</span>
            <select on:change=move |ev| department.set(event_target_value(&ev))>
              <option value="">"None"</option>
              {move || departments()
                  .iter()
                  .map(|d| view! { <option value=*d>{*d}</option> })
                  .collect_view()}
            </select>
          </label>
          <button type="submit" disabled=move || loading.get()>
            {move || if loading.get() { "Creating…" } else { "Create account" }}
          </button>
        </form>
        <A href="/login">"Already have an account? Sign in"</A>
      </div>
    }
}

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let auth = use_auth();
    let email = create_rw_signal(String::new());
    let errors = create_rw_signal(FieldErrors::default());
    let sent = create_rw_signal(false);
    let loading = auth.loading;

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let e = email.get_untracked().trim().to_owned();
        let found = validate_forgot_password(&e);
        let ok = found.is_empty();
        errors.set(found);
        if !ok {
            return;
        }
        let auth = auth.clone();
        spawn_local(async move {
            if auth.forgot_password(&e).await.is_ok() {
                sent.set(true);
            }
        });
    };

    view! {
      <div class="auth-card">
        <h1>"Reset your password"</h1>
        {auth_banner()}
        <Show
          when=move || sent.get()
          fallback=move || view! {
            <form on:submit=submit.clone()>
              <TextField label="Email" kind="email" value=email errors=errors field="email"/>
              <button type="submit" disabled=move || loading.get()>"Send reset link"</button>
            </form>
          }
        >
          <div class="banner success">
            {move || format!("If {} is registered, a reset link is on its way.", email.get())}
          </div>
        </Show>
        <A href="/login">"Back to sign in"</A>
      </div>
    }
}

#[component]
pub fn ResetPasswordPage(token: Option<String>) -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let navigate = use_navigate();
    let token = token.unwrap_or_default();
    let password = create_rw_signal(String::new());
    let confirm = create_rw_signal(String::new());
    let errors = create_rw_signal(FieldErrors::default());
    let loading = auth.loading;

    let submit = {
        let token = token.clone();
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            let (p, c) = (password.get_untracked(), confirm.get_untracked());
            let found = validate_reset_password(&token, &p, &c);
            let ok = found.is_empty();
            errors.set(found);
            if !ok {
                return;
            }
            let auth = auth.clone();
            let toasts = toasts.clone();
            let navigate = navigate.clone();
            let token = token.clone();
            spawn_local(async move {
                if let Ok(route) = auth.reset_password(&token, &p).await {
                    toasts.success("Password updated, please sign in");
                    navigate(&route.path(), NavigateOptions::default());
                }
            });
        }
    };

    view! {
      <div class="auth-card">
        <h1>"Choose a new password"</h1>
        {auth_banner()}
        {field_error(errors, "token")}
        <form on:submit=submit>
          <TextField label="New password" kind="password" value=password errors=errors field="password"/>
          <TextField label="Confirm password" kind="password" value=confirm errors=errors field="confirmPassword"/>
          <button type="submit" disabled=move || loading.get()>"Update password"</button>
        </form>
        <A href="/login">"Back to sign in"</A>
      </div>
    }
}
