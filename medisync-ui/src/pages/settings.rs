//! Profile, password, appearance and preference controls.
//!
//! Preferences are read straight from local storage; an unreadable store
//! is surfaced as an error so the page's error boundary can offer a reload.

use crate::browser::{self, LocalStorage};
use crate::state::{use_auth, use_theme, use_toasts};
use leptos::*;
use medisync_core::notifications::DesktopPermission;
use medisync_core::settings::{Preferences, TimeFormat, FONT_FAMILIES, FONT_SIZES, LANGUAGES};
use medisync_core::user::ProfileUpdate;
use medisync_core::validation::{validate_password_change, FieldErrors};
use wasm_bindgen_futures::spawn_local;

fn error_for(errors: RwSignal<FieldErrors>, field: &'static str) -> impl Fn() -> Option<String> {
    move || errors.with(|e| e.get(field).map(str::to_owned))
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    view! {
      <section class="settings">
        <h1>"Settings"</h1>
        <ProfileSection/>
        <PasswordSection/>
        <AppearanceSection/>
        {move || Preferences::load(&LocalStorage).map(|prefs| view! { <PreferencesSection initial=prefs/> })}
        <DesktopSection/>
      </section>
    }
}

#[component]
fn ProfileSection() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let current = auth.user.get_untracked();
    let field = |read: fn(&medisync_core::User) -> String| {
        create_rw_signal(current.as_ref().map(read).unwrap_or_default())
    };
    let first_name = field(|u| u.first_name.clone());
    let last_name = field(|u| u.last_name.clone());
    let email = field(|u| u.email.clone());
    let hospital = field(|u| u.hospital.clone().unwrap_or_default());
    let department = field(|u| u.department.clone().unwrap_or_default());

    let save = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let non_blank = |v: String| (!v.trim().is_empty()).then(|| v.trim().to_owned());
        let update = ProfileUpdate {
            first_name: non_blank(first_name.get_untracked()),
            last_name: non_blank(last_name.get_untracked()),
            email: non_blank(email.get_untracked()),
            avatar: None,
            hospital: non_blank(hospital.get_untracked()),
            department: non_blank(department.get_untracked()),
        };
        match auth.update_profile(update) {
            Ok(_) => toasts.success("Profile updated"),
            Err(err) => toasts.error(err.to_string()),
        }
    };

    let input = |label: &'static str, value: RwSignal<String>| {
        view! {
          <label class="field">
            <span>{label}</span>
            <input prop:value=move || value.get() on:input=move |ev| value.set(event_target_value(&ev))/>
          </label>
        }
    };

    view! {
      <article class="card">
        <h3>"Profile"</h3>
        <form on:submit=save>
          <div class="row">
            {input("First name", first_name)}
            {input("Last name", last_name)}
          </div>
          {input("Email", email)}
          <div class="row">
            {input("Hospital", hospital)}
            {input("Department", department)}
          </div>
          <button type="submit">"Save profile"</button>
        </form>
      </article>
    }
}

#[component]
fn PasswordSection() -> impl IntoView {
    let toasts = use_toasts();
    let current = create_rw_signal(String::new());
    let new = create_rw_signal(String::new());
    let confirm = create_rw_signal(String::new());
    let errors = create_rw_signal(FieldErrors::default());

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let found = validate_password_change(
            &current.get_untracked(),
            &new.get_untracked(),
            &confirm.get_untracked(),
        );
        let ok = found.is_empty();
        errors.set(found);
        if ok {
            current.set(String::new());
            new.set(String::new());
            confirm.set(String::new());
            toasts.success("Password changed");
        }
    };

    let input = move |label: &'static str, value: RwSignal<String>, field: &'static str| {
        view! {
          <label class="field">
            <span>{label}</span>
            <input
              type="password"
              prop:value=move || value.get()
              on:input=move |ev| value.set(event_target_value(&ev))
            />
            <span class="field-error">{error_for(errors, field)}</span>
          </label>
        }
    };

    view! {
      <article class="card">
        <h3>"Change password"</h3>
        <form on:submit=submit>
          {input("Current password", current, "currentPassword")}
          {input("New password", new, "password")}
          {input("Confirm new password", confirm, "confirmPassword")}
          <button type="submit">"Update password"</button>
        </form>
      </article>
    }
}

#[component]
fn AppearanceSection() -> impl IntoView {
    let theme = use_theme();
    let settings = theme.settings;

    view! {
      <article class="card">
        <h3>"Appearance"</h3>
        <label class="toggle">
          <input
            type="checkbox"
            prop:checked=move || settings.with(|s| s.is_dark())
            on:change=move |ev| {
                let dark = event_target_checked(&ev);
                theme.update(|s| s.set_dark_mode(dark));
            }
          />
          " Dark mode"
        </label>
        <label class="toggle">
          <input
            type="checkbox"
            prop:checked=move || settings.with(|s| s.use_system)
            on:change=move |_| {
                let prefers_dark = browser::system_preferences().prefers_dark;
                theme.update(|s| s.toggle_system(prefers_dark));
            }
          />
          " Follow system theme"
        </label>
        <label class="toggle">
          <input
            type="checkbox"
            prop:checked=move || settings.with(|s| s.reduce_motion)
            on:change=move |ev| {
                let reduce = event_target_checked(&ev);
                theme.update(|s| s.reduce_motion = reduce);
            }
          />
          " Reduce motion"
        </label>
        <label class="field">
          <span>"Accent colour"</span>
          <input
            type="color"
            prop:value=move || settings.with(|s| s.accent_color.clone())
            on:change=move |ev| {
                let color = event_target_value(&ev);
                theme.update(|s| s.accent_color = color);
            }
          />
        </label>
      </article>
    }
}

#[component]
fn PreferencesSection(initial: Preferences) -> impl IntoView {
    let toasts = use_toasts();
    let prefs = create_rw_signal(initial);

    create_effect(move |_| {
        prefs.with(|p| browser::apply_preferences(&p.font_size, &p.font_family, p.animation_speed));
    });

    let save = {
        let toasts = toasts.clone();
        move |_| match prefs.with_untracked(|p| p.save(&LocalStorage)) {
            Ok(()) => toasts.success("Preferences saved"),
            Err(err) => toasts.error(err.to_string()),
        }
    };
    let reset = move |_| {
        prefs.update(Preferences::reset);
        match prefs.with_untracked(|p| p.save(&LocalStorage)) {
            Ok(()) => toasts.success("Preferences reset to defaults"),
            Err(err) => toasts.error(err.to_string()),
        }
    };

    let channel = move |label: &'static str,
                        get: fn(&Preferences) -> bool,
                        set: fn(&mut Preferences, bool)| {
        view! {
          <label class="toggle">
            <input
              type="checkbox"
              prop:checked=move || prefs.with(get)
              on:change=move |ev| {
                  let on = event_target_checked(&ev);
                  prefs.update(|p| set(p, on));
              }
            />
            {format!(" {label}")}
          </label>
        }
    };

    view! {
      <article class="card">
        <h3>"Preferences"</h3>
        <label class="field">
          <span>"Language"</span>
          <select on:change=move |ev| {
              let value = event_target_value(&ev);
              prefs.update(|p| p.language = value);
          }>
            {LANGUAGES
                .into_iter()
                .map(|(code, name)| view! {
                  <option value=code selected=move || prefs.with(|p| p.language == code)>{name}</option>
                })
                .collect_view()}
          </select>
        </label>
        <label class="field">
          <span>"Font size"</span>
          <select on:change=move |ev| {
              let value = event_target_value(&ev);
              prefs.update(|p| p.font_size = value);
          }>
            {FONT_SIZES
                .into_iter()
                .map(|size| view! {
                  <option value=size selected=move || prefs.with(|p| p.font_size == size)>{size}</option>
                })
                .collect_view()}
          </select>
        </label>
        <label class="field">
          <span>"Font family"</span>
          <select on:change=move |ev| {
              let value = event_target_value(&ev);
              prefs.update(|p| p.font_family = value);
          }>
            {FONT_FAMILIES
                .into_iter()
                .map(|family| view! {
                  <option value=family selected=move || prefs.with(|p| p.font_family == family)>{family}</option>
                })
                .collect_view()}
          </select>
        </label>
        <label class="field">
          <span>"Time format"</span>
          <select on:change=move |ev| {
              if let Some(format) = TimeFormat::parse(&event_target_value(&ev)) {
                  prefs.update(|p| p.time_format = format);
              }
          }>
            {[TimeFormat::TwelveHour, TimeFormat::TwentyFourHour]
                .into_iter()
                .map(|f| view! {
                  <option value=f.as_str() selected=move || prefs.with(|p| p.time_format == f)>{f.as_str()}</option>
                })
                .collect_view()}
          </select>
        </label>
        <label class="field">
          <span>{move || prefs.with(|p| format!("Animation speed ({:.1}s)", p.animation_speed))}</span>
          <input
            type="range"
            min="0.5"
            max="2"
            step="0.1"
            prop:value=move || prefs.with(|p| p.animation_speed.to_string())
            on:input=move |ev| {
                if let Ok(seconds) = event_target_value(&ev).parse::<f32>() {
                    prefs.update(|p| p.set_animation_speed(seconds));
                }
            }
          />
        </label>
        <fieldset>
          <legend>"Notification channels"</legend>
          {channel("Email", |p| p.notifications.email, |p, on| p.notifications.email = on)}
          {channel("Push", |p| p.notifications.push, |p, on| p.notifications.push = on)}
          {channel("SMS", |p| p.notifications.sms, |p, on| p.notifications.sms = on)}
        </fieldset>
        <div class="row">
          <button on:click=save>"Save preferences"</button>
          <button class="link" on:click=reset>"Reset to defaults"</button>
        </div>
      </article>
    }
}

#[component]
fn DesktopSection() -> impl IntoView {
    let toasts = use_toasts();
    let permission = create_rw_signal(toasts.center().permission());

    let request = {
        let toasts = toasts.clone();
        move |_| {
            let toasts = toasts.clone();
            spawn_local(async move {
                let granted = browser::request_desktop_permission().await;
                toasts.center().set_permission(granted);
                permission.set(granted);
            });
        }
    };
    let test = move |_| toasts.success("This is how alerts will look");

    let label = move || match permission.get() {
        DesktopPermission::Granted => "Desktop notifications are enabled.",
        DesktopPermission::Denied => "Desktop notifications are blocked in this browser.",
        DesktopPermission::Default => "Desktop notifications have not been requested yet.",
        DesktopPermission::Unsupported => "This browser does not support desktop notifications.",
    };

    view! {
      <article class="card">
        <h3>"Desktop notifications"</h3>
        <p class="meta">{label}</p>
        <div class="row">
          <Show when=move || permission.get() == DesktopPermission::Default fallback=|| ()>
            <button on:click=request.clone()>"Enable"</button>
          </Show>
          <button class="link" on:click=test>"Send test notification"</button>
        </div>
      </article>
    }
}
