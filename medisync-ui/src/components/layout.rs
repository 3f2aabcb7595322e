use crate::browser;
use crate::state::{use_auth, use_theme, use_toasts};
use leptos::*;
use leptos_router::{use_navigate, NavigateOptions, A};
use medisync_core::notifications::DesktopPermission;
use medisync_core::routes::NAV_ITEMS;
use wasm_bindgen_futures::spawn_local;

/// Side navigation and top bar around every signed-in page.
#[component]
pub fn Shell(children: Children) -> impl IntoView {
    let auth = use_auth();
    let theme = use_theme();
    let toasts = use_toasts();
    let navigate = use_navigate();

    let name = {
        let auth = auth.clone();
        move || auth.user.with(|u| u.as_ref().map(|u| u.full_name()).unwrap_or_default())
    };
    let role = {
        let auth = auth.clone();
        move || auth.user.with(|u| u.as_ref().map(|u| u.role.label()).unwrap_or_default())
    };
    let initials = {
        let auth = auth.clone();
        move || auth.user.with(|u| u.as_ref().map(|u| u.initials()).unwrap_or_default())
    };

    let logout = move |_| {
        let target = auth.logout();
        navigate(&target.path(), NavigateOptions::default());
    };

    let permission = create_rw_signal(toasts.center().permission());
    let enable_desktop = move |_| {
        let toasts = toasts.clone();
        spawn_local(async move {
            let granted = browser::request_desktop_permission().await;
            toasts.center().set_permission(granted);
            permission.set(granted);
            if granted == DesktopPermission::Granted {
                toasts.success("Desktop notifications enabled");
            }
        });
    };

    view! {
      <div class="shell">
        <nav class="sidebar">
          <div class="brand">"MediSync"</div>
          <ul>
            {NAV_ITEMS
                .iter()
                .map(|(label, route)| view! {
                  <li><A href=route.path() active_class="active">{*label}</A></li>
                })
                .collect_view()}
          </ul>
        </nav>
        <div class="main">
          <header class="topbar">
            <Show
              when=move || permission.get() == DesktopPermission::Default
              fallback=|| ()
            >
              <button class="link" on:click=enable_desktop.clone()>"Enable alerts"</button>
            </Show>
            <button
              class="icon"
              title="Toggle dark mode"
              on:click=move |_| theme.update(|s| s.toggle())
            >
              {move || if theme.settings.with(|s| s.is_dark()) { "☀" } else { "☾" }}
            </button>
            <div class="user">
              <span class="avatar">{initials}</span>
              <div>
                <div>{name}</div>
                <div class="meta">{role}</div>
              </div>
              <button on:click=logout>"Sign out"</button>
            </div>
          </header>
          <main class="content">{children()}</main>
        </div>
      </div>
    }
}
