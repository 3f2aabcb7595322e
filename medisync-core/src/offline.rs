//! Installable-app manifest and the service worker's cache rules.
//!
//! Pure data: the worker script consumes the serialized rules, and
//! [`rule_for`] answers which rule a request would hit.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheStrategy {
    NetworkFirst,
    StaleWhileRevalidate,
    CacheFirst,
}

/// What a fetch is for, as the worker sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Document,
    Script,
    Style,
    Worker,
    Image,
    Font,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum RequestMatch {
    PathPrefix(&'static str),
    Destinations(&'static [Destination]),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRule {
    pub cache_name: &'static str,
    #[serde(rename = "match")]
    pub matcher: RequestMatch,
    pub strategy: CacheStrategy,
    pub max_entries: u32,
    pub max_age_seconds: u64,
    pub cacheable_statuses: &'static [u16],
}

const CACHEABLE: &[u16] = &[0, 200];
const HOUR: u64 = 60 * 60;
const DAY: u64 = 24 * HOUR;

/// Rules in match order; the first matching rule wins.
pub fn cache_rules() -> Vec<CacheRule> {
    vec![
        CacheRule {
            cache_name: "api-responses",
            matcher: RequestMatch::PathPrefix("/api/"),
            strategy: CacheStrategy::NetworkFirst,
            max_entries: 50,
            max_age_seconds: 5 * 60,
            cacheable_statuses: CACHEABLE,
        },
        CacheRule {
            cache_name: "static-resources",
            matcher: RequestMatch::Destinations(&[
                Destination::Script,
                Destination::Style,
                Destination::Image,
                Destination::Worker,
            ]),
            strategy: CacheStrategy::StaleWhileRevalidate,
            max_entries: 100,
            max_age_seconds: DAY,
            cacheable_statuses: CACHEABLE,
        },
        CacheRule {
            cache_name: "fonts",
            matcher: RequestMatch::Destinations(&[Destination::Font]),
            strategy: CacheStrategy::CacheFirst,
            max_entries: 30,
            max_age_seconds: 30 * DAY,
            cacheable_statuses: CACHEABLE,
        },
    ]
}

pub fn rule_for(path: &str, destination: Destination) -> Option<CacheRule> {
    cache_rules().into_iter().find(|rule| match rule.matcher {
        RequestMatch::PathPrefix(prefix) => path.starts_with(prefix),
        RequestMatch::Destinations(list) => list.contains(&destination),
    })
}

/// Navigations fall back to the app shell unless the path names a file.
pub fn serves_app_shell(path: &str) -> bool {
    if path == "/" {
        return true;
    }
    let last = path.rsplit('/').next().unwrap_or_default();
    let has_extension = last
        .rsplit_once('.')
        .is_some_and(|(_, ext)| {
            !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    let first = path.trim_start_matches('/').chars().next();
    !has_extension && first.is_some_and(|c| c != '.' && c != '_')
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ManifestIcon {
    pub src: &'static str,
    pub sizes: &'static str,
    #[serde(rename = "type")]
    pub mime: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WebManifest {
    pub name: &'static str,
    pub short_name: &'static str,
    pub description: &'static str,
    pub start_url: &'static str,
    pub display: &'static str,
    pub theme_color: &'static str,
    pub background_color: &'static str,
    pub icons: Vec<ManifestIcon>,
}

pub fn web_manifest() -> WebManifest {
    WebManifest {
        name: "MediSync Emergency Coordination",
        short_name: "MediSync",
        description: "Emergency medical coordination dashboard",
        start_url: "/dashboard",
        display: "standalone",
        theme_color: "#2196f3",
        background_color: "#ffffff",
        icons: vec![
            ManifestIcon {
                src: "/logo192.png",
                sizes: "192x192",
                mime: "image/png",
                purpose: None,
            },
            ManifestIcon {
                src: "/logo512.png",
                sizes: "512x512",
                mime: "image/png",
                purpose: Some("any maskable"),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_paths_go_network_first() {
        let rule = rule_for("/api/hospitals", Destination::Other).expect("rule");
        assert_eq!(rule.strategy, CacheStrategy::NetworkFirst);
        assert_eq!(rule.max_age_seconds, 300);
    }

    #[test]
    fn assets_by_destination() {
        let script = rule_for("/assets/index.js", Destination::Script).expect("script");
        assert_eq!(script.strategy, CacheStrategy::StaleWhileRevalidate);
        assert_eq!(script.max_entries, 100);

        let image = rule_for("/logo192.png", Destination::Image).expect("image");
        assert_eq!(image.strategy, CacheStrategy::StaleWhileRevalidate);
        assert_eq!(image.cache_name, "static-resources");

        let font = rule_for("/fonts/inter.woff2", Destination::Font).expect("font");
        assert_eq!(font.cache_name, "fonts");
        assert_eq!(font.strategy, CacheStrategy::CacheFirst);
        assert_eq!(font.max_age_seconds, 30 * 24 * 60 * 60);

        assert!(rule_for("/dashboard", Destination::Document).is_none());
    }

    #[test]
    fn app_shell_fallback_skips_files() {
        assert!(serves_app_shell("/"));
        assert!(serves_app_shell("/patients/3"));
        assert!(!serves_app_shell("/logo192.png"));
        assert!(!serves_app_shell("/_internal"));
    }

    #[test]
    fn rules_serialize_for_the_worker() {
        let json = serde_json::to_value(cache_rules()).expect("serialize");
        assert_eq!(json[0]["strategy"], "network-first");
        assert_eq!(json[0]["match"]["kind"], "pathPrefix");
        assert_eq!(json[1]["match"]["value"][0], "script");
        assert_eq!(json[1]["cacheableStatuses"][1], 200);
    }
}
