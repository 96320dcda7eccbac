//! Client bootstrap: everything the board page needs to attach to the live socket

use serde::Serialize;

use crate::config::Config;

const MOBILE_MARKERS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Case-insensitive check for a handheld browser
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    MOBILE_MARKERS.iter().any(|marker| ua.contains(marker))
}

/// Returns `prefix` when the page path lives below it, otherwise an empty prefix
pub fn path_prefix<'a>(page_path: &str, prefix: &'a str) -> &'a str {
    if !prefix.is_empty() && page_path.starts_with(prefix) {
        prefix
    } else {
        ""
    }
}

/// Socket scheme matching the page protocol (`https:` or `https`)
pub fn socket_scheme(page_protocol: &str) -> &'static str {
    if page_protocol.trim_end_matches(':').eq_ignore_ascii_case("https") {
        "wss://"
    } else {
        "ws://"
    }
}

/// Progress bar shown during page loads
#[derive(Debug, Clone, Serialize)]
pub struct ProgressBarConfig {
    /// Gradient stops, keyed by position
    pub bar_colors: Vec<(f32, String)>,
    pub shadow_color: String,
    /// Loads faster than this never show the bar
    pub show_delay_ms: u64,
}

impl Default for ProgressBarConfig {
    fn default() -> Self {
        Self {
            bar_colors: vec![(0.0, "#29d".to_string())],
            shadow_color: "rgba(0, 0, 0, .3)".to_string(),
            show_delay_ms: 300,
        }
    }
}

/// Bootstrap document returned to the page
#[derive(Debug, Clone, Serialize)]
pub struct ClientBootstrap {
    pub socket_url: String,
    pub long_poll_fallback_ms: u64,
    pub min_swipe_distance: f64,
    pub debug_commands: bool,
    pub mobile: bool,
    pub progress_bar: ProgressBarConfig,
}

/// What the server knows about the requesting page
#[derive(Debug, Clone, Default)]
pub struct PageContext<'a> {
    pub host: &'a str,
    pub protocol: &'a str,
    pub path: &'a str,
    pub user_agent: &'a str,
}

impl ClientBootstrap {
    pub fn build(config: &Config, page: &PageContext<'_>) -> Self {
        let prefix = path_prefix(page.path, &config.path_prefix);
        let socket_url = format!(
            "{}{}{}{}",
            socket_scheme(page.protocol),
            page.host,
            prefix,
            config.live_endpoint
        );

        Self {
            socket_url,
            long_poll_fallback_ms: config.long_poll_fallback_ms,
            min_swipe_distance: config.min_swipe_distance,
            debug_commands: config.enable_debug_commands,
            mobile: is_mobile_user_agent(page.user_agent),
            progress_bar: ProgressBarConfig::default(),
        }
    }
}
