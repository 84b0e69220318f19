//! Well-known console paths.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

pub const ROOT: &str = "/";
pub const DASHBOARD: &str = "/dashboard";
pub const SIGN_IN: &str = "/sign-in";
pub const SIGN_UP: &str = "/sign-up";
pub const FORGOT_PASSWORD: &str = "/forgot-password";
pub const RESET_PASSWORD: &str = "/reset-password";
pub const AUTH_CALLBACK: &str = "/auth/callback";

/// Paths reachable without a session.
pub const PUBLIC_PATHS: &[&str] = &[
    ROOT,
    SIGN_IN,
    SIGN_UP,
    FORGOT_PASSWORD,
    RESET_PASSWORD,
    "/about",
    "/info",
    AUTH_CALLBACK,
];

/// Pages that only make sense without a session; administrators are sent to the dashboard.
pub const AUTH_PAGES: &[&str] = &[SIGN_IN, SIGN_UP, FORGOT_PASSWORD, RESET_PASSWORD];

pub fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

pub fn is_auth_page(path: &str) -> bool {
    AUTH_PAGES.contains(&path)
}

/// Canonical form used for every lookup.
///
/// Percent-escapes are decoded, empty and `.` segments dropped, `..` pops
/// the previous segment (never above the root) and no trailing slash is
/// kept. Every spelling a server would route to `/create-missions` maps to
/// that exact table key. Already-canonical input is borrowed.
pub fn normalize(path: &str) -> Cow<'_, str> {
    let decoded = percent_decode_str(path).decode_utf8_lossy();

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return Cow::Borrowed(ROOT);
    }

    let canonical = format!("/{}", segments.join("/"));
    if canonical == path {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(canonical)
    }
}
