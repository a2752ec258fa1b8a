//! View collaborator contract.

use stagehand_core::{BoxError, Session};

/// Produces rendered output for a session's current action.
pub trait Render<S: Session>: Send + Sync {
    /// The rendered output.
    type Output;

    /// Render `action` of `view` from the session's state.
    fn render(&self, view: &str, action: &str, session: &S) -> Result<Self::Output, BoxError>;
}

/// Derive the conventional view identifier for a controller.
///
/// The last `.`-separated segment loses a trailing `Controller` or `Live` and
/// gains `View`: `Blog.PostController` becomes `Blog.PostView`.
pub fn view_name(controller: &str) -> String {
    let (prefix, last) = match controller.rsplit_once('.') {
        Some((prefix, last)) => (Some(prefix), last),
        None => (None, controller),
    };
    let stem = last
        .strip_suffix("Controller")
        .or_else(|| last.strip_suffix("Live"))
        .filter(|stem| !stem.is_empty())
        .unwrap_or(last);

    match prefix {
        Some(prefix) => format!("{prefix}.{stem}View"),
        None => format!("{stem}View"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_suffix_becomes_view() {
        assert_eq!(view_name("Blog.PostController"), "Blog.PostView");
        assert_eq!(view_name("CounterLive"), "CounterView");
        assert_eq!(view_name("Counter"), "CounterView");
    }

    #[test]
    fn bare_suffix_is_kept() {
        assert_eq!(view_name("Live"), "LiveView");
    }
}
