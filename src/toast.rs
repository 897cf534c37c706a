//! Toast records and the options used to request them.
//!
//! [`ToastOptions`] is what callers hand in: every field optional. [`Toast`]
//! is what the manager stores and hands out: every option resolved against
//! the provider defaults and the built-in fallbacks.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::id::ToastId;

/// Auto-dismiss delay applied when neither the request nor the provider
/// defaults specify one.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);

// ---------------------------------------------------------------------------
// Value enums
// ---------------------------------------------------------------------------

/// Semantic status of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    /// Work in progress. Usually replaced through `update` once it settles.
    Loading,
}

/// Visual treatment requested from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    #[default]
    Subtle,
    Solid,
    LeftAccent,
    TopAccent,
}

/// Screen region a toast is stacked in.
///
/// Each position is an independent stack; ordering derives follow declaration
/// order so grouped output is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    Top,
    TopLeft,
    TopRight,
    #[default]
    Bottom,
    BottomLeft,
    BottomRight,
}

impl Position {
    /// Every declared position, in display order.
    pub const ALL: [Position; 6] = [
        Position::Top,
        Position::TopLeft,
        Position::TopRight,
        Position::Bottom,
        Position::BottomLeft,
        Position::BottomRight,
    ];

    /// Kebab-case name, matching the configuration file spelling.
    pub fn name(self) -> &'static str {
        match self {
            Position::Top => "top",
            Position::TopLeft => "top-left",
            Position::TopRight => "top-right",
            Position::Bottom => "bottom",
            Position::BottomLeft => "bottom-left",
            Position::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How long a toast stays up without interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutoDismiss {
    /// Stays until closed or removed.
    Never,
    /// Closed automatically once the delay elapses.
    After(Duration),
}

impl AutoDismiss {
    /// Delay to schedule, if any. A zero delay counts as persistent.
    pub fn delay(self) -> Option<Duration> {
        match self {
            AutoDismiss::After(d) if !d.is_zero() => Some(d),
            _ => None,
        }
    }

    pub fn is_persistent(self) -> bool {
        self.delay().is_none()
    }
}

impl Default for AutoDismiss {
    fn default() -> Self {
        AutoDismiss::After(DEFAULT_DURATION)
    }
}

impl From<Duration> for AutoDismiss {
    fn from(d: Duration) -> Self {
        AutoDismiss::After(d)
    }
}

impl From<Option<Duration>> for AutoDismiss {
    fn from(d: Option<Duration>) -> Self {
        d.map_or(AutoDismiss::Never, AutoDismiss::After)
    }
}

/// Why a toast went through its close routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// Closed by the user or by code calling `close`.
    Dismissed,
    /// The auto-dismiss timer fired.
    TimedOut,
}

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

/// Called once when a toast is closed, before it leaves the active set.
pub type CloseCallback = Arc<dyn Fn(&ToastId, CloseReason) + Send + Sync>;

/// Custom render override handed through to the rendering layer.
pub type RenderFn = Arc<dyn Fn(&Toast) -> String + Send + Sync>;

/// A single call-to-action shown on a toast.
#[derive(Clone)]
pub struct ToastAction {
    pub label: String,
    on_trigger: Arc<dyn Fn(&ToastId) + Send + Sync>,
}

impl ToastAction {
    pub fn new(label: impl Into<String>, on_trigger: impl Fn(&ToastId) + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            on_trigger: Arc::new(on_trigger),
        }
    }

    /// Run the action's callback for the given toast.
    pub fn trigger(&self, id: &ToastId) {
        (self.on_trigger)(id);
    }
}

impl fmt::Debug for ToastAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// ToastOptions
// ---------------------------------------------------------------------------

/// A toast request, or a partial update to an existing toast.
///
/// Unset fields fall back to the provider defaults, then to the built-in
/// fallbacks. When used as an update, only set fields are applied and `id`
/// is ignored.
#[derive(Clone, Default)]
pub struct ToastOptions {
    pub id: Option<ToastId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub variant: Option<Variant>,
    pub position: Option<Position>,
    pub duration: Option<AutoDismiss>,
    pub closable: Option<bool>,
    pub icon: Option<String>,
    pub render: Option<RenderFn>,
    pub action: Option<ToastAction>,
    pub on_close: Option<CloseCallback>,
}

impl ToastOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with just a title set.
    pub fn titled(title: impl Into<String>) -> Self {
        Self::new().with_title(title)
    }

    /// Set a caller-chosen id (builder). Adding twice with the same id
    /// replaces the first toast.
    pub fn with_id(mut self, id: impl Into<ToastId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Auto-dismiss after `duration` (builder).
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(AutoDismiss::After(duration));
        self
    }

    /// Never auto-dismiss (builder).
    pub fn persistent(mut self) -> Self {
        self.duration = Some(AutoDismiss::Never);
        self
    }

    pub fn with_auto_dismiss(mut self, auto_dismiss: impl Into<AutoDismiss>) -> Self {
        self.duration = Some(auto_dismiss.into());
        self
    }

    pub fn closable(mut self, closable: bool) -> Self {
        self.closable = Some(closable);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_render(mut self, render: impl Fn(&Toast) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    pub fn with_action(
        mut self,
        label: impl Into<String>,
        on_trigger: impl Fn(&ToastId) + Send + Sync + 'static,
    ) -> Self {
        self.action = Some(ToastAction::new(label, on_trigger));
        self
    }

    /// Callback run once when the toast is closed or times out (builder).
    pub fn on_close(mut self, f: impl Fn(&ToastId, CloseReason) + Send + Sync + 'static) -> Self {
        self.on_close = Some(Arc::new(f));
        self
    }

    /// Fill every unset field from `defaults`. The defaults' `id` never
    /// carries over.
    pub fn layered_over(self, defaults: &ToastOptions) -> ToastOptions {
        ToastOptions {
            id: self.id,
            title: self.title.or_else(|| defaults.title.clone()),
            description: self.description.or_else(|| defaults.description.clone()),
            status: self.status.or(defaults.status),
            variant: self.variant.or(defaults.variant),
            position: self.position.or(defaults.position),
            duration: self.duration.or(defaults.duration),
            closable: self.closable.or(defaults.closable),
            icon: self.icon.or_else(|| defaults.icon.clone()),
            render: self.render.or_else(|| defaults.render.clone()),
            action: self.action.or_else(|| defaults.action.clone()),
            on_close: self.on_close.or_else(|| defaults.on_close.clone()),
        }
    }
}

impl fmt::Debug for ToastOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastOptions")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("description", &self.description)
            .field("status", &self.status)
            .field("variant", &self.variant)
            .field("position", &self.position)
            .field("duration", &self.duration)
            .field("closable", &self.closable)
            .field("icon", &self.icon)
            .field("render", &self.render.is_some())
            .field("action", &self.action)
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Toast
// ---------------------------------------------------------------------------

/// A fully resolved, active toast.
///
/// Values handed out by the manager are snapshots; changing them has no
/// effect on the active set. Use `update` for that.
#[derive(Clone)]
pub struct Toast {
    pub id: ToastId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Status,
    pub variant: Variant,
    pub position: Position,
    pub duration: AutoDismiss,
    pub closable: bool,
    pub icon: Option<String>,
    pub render: Option<RenderFn>,
    pub action: Option<ToastAction>,
    pub on_close: Option<CloseCallback>,
}

impl Toast {
    /// Resolve a request: request value, else provider default, else the
    /// built-in fallback.
    pub fn resolve(id: ToastId, request: ToastOptions, defaults: &ToastOptions) -> Self {
        let merged = request.layered_over(defaults);
        Self {
            id,
            title: merged.title,
            description: merged.description,
            status: merged.status.unwrap_or_default(),
            variant: merged.variant.unwrap_or_default(),
            position: merged.position.unwrap_or_default(),
            duration: merged.duration.unwrap_or_default(),
            closable: merged.closable.unwrap_or(true),
            icon: merged.icon,
            render: merged.render,
            action: merged.action,
            on_close: merged.on_close,
        }
    }

    /// Shallow-merge the set fields of `patch` into this toast.
    ///
    /// Returns `true` when the patch carried a duration, meaning any running
    /// timer has to be replaced.
    pub fn apply(&mut self, patch: ToastOptions) -> bool {
        if let Some(title) = patch.title {
            self.title = Some(title);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(variant) = patch.variant {
            self.variant = variant;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(closable) = patch.closable {
            self.closable = closable;
        }
        if let Some(icon) = patch.icon {
            self.icon = Some(icon);
        }
        if let Some(render) = patch.render {
            self.render = Some(render);
        }
        if let Some(action) = patch.action {
            self.action = Some(action);
        }
        if let Some(on_close) = patch.on_close {
            self.on_close = Some(on_close);
        }
        match patch.duration {
            Some(duration) => {
                self.duration = duration;
                true
            }
            None => false,
        }
    }

    /// Output of the custom render override, if one is set.
    pub fn render_override(&self) -> Option<String> {
        self.render.as_ref().map(|render| render(self))
    }
}

impl fmt::Debug for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toast")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("description", &self.description)
            .field("status", &self.status)
            .field("variant", &self.variant)
            .field("position", &self.position)
            .field("duration", &self.duration)
            .field("closable", &self.closable)
            .field("icon", &self.icon)
            .field("render", &self.render.is_some())
            .field("action", &self.action)
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ── Resolution ───────────────────────────────────────────────────

    #[test]
    fn resolve_uses_builtin_fallbacks() {
        let toast = Toast::resolve(ToastId::from("a"), ToastOptions::new(), &ToastOptions::new());
        assert_eq!(toast.status, Status::Info);
        assert_eq!(toast.variant, Variant::Subtle);
        assert_eq!(toast.position, Position::Bottom);
        assert_eq!(toast.duration, AutoDismiss::After(Duration::from_millis(5000)));
        assert!(toast.closable);
        assert!(toast.title.is_none());
        assert!(toast.on_close.is_none());
    }

    #[test]
    fn resolve_prefers_request_over_defaults() {
        let defaults = ToastOptions::new()
            .with_position(Position::TopRight)
            .with_status(Status::Warning)
            .closable(false);
        let request = ToastOptions::titled("Saved").with_status(Status::Success);

        let toast = Toast::resolve(ToastId::from("a"), request, &defaults);
        assert_eq!(toast.title.as_deref(), Some("Saved"));
        assert_eq!(toast.status, Status::Success);
        assert_eq!(toast.position, Position::TopRight);
        assert!(!toast.closable);
    }

    #[test]
    fn defaults_id_is_not_inherited() {
        let defaults = ToastOptions::new().with_id("shared");
        let merged = ToastOptions::new().layered_over(&defaults);
        assert!(merged.id.is_none());
    }

    // ── AutoDismiss ──────────────────────────────────────────────────

    #[test]
    fn zero_and_never_are_persistent() {
        assert!(AutoDismiss::Never.is_persistent());
        assert!(AutoDismiss::After(Duration::ZERO).is_persistent());
        assert_eq!(
            AutoDismiss::After(Duration::from_secs(2)).delay(),
            Some(Duration::from_secs(2))
        );
        assert_eq!(AutoDismiss::from(None), AutoDismiss::Never);
    }

    // ── apply ────────────────────────────────────────────────────────

    #[test]
    fn apply_merges_only_set_fields() {
        let mut toast = Toast::resolve(
            ToastId::from("a"),
            ToastOptions::titled("Uploading").with_description("0%"),
            &ToastOptions::new(),
        );
        let duration_changed = toast.apply(ToastOptions::new().with_description("50%"));

        assert!(!duration_changed);
        assert_eq!(toast.title.as_deref(), Some("Uploading"));
        assert_eq!(toast.description.as_deref(), Some("50%"));
    }

    #[test]
    fn apply_reports_duration_change() {
        let mut toast = Toast::resolve(ToastId::from("a"), ToastOptions::new(), &ToastOptions::new());
        assert!(toast.apply(ToastOptions::new().persistent()));
        assert_eq!(toast.duration, AutoDismiss::Never);
    }

    #[test]
    fn apply_ignores_patch_id() {
        let mut toast = Toast::resolve(ToastId::from("a"), ToastOptions::new(), &ToastOptions::new());
        toast.apply(ToastOptions::new().with_id("b"));
        assert_eq!(toast.id, ToastId::from("a"));
    }

    // ── Callbacks ────────────────────────────────────────────────────

    #[test]
    fn action_trigger_receives_id() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_c = hits.clone();
        let action = ToastAction::new("Undo", move |id| {
            assert_eq!(id.as_str(), "a");
            hits_c.fetch_add(1, Ordering::SeqCst);
        });
        action.trigger(&ToastId::from("a"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(action.label, "Undo");
    }

    #[test]
    fn render_override_sees_resolved_toast() {
        let toast = Toast::resolve(
            ToastId::from("a"),
            ToastOptions::titled("Hi").with_render(|t| format!("<{}>", t.title.as_deref().unwrap_or(""))),
            &ToastOptions::new(),
        );
        assert_eq!(toast.render_override().as_deref(), Some("<Hi>"));
    }

    #[test]
    fn position_names_are_kebab_case() {
        let names: Vec<_> = Position::ALL.iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            ["top", "top-left", "top-right", "bottom", "bottom-left", "bottom-right"]
        );
    }
}
