#![forbid(unsafe_code)]

//! Fold engine: decides whether content can fold and sizes the widget.
//!
//! The pipeline run on every change is:
//!
//! 1. Resolve a usable width, asking the layout pass hook if the bounds
//!    have none. Without one the measurement is deferred.
//! 2. [`apply_state`] computes the height, the applied line cap, the
//!    exclusion region and the affordance for the current inputs.
//! 3. A changed height is delivered to the [`HeightObserver`].
//! 4. The [`TextContainer`] is reset and receives the applied line cap and
//!    exclusions, and the render revision advances.
//!
//! Folded height is `ceil(line_height) × line_cap`. Unfolded height is the
//! full content height with the collapse label appended, so the label has
//! room on the last line.

use crate::config::{AffordanceLabels, FoldConfig};
use crate::exclusion::compute_affordance_rect;
use crate::observer::{DeferredQueue, FoldCommand, HeightObserver, ObserverSlot};
use foldtext_core::geometry::{LayoutRect, Size};
use foldtext_text::{Content, Font, LayoutConstraints, StyledText, TextMeasurer};
use smallvec::{SmallVec, smallvec};
use std::rc::{Rc, Weak};
use tracing::{debug, debug_span, trace, warn};

/// User-visible fold state. Only a toggle changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FoldState {
    #[default]
    Folded,
    Unfolded,
}

impl FoldState {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Folded => Self::Unfolded,
            Self::Unfolded => Self::Folded,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Folded => "folded",
            Self::Unfolded => "unfolded",
        }
    }
}

/// What the widget actually shows.
///
/// Content that cannot fold is always `Expanded`, whatever the
/// [`FoldState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectiveState {
    Expanded,
    Folded,
    Unfolded,
}

impl EffectiveState {
    pub const fn resolve(can_fold: bool, state: FoldState) -> Self {
        match (can_fold, state) {
            (false, _) => Self::Expanded,
            (true, FoldState::Folded) => Self::Folded,
            (true, FoldState::Unfolded) => Self::Unfolded,
        }
    }
}

/// The toggle affordance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affordance {
    pub visible: bool,
    /// Selected while unfolded.
    pub selected: bool,
    /// Position in widget coordinates, anchored bottom-right.
    pub rect: LayoutRect,
}

impl Affordance {
    pub fn label<'a>(&self, labels: &'a AffordanceLabels) -> &'a str {
        labels.for_selected(self.selected)
    }
}

/// Inputs of one [`apply_state`] run.
#[derive(Debug, Clone, Copy)]
pub struct FoldInputs<'a> {
    pub content: &'a Content,
    pub line_cap: usize,
    pub state: FoldState,
    /// Widget bounds; only the width is read.
    pub bounds: LayoutRect,
    pub config: &'a FoldConfig,
}

/// Result of one [`apply_state`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldOutput {
    pub state: EffectiveState,
    pub can_fold: bool,
    pub height: f32,
    /// Line cap for rendering; 0 means unlimited.
    pub applied_line_cap: usize,
    /// Empty unless the content can fold, then exactly the affordance rect.
    pub exclusions: SmallVec<[LayoutRect; 1]>,
    pub affordance: Affordance,
}

/// A width that measurement can use.
#[inline]
pub fn is_usable_width(width: f32) -> bool {
    width.is_finite() && width > 0.0
}

/// Height of `line_cap` lines, each rounded up to a whole unit.
pub fn folded_height<M: TextMeasurer + ?Sized>(measurer: &M, font: &Font, line_cap: usize) -> f32 {
    measurer.line_height(font).ceil() * line_cap as f32
}

/// Whether `content` exceeds `line_cap` lines at `width`.
///
/// `None` when the width is unusable and the answer has to wait for
/// layout. A cap of 0 never folds.
pub fn can_fold<M: TextMeasurer + ?Sized>(
    measurer: &M,
    content: &Content,
    line_cap: usize,
    width: f32,
    config: &FoldConfig,
) -> Option<bool> {
    if line_cap == 0 {
        return Some(false);
    }
    if !is_usable_width(width) {
        return None;
    }
    let natural = measurer.measure(content, &LayoutConstraints::new(width, config.text_font));
    Some(natural > folded_height(measurer, &config.text_font, line_cap))
}

/// Compute the widget's output for `inputs`.
///
/// Pure: equal inputs give equal outputs. `None` when the width is
/// unusable.
pub fn apply_state<M: TextMeasurer + ?Sized>(
    measurer: &M,
    inputs: &FoldInputs<'_>,
) -> Option<FoldOutput> {
    let FoldInputs {
        content,
        line_cap,
        state,
        bounds,
        config,
    } = *inputs;
    if !is_usable_width(bounds.width) {
        return None;
    }

    let constraints = LayoutConstraints::new(bounds.width, config.text_font);
    let natural = measurer.measure(content, &constraints);
    let folded = folded_height(measurer, &config.text_font, line_cap);
    let can_fold = line_cap > 0 && natural > folded;
    let effective = EffectiveState::resolve(can_fold, state);

    let (height, applied_line_cap) = match effective {
        EffectiveState::Expanded => (natural, line_cap),
        EffectiveState::Folded => (folded, line_cap),
        EffectiveState::Unfolded => {
            let reserved =
                content.with_appended(&config.labels.less, Some(config.affordance_style));
            (measurer.measure(&reserved, &constraints), 0)
        }
    };

    let selected = effective == EffectiveState::Unfolded;
    let rect = compute_affordance_rect(
        measurer,
        LayoutRect::from_size(Size::new(bounds.width, height)),
        config.labels.for_selected(selected),
        &config.affordance_font,
    );
    let exclusions = if can_fold {
        smallvec![rect]
    } else {
        SmallVec::new()
    };

    Some(FoldOutput {
        state: effective,
        can_fold,
        height,
        applied_line_cap,
        exclusions,
        affordance: Affordance {
            visible: can_fold,
            selected,
            rect,
        },
    })
}

/// Truncation and exclusion state handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextContainer {
    max_lines: usize,
    exclusions: SmallVec<[LayoutRect; 1]>,
}

impl TextContainer {
    fn new(max_lines: usize) -> Self {
        Self {
            max_lines,
            exclusions: SmallVec::new(),
        }
    }

    /// 0 means unlimited.
    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn exclusions(&self) -> &[LayoutRect] {
        &self.exclusions
    }

    fn reset_exclusions(&mut self) {
        self.exclusions.clear();
        trace!("exclusions reset");
    }

    fn apply_line_cap(&mut self, max_lines: usize) {
        self.max_lines = max_lines;
        trace!(max_lines, "line cap applied");
    }

    fn add_exclusion(&mut self, rect: LayoutRect) {
        self.exclusions.push(rect);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateReason {
    Content,
    LineCap,
    Bounds,
    Toggle,
}

impl UpdateReason {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::LineCap => "line_cap",
            Self::Bounds => "bounds",
            Self::Toggle => "toggle",
        }
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied { height_changed: bool },
    /// No usable width yet; retried on the next bounds change.
    Deferred,
}

/// Result of [`FoldEngine::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Toggled(FoldState),
    /// The content cannot fold, or has not been measured yet.
    Ignored,
}

type LayoutPass = Box<dyn FnMut() -> Option<LayoutRect>>;

/// Fold state machine for one widget.
///
/// Every setter runs the pipeline synchronously. See the module docs.
pub struct FoldEngine<M> {
    measurer: M,
    config: FoldConfig,
    content: Content,
    line_cap: usize,
    state: FoldState,
    bounds: LayoutRect,
    container: TextContainer,
    output: Option<FoldOutput>,
    measured_height: Option<f32>,
    pending: bool,
    observer: ObserverSlot,
    deferred: DeferredQueue,
    layout_pass: Option<LayoutPass>,
    revision: u64,
}

impl<M: std::fmt::Debug> std::fmt::Debug for FoldEngine<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoldEngine")
            .field("measurer", &self.measurer)
            .field("line_cap", &self.line_cap)
            .field("state", &self.state)
            .field("bounds", &self.bounds)
            .field("output", &self.output)
            .field("pending", &self.pending)
            .field("observer", &self.observer)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl<M: TextMeasurer> FoldEngine<M> {
    /// Folded, empty, zero-width engine using the configured line cap.
    pub fn new(measurer: M, config: FoldConfig) -> Self {
        let line_cap = config.line_cap;
        Self {
            measurer,
            container: TextContainer::new(line_cap),
            config,
            content: Content::Empty,
            line_cap,
            state: FoldState::Folded,
            bounds: LayoutRect::ZERO,
            output: None,
            measured_height: None,
            pending: false,
            observer: ObserverSlot::default(),
            deferred: DeferredQueue::new(),
            layout_pass: None,
            revision: 0,
        }
    }

    // --- inputs ---

    /// Replace the content with plain text; `None` clears it.
    pub fn set_text(&mut self, text: Option<&str>) -> UpdateOutcome {
        self.set_content(text.map(Content::plain).unwrap_or_default())
    }

    /// Replace the content with styled text; `None` clears it.
    pub fn set_styled_text(&mut self, text: Option<StyledText>) -> UpdateOutcome {
        self.set_content(text.map(Content::styled).unwrap_or_default())
    }

    /// Replace the content. The fold state is kept.
    pub fn set_content(&mut self, content: Content) -> UpdateOutcome {
        self.content = content;
        self.update(UpdateReason::Content)
    }

    /// Change the cap; 0 disables folding.
    pub fn set_line_cap(&mut self, line_cap: usize) -> UpdateOutcome {
        self.line_cap = line_cap;
        self.container.reset_exclusions();
        self.container.apply_line_cap(self.cap_for_state());
        self.update(UpdateReason::LineCap)
    }

    /// Set the widget bounds. Measurement reads the width; the height is
    /// the engine's output.
    pub fn set_bounds(&mut self, bounds: LayoutRect) -> UpdateOutcome {
        self.bounds = bounds;
        self.update(UpdateReason::Bounds)
    }

    pub fn set_width(&mut self, width: f32) -> UpdateOutcome {
        let bounds = LayoutRect {
            width,
            ..self.bounds
        };
        self.set_bounds(bounds)
    }

    /// Register the height observer. The engine keeps a weak reference.
    pub fn set_observer<O: HeightObserver + 'static>(&mut self, observer: &Rc<O>) {
        let weak: Weak<O> = Rc::downgrade(observer);
        self.observer.set(weak);
    }

    pub fn set_observer_weak(&mut self, observer: Weak<dyn HeightObserver>) {
        self.observer.set(observer);
    }

    pub fn clear_observer(&mut self) {
        self.observer.clear();
    }

    /// Hook asked for bounds when a measurement finds no usable width.
    pub fn set_layout_pass(&mut self, layout_pass: impl FnMut() -> Option<LayoutRect> + 'static) {
        self.layout_pass = Some(Box::new(layout_pass));
    }

    // --- actions ---

    /// Flip between folded and unfolded.
    ///
    /// A no-op without notification when the content cannot fold.
    pub fn toggle(&mut self) -> ToggleOutcome {
        if !self.can_fold() {
            debug!("toggle ignored: content cannot fold");
            return ToggleOutcome::Ignored;
        }
        self.state = self.state.toggled();
        self.container.reset_exclusions();
        self.container.apply_line_cap(self.cap_for_state());
        self.update(UpdateReason::Toggle);
        ToggleOutcome::Toggled(self.state)
    }

    /// Toggle if `(x, y)` (widget coordinates) hits the visible affordance.
    pub fn tap(&mut self, x: f32, y: f32) -> ToggleOutcome {
        if self.affordance_hit(x, y) {
            self.toggle()
        } else {
            ToggleOutcome::Ignored
        }
    }

    /// Handle for queueing commands from inside an observer callback.
    pub fn deferred(&self) -> DeferredQueue {
        self.deferred.clone()
    }

    /// Apply the commands queued before this call, oldest first.
    ///
    /// Commands queued while these run wait for the next call. Returns the
    /// number applied.
    pub fn process_deferred(&mut self) -> usize {
        let ready = self.deferred.len();
        let mut applied = 0;
        for _ in 0..ready {
            let Some(command) = self.deferred.pop() else {
                break;
            };
            trace!(?command, "applying deferred command");
            match command {
                FoldCommand::Toggle => {
                    self.toggle();
                }
                FoldCommand::SetLineCap(line_cap) => {
                    self.set_line_cap(line_cap);
                }
                FoldCommand::SetContent(content) => {
                    self.set_content(content);
                }
            }
            applied += 1;
        }
        applied
    }

    // --- queries ---

    pub fn fold_state(&self) -> FoldState {
        self.state
    }

    pub fn effective_state(&self) -> EffectiveState {
        EffectiveState::resolve(self.can_fold(), self.state)
    }

    /// False until the content has been measured at a usable width.
    pub fn can_fold(&self) -> bool {
        self.output.as_ref().is_some_and(|o| o.can_fold)
    }

    /// Last height reported to the observer; 0 before the first
    /// measurement.
    pub fn measured_height(&self) -> f32 {
        self.measured_height.unwrap_or(0.0)
    }

    /// Whether a measurement is waiting for a usable width.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn line_cap(&self) -> usize {
        self.line_cap
    }

    /// Line cap currently handed to the renderer; 0 means unlimited.
    pub fn applied_line_cap(&self) -> usize {
        self.container.max_lines()
    }

    pub fn exclusions(&self) -> &[LayoutRect] {
        self.container.exclusions()
    }

    pub fn container(&self) -> &TextContainer {
        &self.container
    }

    pub fn output(&self) -> Option<&FoldOutput> {
        self.output.as_ref()
    }

    /// The affordance when visible.
    pub fn affordance(&self) -> Option<&Affordance> {
        self.output
            .as_ref()
            .map(|o| &o.affordance)
            .filter(|a| a.visible)
    }

    pub fn affordance_label(&self) -> Option<&str> {
        self.affordance()
            .map(|a| a.label(&self.config.labels))
    }

    /// Whether `(x, y)` in widget coordinates lies on the visible
    /// affordance.
    pub fn affordance_hit(&self, x: f32, y: f32) -> bool {
        self.affordance().is_some_and(|a| a.rect.contains(x, y))
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn config(&self) -> &FoldConfig {
        &self.config
    }

    pub fn bounds(&self) -> LayoutRect {
        self.bounds
    }

    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    /// Advances whenever the rendered output may have changed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // --- pipeline ---

    fn cap_for_state(&self) -> usize {
        match self.state {
            FoldState::Folded => self.line_cap,
            FoldState::Unfolded => 0,
        }
    }

    fn resolve_width(&mut self) -> bool {
        if is_usable_width(self.bounds.width) {
            return true;
        }
        if let Some(layout_pass) = self.layout_pass.as_mut()
            && let Some(bounds) = layout_pass()
        {
            trace!(width = bounds.width, "layout pass supplied bounds");
            self.bounds = bounds;
        }
        is_usable_width(self.bounds.width)
    }

    fn update(&mut self, reason: UpdateReason) -> UpdateOutcome {
        let span = debug_span!(
            "fold_update",
            reason = reason.as_str(),
            width = self.bounds.width,
            line_cap = self.line_cap,
            state = self.state.as_str()
        );
        let _guard = span.enter();

        let output = if self.resolve_width() {
            let inputs = FoldInputs {
                content: &self.content,
                line_cap: self.line_cap,
                state: self.state,
                bounds: self.bounds,
                config: &self.config,
            };
            apply_state(&self.measurer, &inputs)
        } else {
            None
        };

        let Some(output) = output else {
            if !self.pending {
                warn!(width = self.bounds.width, "fold measurement deferred until a usable width");
            }
            self.pending = true;
            self.output = None;
            return UpdateOutcome::Deferred;
        };
        self.pending = false;

        let height_changed = self
            .measured_height
            .is_none_or(|previous| (previous - output.height).abs() > f32::EPSILON);
        if height_changed {
            self.measured_height = Some(output.height);
            if self.observer.notify(output.height) {
                debug!(height = output.height, "height change delivered");
            } else {
                trace!(height = output.height, "no live height observer");
            }
        }

        self.container.reset_exclusions();
        self.container.apply_line_cap(output.applied_line_cap);
        for rect in &output.exclusions {
            self.container.add_exclusion(*rect);
        }

        debug!(
            can_fold = output.can_fold,
            height = output.height,
            applied_line_cap = output.applied_line_cap,
            "fold state applied"
        );
        self.output = Some(output);
        self.revision = self.revision.wrapping_add(1);
        UpdateOutcome::Applied { height_changed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foldtext_text::{MonospaceMeasurer, Span};
    use std::cell::{Cell, RefCell};

    const LONG: &str = "one two three four five six seven eight nine ten";
    const SHORT: &str = "short text";

    fn engine() -> FoldEngine<MonospaceMeasurer> {
        let mut engine = FoldEngine::new(MonospaceMeasurer::new(), FoldConfig::terminal());
        engine.set_bounds(LayoutRect::new(0.0, 0.0, 10.0, 0.0));
        engine
    }

    fn recorder() -> (Rc<impl Fn(f32)>, Rc<RefCell<Vec<f32>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (Rc::new(move |h: f32| sink.borrow_mut().push(h)), seen)
    }

    fn inputs<'a>(
        content: &'a Content,
        line_cap: usize,
        state: FoldState,
        width: f32,
        config: &'a FoldConfig,
    ) -> FoldInputs<'a> {
        FoldInputs {
            content,
            line_cap,
            state,
            bounds: LayoutRect::new(0.0, 0.0, width, 0.0),
            config,
        }
    }

    #[test]
    fn initial_state() {
        let engine = FoldEngine::new(MonospaceMeasurer::new(), FoldConfig::default());
        assert_eq!(engine.fold_state(), FoldState::Folded);
        assert_eq!(engine.line_cap(), 3);
        assert!(!engine.can_fold());
        assert_eq!(engine.measured_height(), 0.0);
        assert!(engine.exclusions().is_empty());
    }

    #[test]
    fn apply_state_is_idempotent() {
        let config = FoldConfig::terminal();
        let content = Content::plain(LONG);
        for state in [FoldState::Folded, FoldState::Unfolded] {
            let inputs = inputs(&content, 3, state, 10.0, &config);
            let first = apply_state(&MonospaceMeasurer, &inputs);
            assert!(first.is_some());
            assert_eq!(first, apply_state(&MonospaceMeasurer, &inputs));
        }
    }

    #[test]
    fn apply_state_defers_without_width() {
        let config = FoldConfig::terminal();
        let content = Content::plain(LONG);
        for width in [0.0, -4.0, f32::NAN] {
            let inputs = inputs(&content, 3, FoldState::Folded, width, &config);
            assert_eq!(apply_state(&MonospaceMeasurer, &inputs), None);
        }
    }

    #[test]
    fn can_fold_rules() {
        let config = FoldConfig::terminal();
        let long = Content::plain(LONG);
        assert_eq!(can_fold(&MonospaceMeasurer, &long, 3, 10.0, &config), Some(true));
        assert_eq!(can_fold(&MonospaceMeasurer, &long, 6, 10.0, &config), Some(false));
        assert_eq!(can_fold(&MonospaceMeasurer, &long, 0, 10.0, &config), Some(false));
        assert_eq!(can_fold(&MonospaceMeasurer, &long, 3, 0.0, &config), None);
        assert_eq!(
            can_fold(&MonospaceMeasurer, &Content::Empty, 3, 10.0, &config),
            Some(false)
        );
    }

    #[test]
    fn short_text_does_not_fold() {
        let mut engine = engine();
        engine.set_text(Some(SHORT));
        assert!(!engine.can_fold());
        assert_eq!(engine.effective_state(), EffectiveState::Expanded);
        assert_eq!(engine.measured_height(), 1.0);
        assert!(engine.affordance().is_none());
        assert!(engine.exclusions().is_empty());
        assert_eq!(engine.applied_line_cap(), 3);
    }

    #[test]
    fn short_text_height_ignores_fold_state() {
        let config = FoldConfig::terminal();
        let content = Content::plain(SHORT);
        let folded = apply_state(&MonospaceMeasurer, &inputs(&content, 3, FoldState::Folded, 10.0, &config));
        let unfolded =
            apply_state(&MonospaceMeasurer, &inputs(&content, 3, FoldState::Unfolded, 10.0, &config));
        assert_eq!(folded.map(|o| o.height), Some(1.0));
        assert_eq!(unfolded.map(|o| o.height), Some(1.0));
    }

    #[test]
    fn long_text_folds_to_cap() {
        let mut engine = engine();
        engine.set_text(Some(LONG));
        assert!(engine.can_fold());
        assert_eq!(engine.effective_state(), EffectiveState::Folded);
        assert_eq!(engine.measured_height(), 3.0);
        assert_eq!(engine.applied_line_cap(), 3);

        let affordance = engine.affordance().copied();
        assert_eq!(
            affordance,
            Some(Affordance {
                visible: true,
                selected: false,
                rect: LayoutRect::new(6.0, 2.0, 4.0, 1.0),
            })
        );
        assert_eq!(engine.exclusions(), &[LayoutRect::new(6.0, 2.0, 4.0, 1.0)]);
        assert_eq!(engine.affordance_label(), Some("more"));
    }

    #[test]
    fn folded_height_rounds_line_height_up() {
        let mut engine = FoldEngine::new(MonospaceMeasurer::new(), FoldConfig::default());
        engine.set_bounds(LayoutRect::new(0.0, 0.0, 300.0, 0.0));
        engine.set_text(Some(&LONG.repeat(4)));
        assert!(engine.can_fold());
        assert_eq!(engine.measured_height(), 48.0);
    }

    #[test]
    fn toggle_unfolds_with_label_reservation() {
        let mut engine = engine();
        engine.set_text(Some(LONG));
        assert_eq!(engine.toggle(), ToggleOutcome::Toggled(FoldState::Unfolded));

        assert_eq!(engine.applied_line_cap(), 0);
        assert_eq!(engine.effective_state(), EffectiveState::Unfolded);
        let reserved = MonospaceMeasurer.measure(
            &Content::plain(format!("{LONG}less")),
            &LayoutConstraints::new(10.0, Font::terminal()),
        );
        assert_eq!(engine.measured_height(), reserved);
        assert_eq!(engine.measured_height(), 6.0);

        let affordance = engine.affordance().copied();
        assert_eq!(affordance.map(|a| a.selected), Some(true));
        assert_eq!(engine.affordance_label(), Some("less"));
        assert_eq!(engine.exclusions(), &[LayoutRect::new(6.0, 5.0, 4.0, 1.0)]);
    }

    #[test]
    fn label_reservation_can_add_a_line() {
        let mut engine = engine();
        // the label lengthens the last word past the line end
        engine.set_text(Some("aaaa bbbb cccc dddd eeee ffff gggg hhhh"));
        assert_eq!(engine.measured_height(), 3.0);
        engine.toggle();
        assert_eq!(engine.measured_height(), 5.0);
    }

    #[test]
    fn toggle_twice_restores() {
        let mut engine = engine();
        engine.set_text(Some(LONG));
        let before = (
            engine.fold_state(),
            engine.applied_line_cap(),
            engine.measured_height(),
            engine.exclusions().to_vec(),
        );
        engine.toggle();
        engine.toggle();
        let after = (
            engine.fold_state(),
            engine.applied_line_cap(),
            engine.measured_height(),
            engine.exclusions().to_vec(),
        );
        assert_eq!(before, after);
    }

    #[test]
    fn toggle_without_fold_is_noop() {
        let (observer, seen) = recorder();
        let mut engine = engine();
        engine.set_observer(&observer);
        engine.set_text(Some(SHORT));
        seen.borrow_mut().clear();
        let revision = engine.revision();

        assert_eq!(engine.toggle(), ToggleOutcome::Ignored);
        assert_eq!(engine.fold_state(), FoldState::Folded);
        assert_eq!(engine.revision(), revision);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn line_cap_zero_disables_folding() {
        let mut engine = engine();
        engine.set_text(Some(LONG));
        assert!(engine.can_fold());
        engine.set_line_cap(0);
        assert!(!engine.can_fold());
        assert!(engine.affordance().is_none());
        assert!(engine.exclusions().is_empty());
        assert_eq!(engine.applied_line_cap(), 0);
        assert_eq!(engine.measured_height(), 6.0);
    }

    #[test]
    fn line_cap_change_remeasures() {
        let mut engine = engine();
        engine.set_text(Some(LONG));
        engine.set_line_cap(2);
        assert_eq!(engine.measured_height(), 2.0);
        assert_eq!(engine.exclusions(), &[LayoutRect::new(6.0, 1.0, 4.0, 1.0)]);
        engine.set_line_cap(6);
        assert!(!engine.can_fold());
        assert_eq!(engine.measured_height(), 6.0);
    }

    #[test]
    fn folded_is_shorter_than_unfolded() {
        let mut engine = engine();
        engine.set_text(Some(LONG));
        let folded = engine.measured_height();
        engine.toggle();
        assert!(folded < engine.measured_height());
    }

    #[test]
    fn observer_sees_each_change_once() {
        let (observer, seen) = recorder();
        let mut engine = engine();
        engine.set_observer(&observer);

        engine.set_text(Some(LONG));
        engine.set_text(Some(LONG));
        engine.toggle();
        engine.toggle();
        assert_eq!(*seen.borrow(), vec![3.0, 6.0, 3.0]);
    }

    #[test]
    fn dropped_observer_is_tolerated() {
        let (observer, seen) = recorder();
        let mut engine = engine();
        engine.set_observer(&observer);
        drop(observer);
        engine.set_text(Some(LONG));
        assert_eq!(engine.measured_height(), 3.0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn resize_while_unfolded_recomputes() {
        let mut engine = engine();
        engine.set_text(Some(LONG));
        engine.toggle();
        let narrow = engine.exclusions().to_vec();

        engine.set_width(15.0);
        assert_eq!(engine.fold_state(), FoldState::Unfolded);
        assert!(engine.can_fold());
        let layout = MonospaceMeasurer.measure(
            &Content::plain(format!("{LONG}less")),
            &LayoutConstraints::new(15.0, Font::terminal()),
        );
        assert_eq!(layout, 4.0);
        assert_eq!(engine.measured_height(), layout);
        assert_eq!(engine.exclusions(), &[LayoutRect::new(11.0, 3.0, 4.0, 1.0)]);
        assert_ne!(engine.exclusions(), narrow.as_slice());
    }

    #[test]
    fn content_change_keeps_fold_state() {
        let mut engine = engine();
        engine.set_text(Some(LONG));
        engine.toggle();
        engine.set_text(Some(&format!("{LONG} eleven twelve")));
        assert_eq!(engine.fold_state(), FoldState::Unfolded);
        assert_eq!(engine.applied_line_cap(), 0);
        assert_eq!(engine.affordance_label(), Some("less"));
    }

    #[test]
    fn clearing_content_collapses_to_zero() {
        let mut engine = engine();
        engine.set_text(Some(LONG));
        engine.set_text(None);
        assert!(!engine.can_fold());
        assert_eq!(engine.measured_height(), 0.0);
        assert!(engine.exclusions().is_empty());
    }

    #[test]
    fn styled_content_replaces_plain() {
        let mut engine = engine();
        engine.set_text(Some(SHORT));
        let styled = StyledText::from_spans([Span::raw("one two three four "), Span::raw(LONG)]);
        engine.set_styled_text(Some(styled));
        assert!(engine.content().is_styled());
        assert!(engine.can_fold());
        engine.set_text(Some(SHORT));
        assert!(!engine.content().is_styled());
    }

    #[test]
    fn zero_width_defers_measurement() {
        let (observer, seen) = recorder();
        let mut engine = FoldEngine::new(MonospaceMeasurer::new(), FoldConfig::terminal());
        engine.set_observer(&observer);

        assert_eq!(engine.set_text(Some(LONG)), UpdateOutcome::Deferred);
        assert!(engine.is_pending());
        assert!(!engine.can_fold());
        assert_eq!(engine.toggle(), ToggleOutcome::Ignored);
        assert!(seen.borrow().is_empty());

        let outcome = engine.set_bounds(LayoutRect::new(0.0, 0.0, 10.0, 0.0));
        assert_eq!(outcome, UpdateOutcome::Applied { height_changed: true });
        assert!(!engine.is_pending());
        assert!(engine.can_fold());
        assert_eq!(*seen.borrow(), vec![3.0]);
    }

    #[test]
    fn layout_pass_supplies_width() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut engine = FoldEngine::new(MonospaceMeasurer::new(), FoldConfig::terminal());
        engine.set_layout_pass(move || {
            counter.set(counter.get() + 1);
            Some(LayoutRect::new(0.0, 0.0, 10.0, 0.0))
        });
        engine.set_text(Some(LONG));
        assert_eq!(calls.get(), 1);
        assert_eq!(engine.bounds().width, 10.0);
        assert_eq!(engine.measured_height(), 3.0);

        engine.toggle();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn layout_pass_without_width_still_defers() {
        let mut engine = FoldEngine::new(MonospaceMeasurer::new(), FoldConfig::terminal());
        engine.set_layout_pass(|| None);
        assert_eq!(engine.set_text(Some(LONG)), UpdateOutcome::Deferred);
        assert!(engine.is_pending());
    }

    #[test]
    fn observer_defers_mutation_to_next_tick() {
        let mut engine = engine();
        let queue = engine.deferred();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let observer = Rc::new(move |h: f32| {
            sink.borrow_mut().push(h);
            if h > 3.0 {
                queue.push(FoldCommand::Toggle);
            }
        });
        engine.set_observer(&observer);
        engine.set_text(Some(LONG));
        engine.toggle();
        assert_eq!(engine.fold_state(), FoldState::Unfolded);
        assert_eq!(engine.deferred().len(), 1);

        assert_eq!(engine.process_deferred(), 1);
        assert_eq!(engine.fold_state(), FoldState::Folded);
        assert_eq!(*seen.borrow(), vec![3.0, 6.0, 3.0]);
        assert_eq!(engine.process_deferred(), 0);
    }

    #[test]
    fn deferred_commands_apply_in_order() {
        let mut engine = engine();
        let queue = engine.deferred();
        queue.push(FoldCommand::SetContent(Content::plain(LONG)));
        queue.push(FoldCommand::SetLineCap(2));
        queue.push(FoldCommand::Toggle);
        assert_eq!(engine.process_deferred(), 3);
        assert_eq!(engine.line_cap(), 2);
        assert_eq!(engine.fold_state(), FoldState::Unfolded);
    }

    #[test]
    fn tap_hits_affordance_only() {
        let mut engine = engine();
        engine.set_text(Some(LONG));
        assert_eq!(engine.tap(1.0, 0.5), ToggleOutcome::Ignored);
        assert_eq!(engine.tap(7.5, 2.5), ToggleOutcome::Toggled(FoldState::Unfolded));
        assert_eq!(engine.tap(7.5, 5.5), ToggleOutcome::Toggled(FoldState::Folded));
    }

    #[test]
    fn revision_advances_on_update() {
        let mut engine = engine();
        let start = engine.revision();
        engine.set_text(Some(LONG));
        assert!(engine.revision() > start);
    }

    #[test]
    fn width_below_one_advance_measures_line_breaks() {
        let font = Font::system(13.0);
        let mut engine = FoldEngine::new(MonospaceMeasurer::new(), FoldConfig::default());
        engine.set_bounds(LayoutRect::new(0.0, 0.0, 5.0, 0.0));
        let outcome = engine.set_text(Some("a\nb"));
        assert_eq!(outcome, UpdateOutcome::Applied { height_changed: true });
        assert!(!engine.can_fold());
        assert_eq!(engine.measured_height(), 2.0 * font.line_height);
    }

    #[test]
    fn effective_state_resolution() {
        assert_eq!(
            EffectiveState::resolve(false, FoldState::Unfolded),
            EffectiveState::Expanded
        );
        assert_eq!(
            EffectiveState::resolve(true, FoldState::Folded),
            EffectiveState::Folded
        );
        assert_eq!(FoldState::Folded.toggled(), FoldState::Unfolded);
    }
}
