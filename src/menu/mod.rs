//! Hierarchical menu of steps.
//!
//! The step tree is static. A step is either a plain navigation node
//! (children picked with UP/DOWN, entered with SELECT/RIGHT) or a leaf
//! bound to a runner that owns the page's behaviour. LEFT always goes
//! back to the parent; the root is its own parent.


use crate::keys::{Key, KeyCode};
use crate::ui::input_logic::{select_next, select_prev};
use crate::ui::Frame;

/// Maximum number of children of one step.
pub const MAX_CHILDREN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepId {
    Root,
    Timer,
    Settings,
    TimerSettings,
    DelaySettings,
    RepeatSettings,
    BeepSettings,
    ResetSettings,
}

/// Closed set of runners a leaf step can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunnerKind {
    Timer,
    TimerBounds,
    DelayBounds,
    Repeat,
    Beeps,
    Reset,
}

/// Result of one runner invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Stay on the runner's step.
    Continue,
    /// Return to the parent step.
    Exit,
}

pub struct Step {
    pub id: StepId,
    pub title: &'static str,
    pub description: &'static str,
    pub parent: StepId,
    /// Child steps, padded with `StepId::Root` as "no child".
    pub children: [StepId; MAX_CHILDREN],
    pub runner: Option<RunnerKind>,
}

impl Step {
    /// Number of selectable children (leading entries before the first
    /// root sentinel).
    pub fn child_count(&self) -> usize {
        self.children
            .iter()
            .take_while(|&&c| c != StepId::Root)
            .count()
    }

    /// Child at `index`, `None` if the slot is empty or out of range.
    pub fn child(&self, index: usize) -> Option<StepId> {
        self.children
            .get(index)
            .copied()
            .filter(|&c| c != StepId::Root)
    }
}

const NO_CHILD: StepId = StepId::Root;

const fn leaf(
    id: StepId,
    title: &'static str,
    parent: StepId,
    runner: RunnerKind,
) -> Step {
    Step {
        id,
        title,
        description: "",
        parent,
        children: [NO_CHILD; MAX_CHILDREN],
        runner: Some(runner),
    }
}

pub static STEPS: [Step; 8] = [
    Step {
        id: StepId::Root,
        title: "MAIN MENU",
        description: "Use UP/DOWN to choose Timer or Settings and SELECT to enter into it. ",
        parent: StepId::Root,
        children: [
            StepId::Timer,
            StepId::Settings,
            NO_CHILD,
            NO_CHILD,
            NO_CHILD,
            NO_CHILD,
        ],
        runner: None,
    },
    Step {
        id: StepId::Timer,
        title: "MM>TIMER",
        description: "Press SELECT to run/stop timer",
        parent: StepId::Root,
        children: [NO_CHILD; MAX_CHILDREN],
        runner: Some(RunnerKind::Timer),
    },
    Step {
        id: StepId::Settings,
        title: "MM>SETTINGS",
        description: "Use UP/DOWN to choose settings and SELECT/RIGHT to configure it. \
                      Press LEFT to get back to main menu. ",
        parent: StepId::Root,
        children: [
            StepId::TimerSettings,
            StepId::DelaySettings,
            StepId::RepeatSettings,
            StepId::BeepSettings,
            StepId::ResetSettings,
            NO_CHILD,
        ],
        runner: None,
    },
    leaf(StepId::TimerSettings, "SET>TMR", StepId::Settings, RunnerKind::TimerBounds),
    leaf(StepId::DelaySettings, "SET>DELAY", StepId::Settings, RunnerKind::DelayBounds),
    leaf(StepId::RepeatSettings, "SET>RPT", StepId::Settings, RunnerKind::Repeat),
    leaf(StepId::BeepSettings, "SET>BEEPS", StepId::Settings, RunnerKind::Beeps),
    leaf(StepId::ResetSettings, "SET>RESET", StepId::Settings, RunnerKind::Reset),
];

/// Look up a step by id.
pub fn lookup(id: StepId) -> Option<&'static Step> {
    STEPS.iter().find(|s| s.id == id)
}

/// Navigation state owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuCursor {
    pub current: StepId,
    pub child_index: usize,
    /// Code of the last key handled, used to ignore a held key.
    pub last_key: KeyCode,
}

impl Default for MenuCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuCursor {
    pub const fn new() -> Self {
        Self {
            current: StepId::Root,
            child_index: 0,
            last_key: KeyCode::None,
        }
    }

    /// Move to `id`, starting at its first child.
    pub fn enter(&mut self, id: StepId) {
        if id != self.current {
            debug!("menu: {} -> {}", self.current, id);
        }
        self.current = id;
        self.child_index = 0;
    }

    /// Move to the parent of `step`.
    pub fn leave(&mut self, step: &Step) {
        self.enter(step.parent);
    }
}

/// Handle one poll on a plain navigation step.
///
/// Renders the targeted child's title (or the step's own title when the
/// slot is empty) and the step description, then acts on the key unless
/// it is the same key as last time.
pub fn navigate(cursor: &mut MenuCursor, step: &Step, key: Key, frame: &mut Frame) {
    if cursor.child_index >= MAX_CHILDREN {
        cursor.child_index = 0;
    }

    let title = step
        .child(cursor.child_index)
        .and_then(lookup)
        .map_or(step.title, |child| child.title);
    frame.set(0, title);
    frame.set(1, step.description);

    if key.code == cursor.last_key {
        return;
    }
    cursor.last_key = key.code;

    match key.code {
        KeyCode::Select | KeyCode::Right => {
            let target = step.children[cursor.child_index];
            cursor.enter(target);
        }
        KeyCode::Down => {
            cursor.child_index = select_next(cursor.child_index, step.child_count());
        }
        KeyCode::Up => {
            cursor.child_index = select_prev(cursor.child_index);
        }
        KeyCode::Left => cursor.leave(step),
        KeyCode::None => {}
    }
}
