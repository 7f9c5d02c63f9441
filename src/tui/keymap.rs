//! Key sequence dispatch for the project list.
//!
//! Bindings form a small trie: a key either triggers an action or opens a
//! nested table that waits for the next key (`z` then `a`).

use std::collections::BTreeMap;

/// Actions reachable from the project list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NewProject,
    NewSubproject,
    NewTask,
    Rename,
    ToggleDone,
    ToggleCollapse,
    CollapseAll,
    ToggleInactiveTasks,
    ShowSchedule,
    Help,
    Quit,
}

#[derive(Debug, Clone)]
pub enum Binding {
    Action(Action),
    Prefix(BTreeMap<char, Binding>),
}

/// Result of feeding one key to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Action(Action),
    /// The key started or continued a sequence.
    Pending(String),
    /// The sequence matched nothing; the dispatcher has been reset.
    Unbound(String),
}

#[derive(Debug, Clone)]
pub struct Keymap {
    root: BTreeMap<char, Binding>,
    pending: Vec<char>,
}

impl Keymap {
    /// Build a key map from its root bindings.
    pub fn new(root: BTreeMap<char, Binding>) -> Self {
        Keymap {
            root,
            pending: Vec::new(),
        }
    }

    /// The default project list bindings.
    pub fn project_list() -> Self {
        let fold = BTreeMap::from([
            ('a', Binding::Action(Action::ToggleCollapse)),
            ('A', Binding::Action(Action::CollapseAll)),
            ('z', Binding::Action(Action::ToggleInactiveTasks)),
        ]);
        Keymap::new(BTreeMap::from([
            ('p', Binding::Action(Action::NewProject)),
            ('s', Binding::Action(Action::NewSubproject)),
            ('t', Binding::Action(Action::NewTask)),
            ('r', Binding::Action(Action::Rename)),
            ('d', Binding::Action(Action::ToggleDone)),
            ('z', Binding::Prefix(fold)),
            ('S', Binding::Action(Action::ShowSchedule)),
            ('?', Binding::Action(Action::Help)),
            ('q', Binding::Action(Action::Quit)),
        ]))
    }

    /// Keys typed so far in an unfinished sequence.
    pub fn pending(&self) -> String {
        self.pending.iter().collect()
    }

    /// Whether a key sequence is half typed.
    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Abandon any half-typed sequence.
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Feed one key and report what it completed.
    pub fn feed(&mut self, key: char) -> Dispatch {
        self.pending.push(key);
        let mut table = &self.root;
        let mut found = None;
        for k in &self.pending {
            match table.get(k) {
                Some(Binding::Prefix(next)) => {
                    table = next;
                    found = None;
                }
                Some(Binding::Action(action)) => found = Some(Some(*action)),
                None => {
                    found = Some(None);
                    break;
                }
            }
        }
        match found {
            // Still inside a prefix table.
            None => Dispatch::Pending(self.pending()),
            Some(Some(action)) => {
                self.pending.clear();
                Dispatch::Action(action)
            }
            Some(None) => {
                let seq = self.pending();
                self.pending.clear();
                Dispatch::Unbound(seq)
            }
        }
    }

    /// Flattened `(keys, action)` pairs for the help overlay, in key order.
    pub fn describe(&self) -> Vec<(String, Action)> {
        fn walk(table: &BTreeMap<char, Binding>, prefix: &str, out: &mut Vec<(String, Action)>) {
            for (k, b) in table {
                let keys = if prefix.is_empty() {
                    k.to_string()
                } else {
                    format!("{prefix} {k}")
                };
                match b {
                    Binding::Action(a) => out.push((keys, *a)),
                    Binding::Prefix(next) => walk(next, &keys, out),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.root, "", &mut out);
        out
    }
}

/// Short description of an action for the help overlay.
pub fn describe_action(action: Action) -> &'static str {
    match action {
        Action::NewProject => "New project",
        Action::NewSubproject => "New subproject under selected project",
        Action::NewTask => "New task under selected subproject",
        Action::Rename => "Rename selection",
        Action::ToggleDone => "Toggle task done",
        Action::ToggleCollapse => "Collapse / expand selection",
        Action::CollapseAll => "Collapse all / expand all",
        Action::ToggleInactiveTasks => "Show / hide done tasks",
        Action::ShowSchedule => "Show weekly schedule",
        Action::Help => "This help",
        Action::Quit => "Quit",
    }
}
