//! Effect runner tying [`reduce`] to a store and a view.
//!
//! # Responsibility
//! - Feed actions through the reducer one at a time.
//! - Execute effects synchronously and turn their results into actions.
//! - Re-render after every dispatched user action.
//!
//! # Invariants
//! - Single-threaded: an action is fully processed, including any storage
//!   calls it triggers, before `dispatch` returns.

use super::state::{
    reduce, Action, Confirmation, DashboardState, Effect, Failure, Mutation, Notice,
};
use crate::repo::item_repo::ItemStore;
use log::debug;
use std::collections::VecDeque;

/// Display surface the dashboard talks to.
pub trait DashboardView {
    /// Blocks until the user answers; `true` means proceed.
    fn confirm(&mut self, confirmation: Confirmation) -> bool;
    /// Blocks until the user has seen the notice.
    fn notify(&mut self, notice: &Notice);
    fn render(&mut self, state: &DashboardState);
}

/// Headless controller owning the state, a store and a view.
pub struct Dashboard<S: ItemStore, V: DashboardView> {
    store: S,
    view: V,
    state: DashboardState,
}

impl<S: ItemStore, V: DashboardView> Dashboard<S, V> {
    pub fn new(store: S, view: V) -> Self {
        Self {
            store,
            view,
            state: DashboardState::default(),
        }
    }

    /// Creates the dashboard and runs the startup sequence.
    pub fn open(store: S, view: V) -> Self {
        let mut dashboard = Self::new(store, view);
        dashboard.dispatch(Action::Start);
        dashboard
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Processes `action` and every follow-up action it causes, then renders.
    pub fn dispatch(&mut self, action: Action) {
        let mut queue = VecDeque::from([action]);
        while let Some(action) = queue.pop_front() {
            let (next, effects) = reduce(&self.state, action);
            self.state = next;
            for effect in effects {
                if let Some(follow_up) = self.run(effect) {
                    queue.push_back(follow_up);
                }
            }
        }
        self.view.render(&self.state);
    }

    fn run(&mut self, effect: Effect) -> Option<Action> {
        debug!(
            "event=dashboard_effect module=dashboard effect={}",
            effect_name(&effect)
        );
        match effect {
            Effect::EnsureSchema => Some(Action::SchemaChecked(
                self.store.ensure_schema().map_err(|err| Failure::from(&err)),
            )),
            Effect::LoadAll => Some(Action::Loaded(
                self.store.list_all().map_err(|err| Failure::from(&err)),
            )),
            Effect::Search(term) => Some(Action::Loaded(
                self.store.search(&term).map_err(|err| Failure::from(&err)),
            )),
            Effect::Insert(item) => Some(Action::Saved(
                Mutation::Add,
                self.store
                    .insert(&item)
                    .map(|_| ())
                    .map_err(|err| Failure::from(&err)),
            )),
            Effect::Update(item) => Some(Action::Saved(
                Mutation::Update,
                self.store.update(&item).map_err(|err| Failure::from(&err)),
            )),
            Effect::Delete(id) => Some(Action::Saved(
                Mutation::Delete,
                self.store.delete(id).map_err(|err| Failure::from(&err)),
            )),
            Effect::Confirm(confirmation) => {
                Some(Action::Confirmed(self.view.confirm(confirmation)))
            }
            Effect::Notify(notice) => {
                self.view.notify(&notice);
                None
            }
        }
    }
}

fn effect_name(effect: &Effect) -> &'static str {
    match effect {
        Effect::EnsureSchema => "ensure_schema",
        Effect::LoadAll => "load_all",
        Effect::Search(_) => "search",
        Effect::Insert(_) => "insert",
        Effect::Update(_) => "update",
        Effect::Delete(_) => "delete",
        Effect::Confirm(_) => "confirm",
        Effect::Notify(_) => "notify",
    }
}
