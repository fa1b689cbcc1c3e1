//! Dashboard state machine.
//!
//! [`reduce`] is a pure function from the current state and one user or
//! storage action to the next state plus the effects a driver must perform.
//! It never touches storage or a display, so every transition can be tested
//! headlessly.
//!
//! # Invariants
//! - Validation and no-selection failures leave the state untouched.
//! - Update and delete never reach storage without a positive confirmation.
//! - A failed storage write leaves form, selection and list untouched.
//! - A successful write clears the form and selection, then reloads the list.

use super::form::{validate, Field, FormFields};
use crate::model::item::{Item, ItemId, NewItem};
use crate::repo::item_repo::StoreError;

/// Coarse form phase derived from the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Empty,
    Editing,
    Selected,
}

/// A write the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Add,
    Update,
    Delete,
}

impl Mutation {
    fn verb(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            Self::Add => "added",
            Self::Update => "updated",
            Self::Delete => "deleted",
        }
    }
}

/// Storage failure as seen by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The target row no longer exists; nothing changed.
    NotFound(ItemId),
    /// The store refused the values.
    Rejected(String),
    /// The store could not be reached or failed mid-statement.
    Storage(String),
}

impl From<&StoreError> for Failure {
    fn from(value: &StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::NotFound(*id),
            StoreError::Validation(err) => Self::Rejected(err.to_string()),
            StoreError::Db(_) | StoreError::InvalidData(_) => Self::Storage(value.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Blocking message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, title: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// Yes/no question asked before a destructive write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Update,
    Delete,
}

impl Confirmation {
    pub fn title(self) -> &'static str {
        match self {
            Self::Update => "Confirm Update",
            Self::Delete => "Confirm Delete",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Update => "Are you sure you want to update this item?",
            Self::Delete => "Are you sure you want to delete this item?",
        }
    }
}

/// Write waiting on a [`Confirmation`].
#[derive(Debug, Clone, PartialEq)]
pub enum PendingChange {
    Update(Item),
    Delete(ItemId),
}

/// Input to [`reduce`]: user gestures and storage completions.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Dashboard opened.
    Start,
    SchemaChecked(Result<(), Failure>),
    EditField(Field, String),
    /// Row highlighted in the record table.
    PickRow(ItemId),
    /// Select button: copy the highlighted row into the form.
    Select,
    Clear,
    Add,
    Update,
    Delete,
    SearchChanged(String),
    Confirmed(bool),
    Loaded(Result<Vec<Item>, Failure>),
    Saved(Mutation, Result<(), Failure>),
}

/// Work the driver performs on behalf of [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    EnsureSchema,
    LoadAll,
    Search(String),
    Insert(NewItem),
    Update(Item),
    Delete(ItemId),
    Confirm(Confirmation),
    Notify(Notice),
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub form: FormFields,
    pub selected: Option<Item>,
    pub search: String,
    pub items: Vec<Item>,
    pub pending: Option<PendingChange>,
}

impl DashboardState {
    pub fn phase(&self) -> FormPhase {
        if self.selected.is_some() {
            FormPhase::Selected
        } else if self.form.is_empty() {
            FormPhase::Empty
        } else {
            FormPhase::Editing
        }
    }

    fn reset_form(&mut self) {
        self.form = FormFields::default();
        self.selected = None;
        self.pending = None;
    }
}

/// Computes the next state and the effects to run for `action`.
pub fn reduce(state: &DashboardState, action: Action) -> (DashboardState, Vec<Effect>) {
    let mut next = state.clone();
    let effects = match action {
        Action::Start => vec![Effect::EnsureSchema],
        Action::SchemaChecked(Ok(())) => vec![Effect::LoadAll],
        Action::SchemaChecked(Err(failure)) => vec![error_notice(format!(
            "Could not prepare the inventory table: {}",
            describe(&failure)
        ))],
        Action::EditField(field, value) => {
            next.form.set(field, value);
            Vec::new()
        }
        Action::PickRow(id) => {
            next.selected = state.items.iter().find(|item| item.id == id).cloned();
            Vec::new()
        }
        Action::Select => {
            if let Some(item) = &state.selected {
                next.form = FormFields::from_item(item);
            }
            Vec::new()
        }
        Action::Clear => {
            next.reset_form();
            Vec::new()
        }
        Action::Add => match validate(&state.form) {
            Ok(item) => vec![Effect::Insert(item)],
            Err(err) => vec![validation_notice(err.to_string())],
        },
        Action::Update => {
            let Some(selected) = &state.selected else {
                return (next, vec![no_selection_notice(Mutation::Update)]);
            };
            match validate(&state.form) {
                Ok(item) => {
                    next.pending = Some(PendingChange::Update(item.with_id(selected.id)));
                    vec![Effect::Confirm(Confirmation::Update)]
                }
                Err(err) => vec![validation_notice(err.to_string())],
            }
        }
        Action::Delete => {
            let Some(selected) = &state.selected else {
                return (next, vec![no_selection_notice(Mutation::Delete)]);
            };
            next.pending = Some(PendingChange::Delete(selected.id));
            vec![Effect::Confirm(Confirmation::Delete)]
        }
        Action::Confirmed(accepted) => match next.pending.take() {
            Some(PendingChange::Update(item)) if accepted => vec![Effect::Update(item)],
            Some(PendingChange::Delete(id)) if accepted => vec![Effect::Delete(id)],
            _ => Vec::new(),
        },
        Action::SearchChanged(query) => {
            let effect = if query.is_empty() {
                Effect::LoadAll
            } else {
                Effect::Search(query.clone())
            };
            next.search = query;
            vec![effect]
        }
        Action::Loaded(Ok(items)) => {
            next.selected = state
                .selected
                .as_ref()
                .and_then(|selected| items.iter().find(|item| item.id == selected.id))
                .cloned();
            next.items = items;
            Vec::new()
        }
        Action::Loaded(Err(failure)) => vec![error_notice(format!(
            "Failed to load items: {}",
            describe(&failure)
        ))],
        Action::Saved(mutation, Ok(())) => {
            next.reset_form();
            vec![
                Effect::Notify(Notice::new(
                    NoticeLevel::Info,
                    "Success",
                    format!("Item {} successfully!", mutation.past_tense()),
                )),
                Effect::LoadAll,
            ]
        }
        Action::Saved(mutation, Err(failure)) => {
            next.pending = None;
            vec![error_notice(format!(
                "Failed to {} item: {}",
                mutation.verb(),
                describe(&failure)
            ))]
        }
    };
    (next, effects)
}

fn describe(failure: &Failure) -> String {
    match failure {
        Failure::NotFound(id) => format!("item {id} no longer exists"),
        Failure::Rejected(message) => message.clone(),
        Failure::Storage(message) => format!("database error ({message})"),
    }
}

fn validation_notice(message: String) -> Effect {
    Effect::Notify(Notice::new(NoticeLevel::Error, "Validation Error", message))
}

fn error_notice(message: String) -> Effect {
    Effect::Notify(Notice::new(NoticeLevel::Error, "Error", message))
}

fn no_selection_notice(mutation: Mutation) -> Effect {
    Effect::Notify(Notice::new(
        NoticeLevel::Warning,
        "No Selection",
        format!("Please select an item to {}!", mutation.verb()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Item {
        NewItem::new("Widget", "Tools", 5, 9.99).with_id(ItemId(1))
    }

    fn loaded_state() -> DashboardState {
        DashboardState {
            items: vec![
                widget(),
                NewItem::new("Hammer", "Tools", 2, 15.0).with_id(ItemId(2)),
            ],
            ..DashboardState::default()
        }
    }

    fn fill(state: &DashboardState, values: [&str; 4]) -> DashboardState {
        Field::ALL
            .into_iter()
            .zip(values)
            .fold(state.clone(), |acc, (field, value)| {
                reduce(&acc, Action::EditField(field, value.to_string())).0
            })
    }

    fn notice_of(effects: &[Effect]) -> &Notice {
        match effects {
            [Effect::Notify(notice)] => notice,
            other => panic!("expected a single notice, got {other:?}"),
        }
    }

    #[test]
    fn start_checks_schema_then_loads() {
        let (_, effects) = reduce(&DashboardState::default(), Action::Start);
        assert_eq!(effects, vec![Effect::EnsureSchema]);

        let (_, effects) = reduce(&DashboardState::default(), Action::SchemaChecked(Ok(())));
        assert_eq!(effects, vec![Effect::LoadAll]);
    }

    #[test]
    fn phases_follow_form_and_selection() {
        let state = loaded_state();
        assert_eq!(state.phase(), FormPhase::Empty);

        let editing = reduce(&state, Action::EditField(Field::Name, "W".to_string())).0;
        assert_eq!(editing.phase(), FormPhase::Editing);

        let selected = reduce(&editing, Action::PickRow(ItemId(1))).0;
        assert_eq!(selected.phase(), FormPhase::Selected);

        let cleared = reduce(&selected, Action::Clear).0;
        assert_eq!(cleared.phase(), FormPhase::Empty);
    }

    #[test]
    fn add_with_valid_form_emits_insert() {
        let state = fill(&loaded_state(), ["Gadget", "Toys", "3", "4.5"]);
        let (next, effects) = reduce(&state, Action::Add);
        assert_eq!(next, state);
        assert_eq!(
            effects,
            vec![Effect::Insert(NewItem::new("Gadget", "Toys", 3, 4.5))]
        );
    }

    #[test]
    fn add_with_invalid_form_only_notifies() {
        let state = fill(&loaded_state(), ["Gadget", "", "3", "4.5"]);
        let (next, effects) = reduce(&state, Action::Add);
        assert_eq!(next, state);
        let notice = notice_of(&effects);
        assert_eq!(notice.title, "Validation Error");
        assert_eq!(notice.message, "Category cannot be empty!");
    }

    #[test]
    fn update_without_selection_warns() {
        let state = fill(&loaded_state(), ["Gadget", "Toys", "3", "4.5"]);
        let (next, effects) = reduce(&state, Action::Update);
        assert_eq!(next, state);
        let notice = notice_of(&effects);
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, "Please select an item to update!");
    }

    #[test]
    fn delete_without_selection_warns() {
        let (_, effects) = reduce(&loaded_state(), Action::Delete);
        assert_eq!(
            notice_of(&effects).message,
            "Please select an item to delete!"
        );
    }

    #[test]
    fn select_prefills_form_from_picked_row() {
        let picked = reduce(&loaded_state(), Action::PickRow(ItemId(1))).0;
        let (next, effects) = reduce(&picked, Action::Select);
        assert!(effects.is_empty());
        assert_eq!(next.form, FormFields::from_item(&widget()));
    }

    #[test]
    fn pick_unknown_row_clears_selection() {
        let picked = reduce(&loaded_state(), Action::PickRow(ItemId(1))).0;
        let next = reduce(&picked, Action::PickRow(ItemId(99))).0;
        assert!(next.selected.is_none());
    }

    #[test]
    fn update_requires_confirmation_before_writing() {
        let picked = reduce(&loaded_state(), Action::PickRow(ItemId(1))).0;
        let filled = reduce(&picked, Action::Select).0;
        let edited = reduce(&filled, Action::EditField(Field::Quantity, "0".to_string())).0;

        let (awaiting, effects) = reduce(&edited, Action::Update);
        assert_eq!(effects, vec![Effect::Confirm(Confirmation::Update)]);

        let mut expected = widget();
        expected.quantity = 0;
        assert_eq!(awaiting.pending, Some(PendingChange::Update(expected.clone())));

        let (confirmed, effects) = reduce(&awaiting, Action::Confirmed(true));
        assert_eq!(effects, vec![Effect::Update(expected)]);
        assert!(confirmed.pending.is_none());
    }

    #[test]
    fn declined_confirmation_drops_pending_change() {
        let picked = reduce(&loaded_state(), Action::PickRow(ItemId(2))).0;
        let (awaiting, effects) = reduce(&picked, Action::Delete);
        assert_eq!(effects, vec![Effect::Confirm(Confirmation::Delete)]);
        assert_eq!(awaiting.pending, Some(PendingChange::Delete(ItemId(2))));

        let (declined, effects) = reduce(&awaiting, Action::Confirmed(false));
        assert!(effects.is_empty());
        assert!(declined.pending.is_none());
        assert_eq!(declined.selected, picked.selected);
    }

    #[test]
    fn saved_success_clears_form_and_reloads() {
        let picked = reduce(&loaded_state(), Action::PickRow(ItemId(1))).0;
        let filled = reduce(&picked, Action::Select).0;
        let (next, effects) = reduce(&filled, Action::Saved(Mutation::Update, Ok(())));

        assert_eq!(next.phase(), FormPhase::Empty);
        assert_eq!(next.items, filled.items);
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[1], Effect::LoadAll);
        match &effects[0] {
            Effect::Notify(notice) => {
                assert_eq!(notice.level, NoticeLevel::Info);
                assert_eq!(notice.message, "Item updated successfully!");
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn saved_failure_keeps_form_and_distinguishes_not_found() {
        let picked = reduce(&loaded_state(), Action::PickRow(ItemId(1))).0;
        let filled = reduce(&picked, Action::Select).0;

        let (next, effects) = reduce(
            &filled,
            Action::Saved(Mutation::Delete, Err(Failure::NotFound(ItemId(1)))),
        );
        assert_eq!(next.form, filled.form);
        assert_eq!(next.selected, filled.selected);
        assert_eq!(
            notice_of(&effects).message,
            "Failed to delete item: item 1 no longer exists"
        );

        let (_, effects) = reduce(
            &filled,
            Action::Saved(Mutation::Add, Err(Failure::Storage("disk I/O error".to_string()))),
        );
        assert_eq!(
            notice_of(&effects).message,
            "Failed to add item: database error (disk I/O error)"
        );
    }

    #[test]
    fn empty_search_reloads_everything() {
        let (next, effects) = reduce(&loaded_state(), Action::SearchChanged(String::new()));
        assert_eq!(effects, vec![Effect::LoadAll]);
        assert!(next.search.is_empty());
    }

    #[test]
    fn non_empty_search_queries_store() {
        let (next, effects) = reduce(&loaded_state(), Action::SearchChanged("to".to_string()));
        assert_eq!(effects, vec![Effect::Search("to".to_string())]);
        assert_eq!(next.search, "to");
    }

    #[test]
    fn loaded_items_refresh_or_drop_selection() {
        let picked = reduce(&loaded_state(), Action::PickRow(ItemId(1))).0;

        let mut renamed = widget();
        renamed.name = "Widget v2".to_string();
        let kept = reduce(&picked, Action::Loaded(Ok(vec![renamed.clone()]))).0;
        assert_eq!(kept.selected, Some(renamed));

        let dropped = reduce(&picked, Action::Loaded(Ok(Vec::new()))).0;
        assert!(dropped.selected.is_none());
        assert!(dropped.items.is_empty());
    }

    #[test]
    fn load_failure_notifies_without_clearing_list() {
        let state = loaded_state();
        let (next, effects) = reduce(
            &state,
            Action::Loaded(Err(Failure::Storage("unable to open database file".to_string()))),
        );
        assert_eq!(next.items, state.items);
        assert_eq!(notice_of(&effects).level, NoticeLevel::Error);
    }
}
